use crate::state::SessionState;

/// Errors raised inside the session. None of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid state transition: {0} -> {1}")]
    InvalidTransition(SessionState, SessionState),
    #[error("Capture engine error: {0}")]
    Capture(String),
    #[error("Speech synthesis error: {0}")]
    Synthesis(String),
}
