//! Session state machine.
//!
//! Enforces valid state transitions for one conversation:
//! - Idle -> Listening (start listening)
//! - Idle -> Speaking (greeting, or a result arriving after capture ended)
//! - Listening -> Idle (capture ended, or stop request)
//! - Listening -> Speaking (reply to a recognized utterance)
//! - Listening -> Error (capture error)
//! - Error -> Speaking (reprompt)
//! - Error -> Idle (silent recovery)
//! - Speaking -> Idle (synthesis finished)
//!
//! The session owns the machine exclusively, so it is plain `&mut` state.

use std::fmt;

use crate::error::SessionError;

/// Conversational state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Nothing in progress. Ready to listen.
    #[default]
    Idle,
    /// The capture engine is recording user speech.
    Listening,
    /// The assistant is talking.
    Speaking,
    /// A capture error was reported and is being handled.
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Speaking => write!(f, "Speaking"),
            SessionState::Error => write!(f, "Error"),
        }
    }
}

impl SessionState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Listening)
                | (SessionState::Idle, SessionState::Speaking)
                | (SessionState::Listening, SessionState::Idle)
                | (SessionState::Listening, SessionState::Speaking)
                | (SessionState::Listening, SessionState::Error)
                | (SessionState::Error, SessionState::Speaking)
                | (SessionState::Error, SessionState::Idle)
                | (SessionState::Speaking, SessionState::Idle)
        )
    }
}

/// Validating holder for the current [`SessionState`].
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: SessionState,
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> SessionState {
        self.state
    }

    /// Attempt to transition to the target state.
    ///
    /// Leaves the state untouched and returns `SessionError::InvalidTransition`
    /// if the move is not allowed.
    pub fn transition(&mut self, target: SessionState) -> Result<(), SessionError> {
        if self.state.can_transition_to(&target) {
            tracing::debug!("Session state: {} -> {}", self.state, target);
            self.state = target;
            Ok(())
        } else {
            Err(SessionError::InvalidTransition(self.state, target))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
