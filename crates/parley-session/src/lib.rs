//! Parley session crate - turn-taking state machine and conversation log.
//!
//! A [`Session`] reacts to capture-engine and synthesis-engine events,
//! classifies recognized speech, dispatches it to the intent handlers and
//! records every turn: Idle -> Listening -> Speaking -> Idle.

pub mod engine;
pub mod error;
pub mod log;
pub mod mock;
pub mod session;
pub mod state;

pub use engine::{CaptureEngine, CaptureEvent, SpeechId, SpeechOptions, SpeechSynthesizer, SynthesisEvent};
pub use error::SessionError;
pub use log::ConversationLog;
pub use mock::{MockCapture, MockSynthesizer};
pub use session::Session;
pub use state::{SessionState, StateMachine};
