//! Command interpretation for parley.
//!
//! Normalizes recognized speech into an [`Utterance`] and classifies it into
//! one [`Intent`] using an ordered, first-match-wins rule table.

pub mod interpreter;
pub mod types;

pub use interpreter::{CommandInterpreter, IntentRule};
pub use types::{Intent, IntentKind, SiteTarget, Utterance};
