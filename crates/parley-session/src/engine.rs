//! Capability interfaces for the platform speech engines.
//!
//! The session drives a [`CaptureEngine`] and a [`SpeechSynthesizer`] and is
//! fed their callbacks back as [`CaptureEvent`] and [`SynthesisEvent`] values.
//! Nothing here assumes a particular platform API.

use std::fmt;

use parley_core::config::VoiceConfig;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Capture error code for "no speech detected". Never reprompted.
pub const NO_SPEECH: &str = "no-speech";

/// Speech recognizer.
pub trait CaptureEngine: Send {
    fn start(&mut self, locale: &str) -> Result<(), SessionError>;
    fn stop(&mut self) -> Result<(), SessionError>;
}

/// Text-to-speech output.
///
/// A new `speak` call supersedes any utterance still playing. The engine
/// reports `SynthesisEvent::End` with the same `id` when playback finishes.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, id: SpeechId, text: &str, options: &SpeechOptions) -> Result<(), SessionError>;
}

/// Identifies one `speak` call so late completion events can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeechId(pub u64);

impl SpeechId {
    pub fn next(self) -> Self {
        SpeechId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SpeechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speech#{}", self.0)
    }
}

/// Voice settings passed with every `speak` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechOptions {
    pub rate: f32,
    pub pitch: f32,
    pub voice_hint: String,
    pub locale: String,
}

impl SpeechOptions {
    pub fn from_config(voice: &VoiceConfig, locale: &str) -> Self {
        Self {
            rate: voice.rate,
            pitch: voice.pitch,
            voice_hint: voice.voice_hint.clone(),
            locale: locale.to_string(),
        }
    }
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self::from_config(&VoiceConfig::default(), "en-US")
    }
}

/// Callbacks from the capture engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Start,
    /// Capture stopped. Engines may send it before or after the `Result`.
    End,
    /// Recognized text.
    Result(String),
    /// Recognition failed with a platform error code.
    Error(String),
}

/// Callbacks from the speech synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisEvent {
    Start(SpeechId),
    End(SpeechId),
}
