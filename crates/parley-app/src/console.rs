//! Terminal stand-ins for the platform speech engines.
//!
//! Typed lines play the role of recognized speech and replies are printed
//! instead of spoken. Completion callbacks are fed back through the same
//! channel the main loop reads stdin from.

use std::io::Write;

use tokio::sync::mpsc::UnboundedSender;

use parley_action::{ActionError, LinkOpener};
use parley_action::opener::validate_url;
use parley_session::{
    CaptureEngine, SessionError, SpeechId, SpeechOptions, SpeechSynthesizer, SynthesisEvent,
};

/// Input typed to end the program.
pub const QUIT_COMMAND: &str = ":quit";

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One line typed by the user.
    Line(String),
    /// Stdin closed.
    Eof,
    Synthesis(SynthesisEvent),
}

/// Prompts for a line while listening.
#[derive(Debug, Default)]
pub struct ConsoleCapture {
    listening: bool,
}

impl ConsoleCapture {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureEngine for ConsoleCapture {
    fn start(&mut self, locale: &str) -> Result<(), SessionError> {
        tracing::debug!(locale = %locale, "Console capture started");
        self.listening = true;
        let mut out = std::io::stdout();
        write!(out, "You: ")
            .and_then(|_| out.flush())
            .map_err(|e| SessionError::Capture(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), SessionError> {
        if self.listening {
            tracing::debug!("Console capture stopped");
        }
        self.listening = false;
        Ok(())
    }
}

/// Prints replies and reports them finished straight away.
#[derive(Debug)]
pub struct ConsoleSynthesizer {
    events: UnboundedSender<AppEvent>,
}

impl ConsoleSynthesizer {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, id: SpeechId, text: &str, options: &SpeechOptions) -> Result<(), SessionError> {
        tracing::trace!(speech = %id, rate = options.rate, pitch = options.pitch, "Speaking");
        println!("Assistant: {}", text);
        self.events
            .send(AppEvent::Synthesis(SynthesisEvent::Start(id)))
            .and_then(|_| self.events.send(AppEvent::Synthesis(SynthesisEvent::End(id))))
            .map_err(|e| SessionError::Synthesis(e.to_string()))
    }
}

/// Link opener for `--no-browser`: validates and logs, opens nothing.
#[derive(Debug, Default)]
pub struct LoggingLinkOpener;

impl LinkOpener for LoggingLinkOpener {
    fn open(&self, url: &str) -> Result<(), ActionError> {
        validate_url(url)?;
        tracing::info!(url = %url, "Link not opened (--no-browser)");
        Ok(())
    }
}
