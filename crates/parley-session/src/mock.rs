//! In-memory engines for tests and headless runs.
//!
//! Both mocks are cheap to clone; clones share the same recording, so a test
//! can hand one copy to the session and inspect the other.

use std::sync::{Arc, Mutex};

use crate::engine::{CaptureEngine, SpeechId, SpeechOptions, SpeechSynthesizer};
use crate::error::SessionError;

#[derive(Debug, Default)]
struct CaptureRecord {
    starts: Vec<String>,
    stops: usize,
    fail_start: bool,
}

/// Capture engine that records `start`/`stop` calls.
#[derive(Debug, Clone, Default)]
pub struct MockCapture {
    record: Arc<Mutex<CaptureRecord>>,
}

impl MockCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture engine whose `start` always fails.
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.record.lock().expect("mock mutex poisoned").fail_start = true;
        mock
    }

    /// Locales passed to each successful `start`.
    pub fn starts(&self) -> Vec<String> {
        self.record.lock().expect("mock mutex poisoned").starts.clone()
    }

    pub fn stops(&self) -> usize {
        self.record.lock().expect("mock mutex poisoned").stops
    }
}

impl CaptureEngine for MockCapture {
    fn start(&mut self, locale: &str) -> Result<(), SessionError> {
        let mut record = self.record.lock().expect("mock mutex poisoned");
        if record.fail_start {
            return Err(SessionError::Capture("microphone unavailable".to_string()));
        }
        record.starts.push(locale.to_string());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SessionError> {
        self.record.lock().expect("mock mutex poisoned").stops += 1;
        Ok(())
    }
}

/// Synthesizer that records what it was asked to say.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    spoken: Arc<Mutex<Vec<(SpeechId, String, SpeechOptions)>>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spoken texts in call order.
    pub fn texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .expect("mock mutex poisoned")
            .iter()
            .map(|(_, text, _)| text.clone())
            .collect()
    }

    /// Ids of every `speak` call, in order.
    pub fn ids(&self) -> Vec<SpeechId> {
        self.spoken
            .lock()
            .expect("mock mutex poisoned")
            .iter()
            .map(|(id, _, _)| *id)
            .collect()
    }

    pub fn last_id(&self) -> Option<SpeechId> {
        self.ids().last().copied()
    }

    pub fn last_options(&self) -> Option<SpeechOptions> {
        self.spoken
            .lock()
            .expect("mock mutex poisoned")
            .last()
            .map(|(_, _, options)| options.clone())
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&mut self, id: SpeechId, text: &str, options: &SpeechOptions) -> Result<(), SessionError> {
        self.spoken
            .lock()
            .expect("mock mutex poisoned")
            .push((id, text.to_string(), options.clone()));
        Ok(())
    }
}
