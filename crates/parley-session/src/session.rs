//! The conversation session.
//!
//! A `Session` owns the state machine, the conversation log and the engines.
//! It is driven entirely from the outside: the caller forwards capture and
//! synthesis callbacks and issues start/stop listening requests. Requests
//! that do not fit the current state are ignored, never reported as errors.

use std::sync::Arc;

use uuid::Uuid;

use parley_action::phrases::{greeting, REPROMPT};
use parley_action::{HandlerRegistry, ReplySink, SessionContext};
use parley_core::types::{Clock, ConversationEntry, Timestamp};
use parley_intent::{CommandInterpreter, Intent, Utterance};

use crate::engine::{
    CaptureEngine, CaptureEvent, SpeechId, SpeechOptions, SpeechSynthesizer, SynthesisEvent,
    NO_SPEECH,
};
use crate::log::ConversationLog;
use crate::state::{SessionState, StateMachine};

// =============================================================================
// Output side
// =============================================================================

/// Everything a reply touches: state, log and synthesizer.
///
/// Split out of [`Session`] so handlers can write replies while the session
/// still lends them the registry and context.
struct Voice {
    session_id: Uuid,
    machine: StateMachine,
    log: ConversationLog,
    synthesizer: Box<dyn SpeechSynthesizer>,
    options: SpeechOptions,
    clock: Arc<dyn Clock>,
    last_issued: SpeechId,
    playing: Option<SpeechId>,
}

impl Voice {
    fn stamp(&self) -> Timestamp {
        Timestamp::from_datetime(&self.clock.now())
    }

    fn record_user(&mut self, text: &str) {
        let entry = ConversationEntry::user(text, self.stamp());
        self.log.append(entry);
    }

    fn enter(&mut self, target: SessionState) {
        if let Err(e) = self.machine.transition(target) {
            tracing::warn!(session_id = %self.session_id, error = %e, "Rejected state change");
        }
    }
}

impl ReplySink for Voice {
    fn say(&mut self, text: String) {
        let entry = ConversationEntry::assistant(text.as_str(), self.stamp());
        self.log.append(entry);

        if self.machine.current() != SessionState::Speaking {
            self.enter(SessionState::Speaking);
        }

        let id = self.last_issued.next();
        self.last_issued = id;
        match self.synthesizer.speak(id, &text, &self.options) {
            Ok(()) => {
                tracing::debug!(speech = %id, text = %text, "Speaking");
                self.playing = Some(id);
            }
            Err(e) => {
                tracing::warn!(speech = %id, error = %e, "Speech synthesis failed");
                self.playing = None;
                self.enter(SessionState::Idle);
            }
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// One conversation with one user.
pub struct Session {
    id: Uuid,
    context: SessionContext,
    interpreter: CommandInterpreter,
    registry: HandlerRegistry,
    capture: Box<dyn CaptureEngine>,
    voice: Voice,
    last_utterance: Option<Utterance>,
    /// Capture ended on its own and its result may still arrive.
    awaiting_result: bool,
    ended: bool,
}

impl Session {
    pub fn new(
        context: SessionContext,
        registry: HandlerRegistry,
        capture: Box<dyn CaptureEngine>,
        synthesizer: Box<dyn SpeechSynthesizer>,
    ) -> Self {
        let options = SpeechOptions {
            locale: context.locale.clone(),
            ..SpeechOptions::default()
        };
        let id = Uuid::new_v4();
        let voice = Voice {
            session_id: id,
            machine: StateMachine::new(),
            log: ConversationLog::new(),
            synthesizer,
            options,
            clock: Arc::clone(context.clock()),
            last_issued: SpeechId(0),
            playing: None,
        };
        Self {
            id,
            context,
            interpreter: CommandInterpreter::new(),
            registry,
            capture,
            voice,
            last_utterance: None,
            awaiting_result: false,
            ended: false,
        }
    }

    pub fn with_speech_options(mut self, options: SpeechOptions) -> Self {
        self.voice.options = options;
        self
    }

    /// Cap the conversation log. `None` keeps every entry.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.voice.log = ConversationLog::with_limit(limit);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> SessionState {
        self.voice.machine.current()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.voice.log
    }

    /// The most recent utterance accepted for interpretation.
    pub fn last_utterance(&self) -> Option<&Utterance> {
        self.last_utterance.as_ref()
    }

    /// True once a farewell has been handled. No further listening is started.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Speak the time-of-day greeting. Only valid from a fresh Idle session.
    pub fn start(&mut self) {
        if self.state() != SessionState::Idle || !self.voice.log.is_empty() {
            tracing::debug!(session_id = %self.id, "Session already started");
            return;
        }
        tracing::info!(session_id = %self.id, user = %self.context.user_name, "Session started");
        let text = greeting(&self.context);
        self.voice.say(text);
    }

    /// Begin capturing speech. Returns whether capture actually started.
    pub fn start_listening(&mut self) -> bool {
        if self.ended {
            tracing::debug!(session_id = %self.id, "Start listening ignored, session ended");
            return false;
        }
        if self.state() != SessionState::Idle {
            tracing::debug!(
                session_id = %self.id,
                "Start listening ignored while {}",
                self.state()
            );
            return false;
        }
        if let Err(e) = self.capture.start(&self.context.locale) {
            tracing::warn!(session_id = %self.id, error = %e, "Capture failed to start");
            return false;
        }
        self.awaiting_result = false;
        self.voice.enter(SessionState::Listening);
        true
    }

    /// Stop capturing. A no-op unless Listening.
    ///
    /// Also drops a result still pending from a capture that already ended.
    pub fn stop_listening(&mut self) -> bool {
        self.awaiting_result = false;
        if self.state() != SessionState::Listening {
            return false;
        }
        self.stop_capture();
        self.voice.enter(SessionState::Idle);
        true
    }

    pub async fn handle_capture_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Start => {
                tracing::trace!(session_id = %self.id, "Capture started");
            }
            CaptureEvent::End => {
                if self.state() == SessionState::Listening {
                    tracing::debug!(session_id = %self.id, "Capture ended, result may follow");
                    self.awaiting_result = true;
                    self.voice.enter(SessionState::Idle);
                }
            }
            CaptureEvent::Result(text) => {
                let pending = self.awaiting_result && self.state() == SessionState::Idle;
                self.awaiting_result = false;
                if self.state() != SessionState::Listening && !pending {
                    tracing::debug!(
                        session_id = %self.id,
                        "Ignoring capture result while {}",
                        self.state()
                    );
                    return;
                }
                self.handle_utterance(Utterance::new(text)).await;
            }
            CaptureEvent::Error(code) => {
                self.awaiting_result = false;
                if self.state() != SessionState::Listening {
                    tracing::debug!(session_id = %self.id, code = %code, "Ignoring capture error");
                    return;
                }
                self.voice.enter(SessionState::Error);
                if code == NO_SPEECH {
                    tracing::debug!(session_id = %self.id, "No speech detected");
                    self.voice.enter(SessionState::Idle);
                } else {
                    tracing::info!(session_id = %self.id, code = %code, "Capture error, reprompting");
                    self.voice.say(REPROMPT.to_string());
                }
            }
        }
    }

    pub fn handle_synthesis_event(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Start(id) => {
                tracing::trace!(session_id = %self.id, speech = %id, "Synthesis started");
            }
            SynthesisEvent::End(id) => {
                if self.voice.playing != Some(id) {
                    tracing::debug!(session_id = %self.id, speech = %id, "Ignoring end of superseded speech");
                    return;
                }
                self.voice.playing = None;
                if self.state() == SessionState::Speaking {
                    self.voice.enter(SessionState::Idle);
                }
            }
        }
    }

    async fn handle_utterance(&mut self, utterance: Utterance) {
        tracing::info!(session_id = %self.id, text = %utterance, "Heard utterance");
        self.voice.record_user(utterance.raw());

        let intent = self.interpreter.interpret(&utterance);
        self.last_utterance = Some(utterance);

        let farewell = matches!(intent, Intent::Farewell);
        if farewell {
            self.stop_capture();
        }

        self.registry
            .dispatch(&intent, &self.context, &mut self.voice)
            .await;

        if self.state() == SessionState::Listening {
            tracing::warn!(session_id = %self.id, intent = %intent.kind(), "Handler produced no reply");
            self.voice.enter(SessionState::Idle);
        }

        if farewell {
            self.ended = true;
            tracing::info!(session_id = %self.id, "Session ended");
        }
    }

    fn stop_capture(&mut self) {
        if let Err(e) = self.capture.stop() {
            tracing::warn!(session_id = %self.id, error = %e, "Capture failed to stop");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("context", &self.context)
            .field("state", &self.state())
            .field("entries", &self.voice.log.len())
            .field("ended", &self.ended)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCapture, MockSynthesizer};
    use chrono::{FixedOffset, TimeZone};
    use parley_action::handler::FallbackHandler;
    use parley_core::config::UserConfig;
    use parley_core::types::{FixedClock, Speaker};

    fn make_session(registry: HandlerRegistry) -> (Session, MockCapture, MockSynthesizer) {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
            .unwrap();
        let ctx = SessionContext::new(&UserConfig::default(), Arc::new(FixedClock::new(now)));
        let capture = MockCapture::new();
        let synth = MockSynthesizer::new();
        let session = Session::new(
            ctx,
            registry,
            Box::new(capture.clone()),
            Box::new(synth.clone()),
        );
        (session, capture, synth)
    }

    fn fallback_only() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(FallbackHandler));
        registry
    }

    fn finish_speech(session: &mut Session, synth: &MockSynthesizer) {
        let id = synth.last_id().expect("something was spoken");
        session.handle_synthesis_event(SynthesisEvent::End(id));
    }

    #[test]
    fn test_start_greets_and_speaks() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start();

        assert_eq!(session.state(), SessionState::Speaking);
        assert_eq!(synth.texts(), vec!["Good Morning, Luke Abel!"]);
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().entries()[0].speaker, Speaker::Assistant);

        finish_speech(&mut session, &synth);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_twice_greets_once() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start();
        finish_speech(&mut session, &synth);
        session.start();
        assert_eq!(synth.texts().len(), 1);
    }

    #[test]
    fn test_start_listening_passes_locale() {
        let (mut session, capture, _) = make_session(fallback_only());
        assert!(session.start_listening());
        assert_eq!(session.state(), SessionState::Listening);
        assert_eq!(capture.starts(), vec!["en-US"]);
    }

    #[test]
    fn test_start_listening_twice_is_noop() {
        let (mut session, capture, _) = make_session(fallback_only());
        assert!(session.start_listening());
        assert!(!session.start_listening());
        assert_eq!(capture.starts().len(), 1);
    }

    #[test]
    fn test_capture_start_failure_stays_idle() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
            .unwrap();
        let ctx = SessionContext::new(&UserConfig::default(), Arc::new(FixedClock::new(now)));
        let mut session = Session::new(
            ctx,
            fallback_only(),
            Box::new(MockCapture::failing()),
            Box::new(MockSynthesizer::new()),
        );
        assert!(!session.start_listening());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_stop_listening_is_idempotent() {
        let (mut session, capture, _) = make_session(fallback_only());
        assert!(!session.stop_listening());
        assert_eq!(capture.stops(), 0);

        session.start_listening();
        assert!(session.stop_listening());
        assert!(!session.stop_listening());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(capture.stops(), 1);
    }

    #[tokio::test]
    async fn test_capture_end_returns_to_idle() {
        let (mut session, _, _) = make_session(fallback_only());
        session.start_listening();
        session.handle_capture_event(CaptureEvent::End).await;
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_result_after_capture_end_is_handled() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session.handle_capture_event(CaptureEvent::End).await;
        assert_eq!(session.state(), SessionState::Idle);

        session
            .handle_capture_event(CaptureEvent::Result("tell me a joke".to_string()))
            .await;
        assert_eq!(session.state(), SessionState::Speaking);
        assert_eq!(session.log().len(), 2);
        assert_eq!(synth.texts(), vec![parley_action::UNKNOWN_REPLY]);
    }

    #[tokio::test]
    async fn test_only_one_result_accepted_after_capture_end() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session.handle_capture_event(CaptureEvent::End).await;
        session
            .handle_capture_event(CaptureEvent::Result("first".to_string()))
            .await;
        finish_speech(&mut session, &synth);
        session
            .handle_capture_event(CaptureEvent::Result("second".to_string()))
            .await;

        assert_eq!(session.log().len(), 2);
        assert_eq!(session.last_utterance().unwrap().raw(), "first");
    }

    #[tokio::test]
    async fn test_stop_after_capture_end_drops_pending_result() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session.handle_capture_event(CaptureEvent::End).await;
        assert!(!session.stop_listening());
        session
            .handle_capture_event(CaptureEvent::Result("hello".to_string()))
            .await;
        assert!(session.log().is_empty());
        assert!(synth.texts().is_empty());
    }

    #[tokio::test]
    async fn test_result_ignored_unless_listening() {
        let (mut session, _, synth) = make_session(fallback_only());
        session
            .handle_capture_event(CaptureEvent::Result("hello".to_string()))
            .await;
        assert!(session.log().is_empty());
        assert!(synth.texts().is_empty());
        assert!(session.last_utterance().is_none());
    }

    #[tokio::test]
    async fn test_result_logs_turn_and_speaks() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session
            .handle_capture_event(CaptureEvent::Result("Tell me a joke".to_string()))
            .await;

        assert_eq!(session.state(), SessionState::Speaking);
        let entries = session.log().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].speaker, Speaker::User);
        assert_eq!(entries[0].text, "Tell me a joke");
        assert_eq!(entries[1].speaker, Speaker::Assistant);
        assert_eq!(synth.texts(), vec![entries[1].text.clone()]);
        assert_eq!(
            session.last_utterance().unwrap().normalized(),
            "tell me a joke"
        );
    }

    #[tokio::test]
    async fn test_no_speech_error_is_silent() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session
            .handle_capture_event(CaptureEvent::Error(NO_SPEECH.to_string()))
            .await;
        assert_eq!(session.state(), SessionState::Idle);
        assert!(synth.texts().is_empty());
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_other_error_reprompts() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start_listening();
        session
            .handle_capture_event(CaptureEvent::Error("network".to_string()))
            .await;
        assert_eq!(session.state(), SessionState::Speaking);
        assert_eq!(synth.texts(), vec![REPROMPT]);

        finish_speech(&mut session, &synth);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.start_listening());
    }

    #[tokio::test]
    async fn test_missing_handler_still_replies() {
        let (mut session, _, synth) = make_session(HandlerRegistry::new());
        session.start_listening();
        session
            .handle_capture_event(CaptureEvent::Result("what time is it".to_string()))
            .await;
        assert_eq!(session.state(), SessionState::Speaking);
        assert_eq!(synth.texts(), vec![parley_action::UNKNOWN_REPLY]);
    }

    #[test]
    fn test_speech_options_follow_context_locale() {
        let (mut session, _, synth) = make_session(fallback_only());
        session.start();
        assert_eq!(synth.last_options().unwrap().locale, "en-US");
    }

    #[test]
    fn test_debug_output() {
        let (session, _, _) = make_session(fallback_only());
        let dbg = format!("{:?}", session);
        assert!(dbg.contains("Idle"));
        assert!(dbg.contains("Luke Abel"));
    }
}
