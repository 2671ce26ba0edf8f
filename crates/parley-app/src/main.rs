//! Parley application binary - composition root.
//!
//! 1. Load configuration from TOML and apply CLI overrides
//! 2. Build the weather provider, link opener and handler registry
//! 3. Wire a session to the console capture and synthesis engines
//! 4. Run the event loop until farewell, `:quit` or end of input

mod cli;
mod console;

use std::collections::VecDeque;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::EnvFilter;

use parley_action::{HandlerRegistry, LinkOpener, OpenWeatherProvider, SessionContext, SystemLinkOpener};
use parley_core::config::{GeneralConfig, ParleyConfig};
use parley_session::engine::NO_SPEECH;
use parley_session::{CaptureEvent, Session, SessionState, SpeechOptions};

use crate::cli::CliArgs;
use crate::console::{AppEvent, ConsoleCapture, ConsoleSynthesizer, LoggingLinkOpener, QUIT_COMMAND};

/// Forward stdin lines to the event loop until input closes.
fn spawn_stdin_reader(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if events.send(AppEvent::Line(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let _ = events.send(AppEvent::Eof);
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    let _ = events.send(AppEvent::Eof);
                    break;
                }
            }
        }
    });
}

/// Hand one typed line to the session as a capture callback sequence.
async fn feed_line(session: &mut Session, line: String) {
    session.handle_capture_event(CaptureEvent::Start).await;
    if line.trim().is_empty() {
        session
            .handle_capture_event(CaptureEvent::Error(NO_SPEECH.to_string()))
            .await;
    } else {
        session.handle_capture_event(CaptureEvent::Result(line)).await;
    }
    session.handle_capture_event(CaptureEvent::End).await;
}

/// Greet, then keep listening and answering until the conversation is over.
///
/// Lines typed while the assistant is still talking are queued and handled
/// at the next listen.
async fn run(session: &mut Session, events: &mut UnboundedReceiver<AppEvent>) {
    let mut typed: VecDeque<String> = VecDeque::new();
    let mut input_closed = false;

    session.start();

    loop {
        if session.is_ended() && session.state() == SessionState::Idle {
            break;
        }
        if session.state() == SessionState::Idle && !session.start_listening() {
            tracing::error!("Could not start listening");
            break;
        }
        if session.state() == SessionState::Listening {
            match typed.pop_front() {
                Some(line) if line.trim() == QUIT_COMMAND => {
                    session.stop_listening();
                    break;
                }
                Some(line) => {
                    feed_line(session, line).await;
                    continue;
                }
                None if input_closed => {
                    session.stop_listening();
                    break;
                }
                None => {}
            }
        }

        match events.recv().await {
            Some(AppEvent::Line(line)) => typed.push_back(line),
            Some(AppEvent::Synthesis(event)) => session.handle_synthesis_event(event),
            Some(AppEvent::Eof) => input_closed = true,
            None => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing so its log level can apply.
    let config_file = args.resolve_config_path();
    let loaded = ParleyConfig::load(&config_file);
    let config_level = match &loaded {
        Ok(config) => config.general.log_level.clone(),
        Err(_) => GeneralConfig::default().log_level,
    };

    // Tracing. Stdout is the conversation, logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.resolve_log_level(&config_level))),
        )
        .init();

    tracing::info!("Starting parley v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                "Failed to load config from {}: {}. Using defaults.",
                config_file.display(),
                e
            );
            ParleyConfig::default()
        }
    };
    args.apply_overrides(&mut config);

    // Handlers.
    if config.weather.resolve_api_key().is_none() {
        tracing::warn!(
            env = %config.weather.api_key_env,
            "No weather API key configured, weather requests will fail"
        );
    }
    let weather = OpenWeatherProvider::new(&config.weather)?;
    let opener: Arc<dyn LinkOpener> = if args.no_browser {
        Arc::new(LoggingLinkOpener)
    } else {
        Arc::new(SystemLinkOpener)
    };
    let mut registry = HandlerRegistry::new();
    registry.register_defaults(Arc::new(weather), opener, config.weather.timeout());

    // Session.
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx.clone());

    let context = SessionContext::with_system_clock(&config.user);
    let mut session = Session::new(
        context,
        registry,
        Box::new(ConsoleCapture::new()),
        Box::new(ConsoleSynthesizer::new(tx)),
    )
    .with_speech_options(SpeechOptions::from_config(&config.voice, &config.user.locale))
    .with_history_limit(config.history.max_entries);

    tracing::info!(session_id = %session.id(), user = %config.user.name, city = %config.user.city, "Session ready");

    run(&mut session, &mut rx).await;

    tracing::info!(
        session_id = %session.id(),
        entries = session.log().len(),
        ended = session.is_ended(),
        "Session closed"
    );
    Ok(())
}
