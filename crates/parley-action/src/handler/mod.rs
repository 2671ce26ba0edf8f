//! Intent handler registry and trait definition.
//!
//! Defines the `IntentHandler` async trait and provides the registry that
//! routes a classified intent to the handler for its kind.

pub mod fallback;
pub mod farewell;
pub mod identity;
pub mod play_search;
pub mod site_open;
pub mod tell_time;
pub mod weather;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::error::ActionError;
use crate::opener::LinkOpener;
use crate::reply::ReplySink;
use crate::weather::WeatherProvider;

pub use fallback::{FallbackHandler, UNKNOWN_REPLY};
pub use farewell::FarewellHandler;
pub use identity::{WhoAmIHandler, WhoAreYouHandler};
pub use play_search::PlaySearchHandler;
pub use site_open::SiteOpenHandler;
pub use tell_time::TellTimeHandler;
pub use weather::WeatherHandler;

/// Produces the spoken replies for one intent kind.
///
/// `handle` never fails: internal errors are logged and turned into a
/// fallback reply. Every call emits at least one reply.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// The intent kind this handler serves.
    fn intent_kind(&self) -> IntentKind;

    async fn handle(&self, intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink);

    /// Short human-readable description of what `handle` would do.
    fn describe(&self, intent: &Intent) -> String;
}

/// Registry mapping intent kinds to their handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<IntentKind, Arc<dyn IntentHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous handler for the same kind.
    pub fn register(&mut self, handler: Arc<dyn IntentHandler>) {
        self.handlers.insert(handler.intent_kind(), handler);
    }

    pub fn get(&self, kind: IntentKind) -> Option<&Arc<dyn IntentHandler>> {
        self.handlers.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Register one handler for every intent kind.
    pub fn register_defaults(
        &mut self,
        weather: Arc<dyn WeatherProvider>,
        opener: Arc<dyn LinkOpener>,
        weather_timeout: Duration,
    ) {
        self.register(Arc::new(FarewellHandler));
        self.register(Arc::new(WeatherHandler::new(weather, weather_timeout)));
        self.register(Arc::new(TellTimeHandler));
        self.register(Arc::new(SiteOpenHandler::new(Arc::clone(&opener))));
        self.register(Arc::new(PlaySearchHandler::new(opener)));
        self.register(Arc::new(WhoAmIHandler));
        self.register(Arc::new(WhoAreYouHandler));
        self.register(Arc::new(FallbackHandler));
    }

    /// Run the handler registered for `intent`.
    ///
    /// A missing handler is logged and answered with the unknown-command reply.
    pub async fn dispatch(&self, intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        match self.get(intent.kind()) {
            Some(handler) => {
                tracing::debug!(intent = %intent.kind(), action = %handler.describe(intent), "Dispatching intent");
                handler.handle(intent, ctx, replies).await;
            }
            None => {
                let err = ActionError::UnregisteredHandler(intent.kind());
                tracing::warn!("{}", err);
                replies.say(UNKNOWN_REPLY.to_string());
            }
        }
    }
}

/// Hand `url` to the opener. Failures are logged, never spoken.
pub(crate) fn open_link(opener: &dyn LinkOpener, url: &str) {
    if let Err(e) = opener.open(url) {
        tracing::warn!(url = %url, error = %e, "Link open failed");
    }
}
