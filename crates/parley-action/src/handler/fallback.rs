//! Reply for utterances no rule recognized.

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::IntentHandler;
use crate::reply::ReplySink;

pub const UNKNOWN_REPLY: &str =
    "I'm not sure how to help with that. Try asking about the weather, time, or to open apps.";

/// Handler for the Unknown intent.
pub struct FallbackHandler;

#[async_trait]
impl IntentHandler for FallbackHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::Unknown
    }

    async fn handle(&self, _intent: &Intent, _ctx: &SessionContext, replies: &mut dyn ReplySink) {
        replies.say(UNKNOWN_REPLY.to_string());
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Suggest example commands".to_string()
    }
}
