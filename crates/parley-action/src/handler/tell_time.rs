//! Current date and time, read from the session clock.

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::IntentHandler;
use crate::reply::ReplySink;

pub struct TellTimeHandler;

#[async_trait]
impl IntentHandler for TellTimeHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::TellTime
    }

    async fn handle(&self, _intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        let now = ctx.now();
        replies.say(format!(
            "Today is {} and the current time is {}",
            now.format("%B %-d, %Y"),
            now.format("%-I:%M %p")
        ));
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Tell the current date and time".to_string()
    }
}
