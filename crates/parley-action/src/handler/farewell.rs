//! Farewell handler.
//!
//! Only speaks. Stopping capture and ending the session is the session's job
//! once it sees a Farewell intent.

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::IntentHandler;
use crate::reply::ReplySink;

pub struct FarewellHandler;

#[async_trait]
impl IntentHandler for FarewellHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::Farewell
    }

    async fn handle(&self, _intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        replies.say(format!(
            "Goodbye {}! Have a great day in {}!",
            ctx.user_name, ctx.city
        ));
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Say goodbye and end the session".to_string()
    }
}
