//! "Who am I" and "who are you" answers.

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::IntentHandler;
use crate::reply::ReplySink;

pub struct WhoAmIHandler;

#[async_trait]
impl IntentHandler for WhoAmIHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::WhoAmI
    }

    async fn handle(&self, _intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        replies.say(format!("You are {} from {}", ctx.user_name, ctx.city));
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Tell the user who they are".to_string()
    }
}

pub struct WhoAreYouHandler;

#[async_trait]
impl IntentHandler for WhoAreYouHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::WhoAreYou
    }

    async fn handle(&self, _intent: &Intent, ctx: &SessionContext, replies: &mut dyn ReplySink) {
        replies.say(format!(
            "I am your personal voice assistant, created for {}",
            ctx.user_name
        ));
    }

    fn describe(&self, _intent: &Intent) -> String {
        "Introduce the assistant".to_string()
    }
}
