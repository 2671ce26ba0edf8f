//! Site open handler.
//!
//! Speaks an acknowledgement, then opens the site's fixed landing URL.

use std::sync::Arc;

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::{open_link, IntentHandler, UNKNOWN_REPLY};
use crate::opener::LinkOpener;
use crate::reply::ReplySink;

pub struct SiteOpenHandler {
    opener: Arc<dyn LinkOpener>,
}

impl SiteOpenHandler {
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl IntentHandler for SiteOpenHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::OpenSite
    }

    async fn handle(&self, intent: &Intent, _ctx: &SessionContext, replies: &mut dyn ReplySink) {
        let Intent::OpenSite { target } = intent else {
            tracing::warn!(intent = %intent.kind(), "Site open handler given wrong intent");
            replies.say(UNKNOWN_REPLY.to_string());
            return;
        };

        replies.say(format!(
            "Opening {}, just wait for a while",
            target.display_name()
        ));
        open_link(self.opener.as_ref(), target.url());
    }

    fn describe(&self, intent: &Intent) -> String {
        match intent {
            Intent::OpenSite { target } => format!("Open URL: {}", target.url()),
            _ => "Open URL: <no url>".to_string(),
        }
    }
}
