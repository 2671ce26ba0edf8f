//! Play handler: acknowledges, then opens a YouTube search for the query.

use std::sync::Arc;

use async_trait::async_trait;
use parley_intent::{Intent, IntentKind};

use crate::context::SessionContext;
use crate::handler::{open_link, IntentHandler, UNKNOWN_REPLY};
use crate::opener::LinkOpener;
use crate::reply::ReplySink;

const SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// YouTube search URL with `query` percent-encoded.
///
/// Only unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through, so
/// `!'()*` are escaped too.
pub fn search_url(query: &str) -> String {
    format!("{}{}", SEARCH_URL, urlencoding::encode(query))
}

pub struct PlaySearchHandler {
    opener: Arc<dyn LinkOpener>,
}

impl PlaySearchHandler {
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl IntentHandler for PlaySearchHandler {
    fn intent_kind(&self) -> IntentKind {
        IntentKind::PlaySearch
    }

    async fn handle(&self, intent: &Intent, _ctx: &SessionContext, replies: &mut dyn ReplySink) {
        let Intent::PlaySearch { query } = intent else {
            tracing::warn!(intent = %intent.kind(), "Play handler given wrong intent");
            replies.say(UNKNOWN_REPLY.to_string());
            return;
        };

        // An empty query still opens the bare results page.
        replies.say(format!("Playing {} on YouTube", query));
        open_link(self.opener.as_ref(), &search_url(query));
    }

    fn describe(&self, intent: &Intent) -> String {
        match intent {
            Intent::PlaySearch { query } => format!("Search YouTube for: {}", query),
            _ => "Search YouTube".to_string(),
        }
    }
}
