//! Ordered conversation history.

use parley_core::types::{ConversationEntry, Speaker};

/// Append-only record of the conversation, in the order turns happened.
///
/// With a limit set, the oldest entries are dropped once the log grows past
/// it. Entries that remain are never modified or reordered.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    /// Index of the oldest retained entry. Everything before it is dropped.
    start: usize,
    limit: Option<usize>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log keeping at most `limit` entries. `None` or zero keeps everything.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            start: 0,
            limit: limit.filter(|n| *n > 0),
        }
    }

    pub fn append(&mut self, entry: ConversationEntry) {
        tracing::trace!(speaker = %entry.speaker, text = %entry.text, "Conversation entry");
        self.entries.push(entry);
        let Some(limit) = self.limit else {
            return;
        };
        if self.entries.len() - self.start > limit {
            self.start += 1;
        }
        // Compact once the dropped prefix reaches the limit. Keeps append
        // amortized O(1).
        if self.start >= limit {
            self.entries.drain(..self.start);
            self.start = 0;
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries[self.start..]
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries().last()
    }

    /// Entries spoken by `speaker`, in order.
    pub fn by_speaker(&self, speaker: Speaker) -> impl Iterator<Item = &ConversationEntry> {
        self.entries().iter().filter(move |e| e.speaker == speaker)
    }
}
