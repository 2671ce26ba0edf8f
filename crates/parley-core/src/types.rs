use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Who produced a conversation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "You"),
            Speaker::Assistant => write!(f, "Assistant"),
        }
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// Milliseconds since the Unix epoch (UTC).
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_datetime<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// One line of the conversation. Immutable once appended to the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ConversationEntry {
    pub fn user(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            timestamp,
        }
    }

    pub fn assistant(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            timestamp,
        }
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current local date-time.
///
/// Greetings, the time-of-day answer and log timestamps all read the clock at
/// the moment they are produced; nothing caches a reading.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that always returns the instant it was last set to.
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<FixedOffset>) {
        if let Ok(mut guard) = self.instant.lock() {
            *guard = instant;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.instant.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
