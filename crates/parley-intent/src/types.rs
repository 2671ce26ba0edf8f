//! Utterances, intents and their supporting enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Utterance
// =============================================================================

/// One recognized span of user speech.
///
/// Keeps the raw recognizer output alongside the lower-cased, trimmed form
/// that all matching runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    raw: String,
    normalized: String,
}

impl Utterance {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = raw.trim().to_lowercase();
        Self { raw, normalized }
    }

    /// Text exactly as the recognizer produced it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Lower-cased, trimmed text.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// =============================================================================
// Sites
// =============================================================================

/// Sites the assistant knows how to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteTarget {
    Youtube,
    Facebook,
    Twitter,
    Google,
    Gmail,
}

impl SiteTarget {
    pub const ALL: [SiteTarget; 5] = [
        SiteTarget::Youtube,
        SiteTarget::Facebook,
        SiteTarget::Twitter,
        SiteTarget::Google,
        SiteTarget::Gmail,
    ];

    /// Name used when speaking about the site.
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteTarget::Youtube => "YouTube",
            SiteTarget::Facebook => "Facebook",
            SiteTarget::Twitter => "Twitter",
            SiteTarget::Google => "Google",
            SiteTarget::Gmail => "Gmail",
        }
    }

    /// Fixed landing URL.
    pub fn url(&self) -> &'static str {
        match self {
            SiteTarget::Youtube => "https://youtube.com",
            SiteTarget::Facebook => "https://facebook.com",
            SiteTarget::Twitter => "https://twitter.com",
            SiteTarget::Google => "https://www.google.com",
            SiteTarget::Gmail => "https://gmail.com",
        }
    }
}

impl fmt::Display for SiteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteTarget::Youtube => write!(f, "youtube"),
            SiteTarget::Facebook => write!(f, "facebook"),
            SiteTarget::Twitter => write!(f, "twitter"),
            SiteTarget::Google => write!(f, "google"),
            SiteTarget::Gmail => write!(f, "gmail"),
        }
    }
}

impl std::str::FromStr for SiteTarget {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(SiteTarget::Youtube),
            "facebook" => Ok(SiteTarget::Facebook),
            "twitter" => Ok(SiteTarget::Twitter),
            "google" => Ok(SiteTarget::Google),
            "gmail" => Ok(SiteTarget::Gmail),
            _ => Err(format!("Unknown site: {}", s)),
        }
    }
}

// =============================================================================
// Intent
// =============================================================================

/// The classified meaning of an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Farewell,
    Weather,
    TellTime,
    OpenSite { target: SiteTarget },
    PlaySearch { query: String },
    WhoAmI,
    WhoAreYou,
    Unknown,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Farewell => IntentKind::Farewell,
            Intent::Weather => IntentKind::Weather,
            Intent::TellTime => IntentKind::TellTime,
            Intent::OpenSite { .. } => IntentKind::OpenSite,
            Intent::PlaySearch { .. } => IntentKind::PlaySearch,
            Intent::WhoAmI => IntentKind::WhoAmI,
            Intent::WhoAreYou => IntentKind::WhoAreYou,
            Intent::Unknown => IntentKind::Unknown,
        }
    }
}

/// Parameter-free discriminant of [`Intent`], used to key handler lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Farewell,
    Weather,
    TellTime,
    OpenSite,
    PlaySearch,
    WhoAmI,
    WhoAreYou,
    Unknown,
}

impl IntentKind {
    pub const ALL: [IntentKind; 8] = [
        IntentKind::Farewell,
        IntentKind::Weather,
        IntentKind::TellTime,
        IntentKind::OpenSite,
        IntentKind::PlaySearch,
        IntentKind::WhoAmI,
        IntentKind::WhoAreYou,
        IntentKind::Unknown,
    ];
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Farewell => write!(f, "farewell"),
            IntentKind::Weather => write!(f, "weather"),
            IntentKind::TellTime => write!(f, "tell_time"),
            IntentKind::OpenSite => write!(f, "open_site"),
            IntentKind::PlaySearch => write!(f, "play_search"),
            IntentKind::WhoAmI => write!(f, "who_am_i"),
            IntentKind::WhoAreYou => write!(f, "who_are_you"),
            IntentKind::Unknown => write!(f, "unknown"),
        }
    }
}
