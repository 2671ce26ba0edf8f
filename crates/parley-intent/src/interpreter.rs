//! Ordered keyword rules mapping utterances to intents.
//!
//! Rules are evaluated top to bottom against the normalized text and the
//! first match wins. Matching is plain substring containment: "playground"
//! satisfies the play rule, "overtime" satisfies the time rule.

use regex::Regex;

use crate::types::{Intent, SiteTarget, Utterance};

/// A single rule: a keyword predicate linked to an intent constructor.
pub struct IntentRule {
    pub name: &'static str,
    matcher: Regex,
    build: fn(&Utterance) -> Intent,
}

impl IntentRule {
    /// Build a rule that matches when the text contains any of `keywords`.
    pub fn keywords(name: &'static str, keywords: &[&str], build: fn(&Utterance) -> Intent) -> Self {
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            name,
            matcher: Regex::new(&alternation).expect("Invalid keyword regex"),
            build,
        }
    }

    pub fn matches(&self, utterance: &Utterance) -> bool {
        !utterance.is_empty() && self.matcher.is_match(utterance.normalized())
    }

    pub fn build(&self, utterance: &Utterance) -> Intent {
        (self.build)(utterance)
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("name", &self.name)
            .field("matcher", &self.matcher.as_str())
            .finish()
    }
}

/// Classifies utterances with a fixed-priority rule table.
#[derive(Debug)]
pub struct CommandInterpreter {
    rules: Vec<IntentRule>,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandInterpreter {
    /// Create an interpreter with the built-in rule table, highest priority first.
    pub fn new() -> Self {
        let rules = vec![
            IntentRule::keywords("farewell", &["good bye", "ok bye", "turn off"], |_| {
                Intent::Farewell
            }),
            IntentRule::keywords("weather", &["weather"], |_| Intent::Weather),
            IntentRule::keywords("tell_time", &["time"], |_| Intent::TellTime),
            // Must precede "play": a request to open youtube is not a search.
            IntentRule::keywords("open_youtube", &["open youtube"], |_| Intent::OpenSite {
                target: SiteTarget::Youtube,
            }),
            IntentRule::keywords("play_search", &["play"], play_search),
            IntentRule::keywords("open_facebook", &["open facebook"], |_| Intent::OpenSite {
                target: SiteTarget::Facebook,
            }),
            IntentRule::keywords("open_twitter", &["open twitter", "open x"], |_| {
                Intent::OpenSite {
                    target: SiteTarget::Twitter,
                }
            }),
            IntentRule::keywords("open_google", &["open google"], |_| Intent::OpenSite {
                target: SiteTarget::Google,
            }),
            IntentRule::keywords("open_gmail", &["open gmail"], |_| Intent::OpenSite {
                target: SiteTarget::Gmail,
            }),
            IntentRule::keywords("who_am_i", &["my name", "who am i"], |_| Intent::WhoAmI),
            IntentRule::keywords("who_are_you", &["your name", "who are you"], |_| {
                Intent::WhoAreYou
            }),
        ];
        Self { rules }
    }

    /// Classify an utterance. Falls back to [`Intent::Unknown`] when no rule matches.
    pub fn interpret(&self, utterance: &Utterance) -> Intent {
        match self.rules.iter().find(|rule| rule.matches(utterance)) {
            Some(rule) => {
                tracing::debug!(rule = rule.name, text = %utterance.normalized(), "Intent rule matched");
                rule.build(utterance)
            }
            None => {
                tracing::debug!(text = %utterance.normalized(), "No intent rule matched");
                Intent::Unknown
            }
        }
    }

    /// Names of every rule that matches, in priority order.
    pub fn matching_rules(&self, utterance: &Utterance) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(utterance))
            .map(|rule| rule.name)
            .collect()
    }

    /// The rule table, highest priority first.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

/// Everything except the first "play" is the search query.
fn play_search(utterance: &Utterance) -> Intent {
    let query = utterance
        .normalized()
        .replacen("play", "", 1)
        .trim()
        .to_string();
    Intent::PlaySearch { query }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpret(text: &str) -> Intent {
        CommandInterpreter::new().interpret(&Utterance::new(text))
    }

    // =====================================================================
    // Individual rules
    // =====================================================================

    #[test]
    fn test_farewell_phrases() {
        assert_eq!(interpret("good bye assistant"), Intent::Farewell);
        assert_eq!(interpret("ok bye"), Intent::Farewell);
        assert_eq!(interpret("please turn off"), Intent::Farewell);
    }

    #[test]
    fn test_bare_stop_is_not_farewell() {
        assert_eq!(interpret("stop"), Intent::Unknown);
    }

    #[test]
    fn test_weather_any_case_any_context() {
        assert_eq!(interpret("What's the WEATHER like?"), Intent::Weather);
        assert_eq!(interpret("weather"), Intent::Weather);
        assert_eq!(interpret("tell me about the weatherman"), Intent::Weather);
    }

    #[test]
    fn test_weather_beats_lower_priority_keywords() {
        assert_eq!(interpret("weather at this time, play it"), Intent::Weather);
    }

    #[test]
    fn test_time() {
        assert_eq!(interpret("what time is it"), Intent::TellTime);
        assert_eq!(interpret("Sometimes I wonder"), Intent::TellTime);
    }

    #[test]
    fn test_open_youtube() {
        assert_eq!(
            interpret("Open YouTube"),
            Intent::OpenSite {
                target: SiteTarget::Youtube
            }
        );
    }

    #[test]
    fn test_play_extracts_query() {
        assert_eq!(
            interpret("PLAY bohemian rhapsody"),
            Intent::PlaySearch {
                query: "bohemian rhapsody".to_string()
            }
        );
    }

    #[test]
    fn test_play_removes_only_first_occurrence() {
        assert_eq!(
            interpret("play play that funky music"),
            Intent::PlaySearch {
                query: "play that funky music".to_string()
            }
        );
    }

    #[test]
    fn test_play_is_substring_match() {
        assert_eq!(
            interpret("take me to the playground"),
            Intent::PlaySearch {
                query: "take me to the ground".to_string()
            }
        );
    }

    #[test]
    fn test_play_alone_yields_empty_query() {
        assert_eq!(
            interpret("play"),
            Intent::PlaySearch {
                query: String::new()
            }
        );
    }

    #[test]
    fn test_open_sites() {
        let cases = [
            ("open facebook", SiteTarget::Facebook),
            ("open twitter now", SiteTarget::Twitter),
            ("open x", SiteTarget::Twitter),
            ("could you open google", SiteTarget::Google),
            ("open gmail", SiteTarget::Gmail),
        ];
        for (text, target) in cases {
            assert_eq!(interpret(text), Intent::OpenSite { target }, "{}", text);
        }
    }

    #[test]
    fn test_who_am_i() {
        assert_eq!(interpret("what is my name"), Intent::WhoAmI);
        assert_eq!(interpret("Who am I?"), Intent::WhoAmI);
    }

    #[test]
    fn test_who_are_you() {
        assert_eq!(interpret("what's your name"), Intent::WhoAreYou);
        assert_eq!(interpret("who are you"), Intent::WhoAreYou);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(interpret("tell me a joke"), Intent::Unknown);
        assert_eq!(interpret(""), Intent::Unknown);
        assert_eq!(interpret("   "), Intent::Unknown);
    }

    // =====================================================================
    // Priority
    // =====================================================================

    #[test]
    fn test_farewell_precedes_weather() {
        assert_eq!(interpret("good bye, and the weather?"), Intent::Farewell);
    }

    #[test]
    fn test_time_precedes_play() {
        assert_eq!(interpret("play something, what time is it"), Intent::TellTime);
    }

    #[test]
    fn test_open_youtube_precedes_play() {
        assert_eq!(
            interpret("open youtube and play jazz"),
            Intent::OpenSite {
                target: SiteTarget::Youtube
            }
        );
    }

    #[test]
    fn test_play_precedes_other_sites() {
        assert_eq!(
            interpret("open google play store"),
            Intent::PlaySearch {
                query: "open google  store".to_string()
            }
        );
    }

    #[test]
    fn test_my_name_precedes_your_name() {
        assert_eq!(interpret("my name and your name"), Intent::WhoAmI);
    }

    #[test]
    fn test_matching_rules_in_priority_order() {
        let interpreter = CommandInterpreter::new();
        let names = interpreter.matching_rules(&Utterance::new("good bye, weather at play time"));
        assert_eq!(names, vec!["farewell", "weather", "tell_time", "play_search"]);
    }

    #[test]
    fn test_matching_rules_empty_for_unknown() {
        let interpreter = CommandInterpreter::new();
        assert!(interpreter
            .matching_rules(&Utterance::new("tell me a joke"))
            .is_empty());
    }

    #[test]
    fn test_rule_table_order() {
        let interpreter = CommandInterpreter::new();
        let names: Vec<_> = interpreter.rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "farewell",
                "weather",
                "tell_time",
                "open_youtube",
                "play_search",
                "open_facebook",
                "open_twitter",
                "open_google",
                "open_gmail",
                "who_am_i",
                "who_are_you",
            ]
        );
    }

    #[test]
    fn test_keywords_are_literal() {
        let rule = IntentRule::keywords("dots", &["a.b"], |_| Intent::Unknown);
        assert!(rule.matches(&Utterance::new("a.b")));
        assert!(!rule.matches(&Utterance::new("axb")));
    }
}
