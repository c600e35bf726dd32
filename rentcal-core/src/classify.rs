//! Telling real reservations apart from availability blocks.
//!
//! Platforms publish host blackout periods with the same event shape as
//! paid stays. Only the summary text differs, so classification is a set
//! of phrase rules that can be extended per platform without touching the
//! reconciler.

use crate::booking::BookingSource;

/// Phrases platforms use for blocked dates, matched case-insensitively
/// as substrings. "Reserved" is deliberately absent: Airbnb uses it for
/// real reservations.
pub const DEFAULT_PLACEHOLDER_PHRASES: &[&str] = &[
    "blocked",
    "not available",
    "unavailable",
    "airbnb (not available)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Booking,
    Placeholder,
}

/// A predicate that recognises placeholder events.
pub trait PlaceholderRule: Send + Sync {
    fn matches(&self, source: BookingSource, summary: &str) -> bool;
}

/// Case-insensitive substring match against a list of phrases,
/// optionally limited to one platform.
#[derive(Debug, Clone)]
pub struct PhraseRule {
    phrases: Vec<String>,
    source: Option<BookingSource>,
}

impl PhraseRule {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        PhraseRule {
            phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            source: None,
        }
    }

    /// Only apply this rule to feeds from `source`.
    pub fn for_source(mut self, source: BookingSource) -> Self {
        self.source = Some(source);
        self
    }
}

impl PlaceholderRule for PhraseRule {
    fn matches(&self, source: BookingSource, summary: &str) -> bool {
        if self.source.is_some_and(|s| s != source) {
            return false;
        }
        let summary = summary.to_lowercase();
        self.phrases.iter().any(|p| summary.contains(p.as_str()))
    }
}

/// Runs every rule; any match makes the event a placeholder.
pub struct Classifier {
    rules: Vec<Box<dyn PlaceholderRule>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::empty().with_rule(PhraseRule::new(DEFAULT_PLACEHOLDER_PHRASES))
    }
}

impl Classifier {
    /// A classifier that treats every event as a booking.
    pub fn empty() -> Self {
        Classifier { rules: Vec::new() }
    }

    /// Default rules plus extra phrases that apply to every platform.
    pub fn with_extra_phrases(extra: &[String]) -> Self {
        let classifier = Classifier::default();
        if extra.is_empty() {
            classifier
        } else {
            classifier.with_rule(PhraseRule::new(extra))
        }
    }

    pub fn with_rule(mut self, rule: impl PlaceholderRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn classify(&self, source: BookingSource, summary: &str) -> EventKind {
        if self.rules.iter().any(|r| r.matches(source, summary)) {
            EventKind::Placeholder
        } else {
            EventKind::Booking
        }
    }

    pub fn is_placeholder(&self, source: BookingSource, summary: &str) -> bool {
        self.classify(source, summary) == EventKind::Placeholder
    }
}
