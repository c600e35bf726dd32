//! Events read from a booking platform's calendar feed.
//!
//! A `CalendarEvent` only lives for the duration of one sync: the parser
//! produces it, the classifier and reconciler decide what to do with it,
//! and then it is dropped.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary used when a feed event has no SUMMARY.
pub const DEFAULT_SUMMARY: &str = "Blocked";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Feed UID, or a stand-in built from DTSTART and SUMMARY when the feed has none.
    pub external_id: String,
    pub summary: String,
    /// Calendar day of DTSTART, as written in the feed.
    pub check_in: NaiveDate,
    /// Calendar day of DTEND, as written in the feed.
    pub check_out: NaiveDate,
    pub description: Option<String>,
}

impl CalendarEvent {
    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} → {})",
            self.summary, self.check_in, self.check_out
        )
    }
}
