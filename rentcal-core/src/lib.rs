//! Core of rentcal: importing booking platform calendar feeds into a
//! property's booking table.
//!
//! - `fetch` downloads a feed, `ics` parses it into [`CalendarEvent`]s
//! - `classify` separates reservations from availability blocks
//! - `reconcile` inserts each new reservation exactly once
//! - `sync` runs all of the above for every feed of a [`Property`]

pub mod booking;
pub mod classify;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod ics;
pub mod property;
pub mod reconcile;
pub mod store;
pub mod sync;

pub use booking::{Booking, BookingSource, BookingStatus, NewBooking};
pub use classify::{Classifier, EventKind, PhraseRule, PlaceholderRule};
pub use config::Settings;
pub use error::{Error, Result};
pub use event::CalendarEvent;
pub use fetch::FeedFetcher;
pub use property::{FeedSource, Property};
pub use store::{BookingStore, InsertOutcome, SqliteStore};
pub use sync::{SourceOutcome, SourceReport, SourceStats, SyncReport, SyncStage, Syncer};
