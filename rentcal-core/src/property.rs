//! Properties and the calendar feeds they publish.

use serde::{Deserialize, Serialize};

use crate::booking::BookingSource;

/// A rental property with up to one feed URL per platform.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub airbnb_ical_url: Option<String>,
    pub vrbo_ical_url: Option<String>,
    pub other_ical_url: Option<String>,
}

/// One feed to import, tagged with the source its bookings are attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub url: String,
    pub source: BookingSource,
}

impl Property {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Property {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Configured feeds in a fixed order (airbnb, vrbo, other).
    /// Absent and blank URLs are skipped.
    pub fn feed_sources(&self) -> Vec<FeedSource> {
        [
            (&self.airbnb_ical_url, BookingSource::Airbnb),
            (&self.vrbo_ical_url, BookingSource::Vrbo),
            (&self.other_ical_url, BookingSource::Other),
        ]
        .into_iter()
        .filter_map(|(url, source)| {
            let url = url.as_deref()?.trim();
            (!url.is_empty()).then(|| FeedSource {
                url: url.to_string(),
                source,
            })
        })
        .collect()
    }
}
