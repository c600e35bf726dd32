//! Booking records owned by a property.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a booking came from.
///
/// For feed imports this is decided by which of the property's URL fields
/// supplied the feed, never by the feed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingSource {
    Airbnb,
    Vrbo,
    Direct,
    Other,
}

impl BookingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingSource::Airbnb => "airbnb",
            BookingSource::Vrbo => "vrbo",
            BookingSource::Direct => "direct",
            BookingSource::Other => "other",
        }
    }
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "airbnb" => Ok(BookingSource::Airbnb),
            "vrbo" => Ok(BookingSource::Vrbo),
            "direct" => Ok(BookingSource::Direct),
            "other" => Ok(BookingSource::Other),
            other => Err(format!(
                "Unknown booking source '{other}'. Expected airbnb, vrbo, direct or other"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Tentative => "tentative",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "tentative" => Ok(BookingStatus::Tentative),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("Unknown booking status '{other}'")),
        }
    }
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub property_id: String,
    pub source: BookingSource,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Identifier of the feed event this booking was imported from.
    /// Unique per property.
    pub external_id: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A booking that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub property_id: String,
    pub source: BookingSource,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub external_id: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
}

impl NewBooking {
    /// Assign an id and creation time.
    pub fn into_booking(self) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            property_id: self.property_id,
            source: self.source,
            check_in: self.check_in,
            check_out: self.check_out,
            external_id: self.external_id,
            notes: self.notes,
            status: self.status,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} ({}, {})",
            self.check_in,
            self.check_out,
            self.source,
            self.status.as_str()
        )?;
        if let Some(notes) = &self.notes {
            write!(f, " {notes}")?;
        }
        Ok(())
    }
}
