//! Turning feed events into bookings without duplicating earlier imports.

use tracing::debug;

use crate::booking::{Booking, BookingSource, BookingStatus, NewBooking};
use crate::error::Result;
use crate::event::{CalendarEvent, DEFAULT_SUMMARY};
use crate::store::{BookingStore, InsertOutcome};

/// Summaries that carry no information worth keeping as notes.
const GENERIC_LABELS: &[&str] = &[DEFAULT_SUMMARY, "Reserved"];

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    Imported(Booking),
    /// Already imported on an earlier run (or by a concurrent one).
    Existing,
}

/// Make sure a booking exists for `event`, creating it if needed.
///
/// Never modifies or removes stored bookings.
pub async fn reconcile(
    store: &dyn BookingStore,
    property_id: &str,
    event: &CalendarEvent,
    source: BookingSource,
) -> Result<Reconciled> {
    if store
        .find_booking(property_id, &event.external_id)
        .await?
        .is_some()
    {
        debug!(property_id, external_id = %event.external_id, "Booking already imported");
        return Ok(Reconciled::Existing);
    }

    let booking = NewBooking {
        property_id: property_id.to_string(),
        source,
        check_in: event.check_in,
        check_out: event.check_out,
        external_id: Some(event.external_id.clone()),
        notes: notes_for(&event.summary),
        status: BookingStatus::Confirmed,
    };

    match store.insert_booking(booking).await? {
        InsertOutcome::Inserted(booking) => {
            debug!(property_id, external_id = %event.external_id, "Imported booking");
            Ok(Reconciled::Imported(booking))
        }
        // Lost a race with another sync between the check and the insert.
        InsertOutcome::AlreadyExists => Ok(Reconciled::Existing),
    }
}

fn notes_for(summary: &str) -> Option<String> {
    let summary = summary.trim();
    if summary.is_empty()
        || GENERIC_LABELS
            .iter()
            .any(|label| label.eq_ignore_ascii_case(summary))
    {
        None
    } else {
        Some(summary.to_string())
    }
}
