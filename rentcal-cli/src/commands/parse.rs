use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rentcal_core::ics::parse_feed;
use rentcal_core::{BookingSource, EventKind, Settings};

use crate::render::{ClassifiedEvent, Render, pluralize};

/// Parse a feed from disk and show what a sync would import, without
/// touching the database.
pub fn run(file: &Path, source: BookingSource, settings: &Settings) -> Result<()> {
    let ics = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let events = parse_feed(&ics)?;
    let classifier = settings.classifier.classifier();

    let mut bookings = 0;
    for event in &events {
        let kind = classifier.classify(source, &event.summary);
        if kind == EventKind::Booking {
            bookings += 1;
        }
        println!("{}", ClassifiedEvent { event, kind }.render());
    }

    println!(
        "\n{} {}, {} {}",
        events.len(),
        pluralize("event", events.len()),
        bookings.green(),
        pluralize("booking", bookings)
    );
    Ok(())
}
