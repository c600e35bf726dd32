use anyhow::Result;
use owo_colors::OwoColorize;
use rentcal_core::{BookingStore, Error, SqliteStore};

use crate::render::{Render, pluralize};

pub async fn run(store: &SqliteStore, property_id: &str) -> Result<()> {
    let property = store
        .get_property(property_id)
        .await?
        .ok_or_else(|| Error::PropertyNotFound(property_id.to_string()))?;
    let bookings = store.list_bookings(property_id).await?;

    println!("{}", property.render());

    if bookings.is_empty() {
        println!("   {}", "No bookings imported yet".dimmed());
        return Ok(());
    }

    for booking in &bookings {
        println!("{}", booking.render());
    }
    println!(
        "\n{} {}",
        bookings.len(),
        pluralize("booking", bookings.len())
    );
    Ok(())
}
