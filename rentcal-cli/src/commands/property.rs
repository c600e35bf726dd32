use anyhow::Result;
use owo_colors::OwoColorize;
use rentcal_core::{Property, SqliteStore};

use crate::PropertyCommand;
use crate::render::Render;

pub async fn run(store: &SqliteStore, command: PropertyCommand) -> Result<()> {
    match command {
        PropertyCommand::Set {
            id,
            name,
            airbnb_url,
            vrbo_url,
            other_url,
        } => {
            let existing = store.get_property(&id).await?;
            let is_new = existing.is_none();
            let mut property = match (existing, name.clone()) {
                (Some(property), _) => property,
                (None, Some(name)) => Property::new(id.clone(), name),
                (None, None) => anyhow::bail!("--name is required when creating a property"),
            };

            if let Some(name) = name {
                if name.trim().is_empty() {
                    anyhow::bail!("Property name cannot be empty");
                }
                property.name = name;
            }
            merge_url(&mut property.airbnb_ical_url, airbnb_url);
            merge_url(&mut property.vrbo_ical_url, vrbo_url);
            merge_url(&mut property.other_ical_url, other_url);

            let feeds = property.feed_sources().len();
            store.upsert_property(property.clone()).await?;

            let verb = if is_new { "Created" } else { "Updated" };
            println!("{} {}", verb.green(), property.render());
            if feeds == 0 {
                println!("   {}", "No feed URLs configured yet".yellow());
            }
            Ok(())
        }
        PropertyCommand::List => {
            let properties = store.list_properties().await?;
            if properties.is_empty() {
                println!("{}", "No properties registered.".dimmed());
                return Ok(());
            }
            for property in &properties {
                println!("{}", property.render());
                for feed in property.feed_sources() {
                    let source = feed.source.to_string();
                    println!("   {} {}", source.bold(), feed.url.dimmed());
                }
            }
            Ok(())
        }
        PropertyCommand::Remove { id } => {
            if store.delete_property(&id).await? {
                println!("{} {}", "Removed".red(), id);
                Ok(())
            } else {
                anyhow::bail!("Property '{}' not found", id)
            }
        }
    }
}

/// `None` leaves the URL alone, an empty string clears it.
fn merge_url(current: &mut Option<String>, update: Option<String>) {
    if let Some(url) = update {
        let url = url.trim();
        *current = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
    }
}
