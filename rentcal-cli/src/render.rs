//! TUI rendering traits for rentcal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to rentcal-core types using owo_colors.

use owo_colors::OwoColorize;
use rentcal_core::{
    Booking, BookingStatus, CalendarEvent, EventKind, Property, SourceOutcome, SourceReport,
    SyncReport,
};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Property {
    fn render(&self) -> String {
        format!("🏠 {} {}", self.name, format!("({})", self.id).dimmed())
    }
}

impl Render for SourceReport {
    fn render(&self) -> String {
        match &self.outcome {
            SourceOutcome::Synced(stats) => {
                let imported = if stats.imported > 0 {
                    format!("+{} imported", stats.imported).green().to_string()
                } else {
                    "no new bookings".dimmed().to_string()
                };
                let mut line = format!(
                    "   {} {} {}",
                    self.source.to_string().bold(),
                    imported,
                    format!(
                        "({} {}, {} blocked, {} already imported)",
                        stats.events,
                        pluralize("event", stats.events),
                        stats.placeholders,
                        stats.existing
                    )
                    .dimmed()
                );
                if stats.failed > 0 {
                    line.push_str(&format!(" {}", format!("{} failed", stats.failed).red()));
                }
                line
            }
            SourceOutcome::Failed { stage, error } => format!(
                "   {} {} {}",
                self.source.to_string().bold(),
                format!("{stage:?} failed:").to_lowercase().red(),
                error.red()
            ),
        }
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        self.sources
            .iter()
            .map(Render::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for Booking {
    fn render(&self) -> String {
        let dates = format!("{} → {}", self.check_in, self.check_out);
        let status = match self.status {
            BookingStatus::Confirmed => self.status.as_str().green().to_string(),
            BookingStatus::Tentative => self.status.as_str().yellow().to_string(),
            BookingStatus::Cancelled => self.status.as_str().red().to_string(),
        };
        let notes = self.notes.as_deref().unwrap_or("");
        format!(
            "   {} {} {} {}",
            dates,
            self.source.to_string().dimmed(),
            status,
            notes
        )
        .trim_end()
        .to_string()
    }
}

/// A parsed feed event together with how it was classified.
pub struct ClassifiedEvent<'a> {
    pub event: &'a CalendarEvent,
    pub kind: EventKind,
}

impl Render for ClassifiedEvent<'_> {
    fn render(&self) -> String {
        let summary = &self.event.summary;
        let (symbol, summary) = match self.kind {
            EventKind::Booking => ("+".green().to_string(), summary.green().to_string()),
            EventKind::Placeholder => ("·".dimmed().to_string(), summary.dimmed().to_string()),
        };
        format!(
            "   {} {} {} {}",
            symbol,
            summary,
            format!(
                "{} → {} ({} {})",
                self.event.check_in,
                self.event.check_out,
                self.event.nights(),
                pluralize("night", self.event.nights().max(0) as usize)
            )
            .dimmed(),
            self.event.external_id.dimmed()
        )
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
