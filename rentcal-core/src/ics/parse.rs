//! Feed parsing using the icalendar crate's parser.

use chrono::{NaiveDate, NaiveDateTime};
use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{CalendarEvent, DEFAULT_SUMMARY};

/// Parse a whole feed into events, in document order.
///
/// A document that is not a complete VCALENDAR fails as a whole; callers
/// never see a partial list from a corrupt feed.
pub fn parse_feed(content: &str) -> Result<Vec<CalendarEvent>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let unfolded = unfold(content);
    ensure_calendar_document(&unfolded)?;

    let calendar = read_calendar(&unfolded).map_err(|e| Error::IcsParse(e.to_string()))?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    Ok(vevents.into_iter().filter_map(to_calendar_event).collect())
}

fn ensure_calendar_document(content: &str) -> Result<()> {
    let trimmed = content.trim();
    let upper = trimmed.to_ascii_uppercase();

    if !upper.starts_with("BEGIN:VCALENDAR") {
        return Err(Error::IcsParse("Document does not start with BEGIN:VCALENDAR".into()));
    }
    if !upper.ends_with("END:VCALENDAR") {
        return Err(Error::IcsParse(
            "Document does not end with END:VCALENDAR (truncated feed?)".into(),
        ));
    }
    Ok(())
}

/// Depth-first walk so VEVENTs are found wherever they are nested.
fn collect_vevents<'c, 'a>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        }
        collect_vevents(&component.components, out);
    }
}

fn to_calendar_event(vevent: &Component<'_>) -> Option<CalendarEvent> {
    let (Some(dtstart), Some(dtend)) = (vevent.find_prop("DTSTART"), vevent.find_prop("DTEND"))
    else {
        debug!(
            uid = vevent.find_prop("UID").map(|p| p.val.as_ref()),
            "Skipping event without DTSTART/DTEND"
        );
        return None;
    };

    let (Some(check_in), Some(check_out)) = (calendar_day(dtstart), calendar_day(dtend)) else {
        debug!(
            start = dtstart.val.as_ref(),
            end = dtend.val.as_ref(),
            "Skipping event with unreadable dates"
        );
        return None;
    };

    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());

    let external_id = vevent
        .find_prop("UID")
        .map(|p| p.val.as_ref().trim().to_string())
        .filter(|uid| !uid.is_empty())
        .unwrap_or_else(|| format!("{}-{}", dtstart.val.as_ref().trim(), summary));

    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));

    Some(CalendarEvent {
        external_id,
        summary,
        check_in,
        check_out,
        description,
    })
}

/// Read the calendar day a DTSTART/DTEND declares.
///
/// Handles:
/// - VALUE=DATE: `DTSTART;VALUE=DATE:20240601`
/// - UTC: `DTSTART:20240601T150000Z`
/// - TZID parameter: `DTSTART;TZID=Europe/Lisbon:20240601T150000`
/// - Floating: `DTSTART:20240601T150000`
///
/// The date is taken as written. No timezone conversion happens, so an
/// event never moves to a neighbouring day.
fn calendar_day(prop: &Property<'_>) -> Option<NaiveDate> {
    let value = prop.val.as_ref().trim();

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"))
        || value.len() == 8;

    if is_date {
        NaiveDate::parse_from_str(value, "%Y%m%d").ok()
    } else {
        NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
            .ok()
            .map(|dt| dt.date())
    }
}

/// Undo RFC 5545 TEXT escaping (`\,` `\;` `\n` `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
