//! The output calendar aggregate.

use chrono_tz::Tz;

use crate::event::ResolvedEvent;

/// PRODID emitted in the generated calendar.
pub const PRODUCT_ID: &str = "-//Agenda Cultural BCN//agenda-cli//";

/// One retained event plus its document-unique identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub uid: String,
    pub event: ResolvedEvent,
}

/// The final ordered, deduplicated event set with document metadata.
///
/// Invariants: entries are sorted ascending by start, and no two
/// entries share a UID.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDocument {
    /// Display name (X-WR-CALNAME).
    pub name: String,
    pub product_id: String,
    /// Display timezone (X-WR-TIMEZONE); also the zone of every instant.
    pub timezone: Tz,
    pub entries: Vec<CalendarEntry>,
}

impl CalendarDocument {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deterministic event identifier: the title stripped to alphanumerics,
/// joined with the start instant as `YYYYMMDDTHHMMSS`.
pub fn event_uid(event: &ResolvedEvent) -> String {
    let title: String = event.title.chars().filter(|c| c.is_alphanumeric()).collect();
    format!("{}-{}", title, event.start.format("%Y%m%dT%H%M%S"))
}
