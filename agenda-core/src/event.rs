//! Pipeline data model.
//!
//! `RawCandidate` is what an adapter extracts from one event block on a
//! venue page. `ResolvedEvent` is the same listing after its free-text
//! date/time has been resolved into timezone-aware instants. Both are
//! immutable once produced: everything downstream of the resolver is a
//! pure transformation over an unchanging set of events.

use chrono::DateTime;
use chrono_tz::Tz;

/// One listing as extracted from a venue page, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate {
    pub title: String,
    /// Free-form date fragment in the venue's own language and format.
    pub date_text: String,
    /// Separate time fragment (`HH:MM` or `HHhMM`), when the markup
    /// carries one apart from the date.
    pub time_text: Option<String>,
    /// Venue label, constant per adapter.
    pub location: String,
    /// Block-local detail link, or the source index URL as fallback.
    pub link: String,
    /// Full extracted block text, kept for the calendar description.
    pub raw_text: String,
}

/// A listing with resolved start/end instants.
///
/// Invariants: `start < end`, and `start` always carries the configured
/// target timezone regardless of what the source text said.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: String,
    pub link: String,
    pub description: String,
}
