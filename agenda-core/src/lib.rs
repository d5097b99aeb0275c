//! Core pipeline for the cultural agenda aggregator.
//!
//! This crate turns raw venue markup into a deduplicated iCalendar
//! document. It is pure and synchronous: fetching pages and writing the
//! output file belong to the caller (agenda-cli).
//!
//! Pipeline stages, in order:
//! - `adapters`: per-venue markup extraction into [`RawCandidate`]s
//! - `resolve`: free-text date/time resolution into timezone-aware instants
//! - `window`: forward-looking retention window
//! - `aggregate`: cross-source merge, sort and deduplication
//! - `ics`: iCalendar generation (and parsing, for verification)

pub mod adapters;
pub mod aggregate;
pub mod document;
pub mod error;
pub mod event;
pub mod ics;
pub mod resolve;
pub mod window;

pub use document::{CalendarDocument, CalendarEntry};
pub use error::{AgendaError, AgendaResult};
pub use event::{RawCandidate, ResolvedEvent};
