//! Venue source adapters.
//!
//! One adapter per venue, all behind [`SourceAdapter`]. Adapters only
//! extract: they locate the repeating event blocks in a page's markup
//! and hand back raw candidates with the date/time still as free text.
//! Resolution, filtering and deduplication are pipeline stages, never
//! adapter responsibilities.
//!
//! A block that does not match the expected shape (no title, no date
//! fragment) is skipped; it never aborts extraction of the remaining
//! blocks on the page.

mod beckett;
mod cccb;
mod renoir;
mod zumzeig;

pub use beckett::Beckett;
pub use cccb::Cccb;
pub use renoir::Renoir;
pub use zumzeig::Zumzeig;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::Deserialize;
use url::Url;

use crate::event::RawCandidate;

/// A fetched venue page handed to an adapter. The core never fetches;
/// the caller supplies the markup together with the page URL (for
/// resolving relative links) and the venue label.
#[derive(Debug, Clone, Copy)]
pub struct SourcePage<'a> {
    pub url: &'a str,
    pub location: &'a str,
    pub html: &'a str,
}

/// Extracts raw candidates from one venue's markup.
pub trait SourceAdapter {
    fn extract(&self, page: &SourcePage) -> Vec<RawCandidate>;
}

/// Adapter selection key, as written in the `adapter` config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    Zumzeig,
    Beckett,
    Renoir,
    Cccb,
}

impl AdapterKind {
    pub fn adapter(&self) -> Box<dyn SourceAdapter> {
        match self {
            AdapterKind::Zumzeig => Box::new(Zumzeig),
            AdapterKind::Beckett => Box::new(Beckett),
            AdapterKind::Renoir => Box::new(Renoir),
            AdapterKind::Cccb => Box::new(Cccb),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Zumzeig => "zumzeig",
            AdapterKind::Beckett => "beckett",
            AdapterKind::Renoir => "renoir",
            AdapterKind::Cccb => "cccb",
        }
    }
}

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

static TIME_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}[:h]\d{2}\b").unwrap());

static NUMERIC_DATE_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}\b").unwrap());

static NAMED_DATE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}\s*(?:de\s+|d['’]\s*)?\p{L}{3,}\.?(?:\s+(?:de\s+|del\s+)?\d{4})?")
        .unwrap()
});

/// The element's text content, whitespace-collapsed.
pub(crate) fn block_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First outbound link inside the block, resolved against the page
/// URL; falls back to the page URL itself when the block has none.
pub(crate) fn block_link(el: &ElementRef, page_url: &str) -> String {
    let href = el
        .value()
        .attr("href")
        .or_else(|| el.select(&ANCHOR).filter_map(|a| a.value().attr("href")).next());

    href.and_then(|href| Url::parse(page_url).ok()?.join(href).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| page_url.to_string())
}

/// First `HH:MM`/`HHhMM` fragment in the text.
pub(crate) fn find_time(text: &str) -> Option<String> {
    TIME_TEXT.find(text).map(|m| m.as_str().to_string())
}

/// Every `HH:MM`/`HHhMM` fragment in the text, in order. Venues that
/// list several showtimes per block yield one fragment per showtime.
pub(crate) fn find_times(text: &str) -> Vec<String> {
    TIME_TEXT
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First day-first numeric date fragment (`26/10/2025`, `3.11.25`).
pub(crate) fn find_numeric_date(text: &str) -> Option<String> {
    NUMERIC_DATE_TEXT.find(text).map(|m| m.as_str().to_string())
}

/// First named-month date fragment (`15 octubre 2025`, `3 de març`).
/// Loose by design: the resolver validates the month name and drops
/// candidates whose fragment turns out not to be a date.
pub(crate) fn find_named_date(text: &str) -> Option<String> {
    NAMED_DATE_TEXT.find(text).map(|m| m.as_str().to_string())
}
