//! Adapter for the Renoir Floridablanca showtimes page.
//!
//! The cartelera groups films under one date heading per day: one film
//! block lists several showtimes that all share the enclosing group's
//! date. Each showtime becomes its own candidate carrying the inherited
//! date, so a film screened at 16:00 and 20:30 yields two events.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{block_link, block_text, find_times, SourceAdapter, SourcePage};
use crate::event::RawCandidate;

static BLOCKS: Lazy<Selector> = Lazy::new(|| Selector::parse(".pelicula, .movie, .card").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".title, h2, h3").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date, .dia, .cartelera-date").unwrap());

pub struct Renoir;

impl SourceAdapter for Renoir {
    fn extract(&self, page: &SourcePage) -> Vec<RawCandidate> {
        let doc = Html::parse_document(page.html);
        doc.select(&BLOCKS)
            .flat_map(|block| extract_block(&block, page))
            .collect()
    }
}

fn extract_block(block: &ElementRef, page: &SourcePage) -> Vec<RawCandidate> {
    let Some(title) = block
        .select(&TITLE)
        .next()
        .map(|t| block_text(&t))
        .filter(|t| !t.is_empty())
    else {
        return Vec::new();
    };

    let text = block_text(block);
    // Date inherited from the enclosing day group; empty when the page
    // carries no date marker, which the resolver reads as "today".
    let date_text = inherited_date(block).unwrap_or_default();
    let link = block_link(block, page.url);

    find_times(&text)
        .into_iter()
        .map(|time| RawCandidate {
            title: title.clone(),
            date_text: date_text.clone(),
            time_text: Some(time),
            location: page.location.to_string(),
            link: link.clone(),
            raw_text: text.clone(),
        })
        .collect()
}

/// Date marker of the nearest enclosing group that carries one.
fn inherited_date(block: &ElementRef) -> Option<String> {
    let mut node = block.parent();
    while let Some(current) = node {
        if let Some(ancestor) = ElementRef::wrap(current) {
            if let Some(date_el) = ancestor.select(&DATE).next() {
                return Some(block_text(&date_el));
            }
        }
        node = current.parent();
    }
    None
}
