//! Adapter for the Zumzeig cinema calendar page.
//!
//! The page lists one card per session. Cards usually carry a date
//! element; when they don't, the date is fished out of the card text.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{
    block_link, block_text, find_named_date, find_numeric_date, find_time, SourceAdapter,
    SourcePage,
};
use crate::event::RawCandidate;

static BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".cartelera__element, .entry, article, .film").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3, .title, .film-title").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date, .fecha, .session-date").unwrap());

pub struct Zumzeig;

impl SourceAdapter for Zumzeig {
    fn extract(&self, page: &SourcePage) -> Vec<RawCandidate> {
        let doc = Html::parse_document(page.html);
        doc.select(&BLOCKS)
            .filter_map(|block| extract_block(&block, page))
            .collect()
    }
}

fn extract_block(block: &ElementRef, page: &SourcePage) -> Option<RawCandidate> {
    let title = block
        .select(&TITLE)
        .next()
        .map(|t| block_text(&t))
        .filter(|t| !t.is_empty())?;

    let text = block_text(block);
    let time_text = find_time(&text);

    let date_text = match block.select(&DATE).next() {
        Some(el) => block_text(&el),
        None => find_numeric_date(&text).or_else(|| find_named_date(&text))?,
    };

    Some(RawCandidate {
        title,
        date_text,
        time_text,
        location: page.location.to_string(),
        link: block_link(block, page.url),
        raw_text: text,
    })
}
