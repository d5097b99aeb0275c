//! Adapter for the Sala Beckett programme listing.
//!
//! Theatre shows, one item per production. Dates appear as named-month
//! text inside the item body (`15 de octubre de 2025`), occasionally
//! with a time.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{
    block_link, block_text, find_named_date, find_numeric_date, find_time, SourceAdapter,
    SourcePage,
};
use crate::event::RawCandidate;

static BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".espectacle, .item, article").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3, .title").unwrap());

pub struct Beckett;

impl SourceAdapter for Beckett {
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
    let date_text = find_named_date(&text).or_else(|| find_numeric_date(&text))?;
    let time_text = find_time(&text);

    Some(RawCandidate {
        title,
        date_text,
        time_text,
        location: page.location.to_string(),
        link: block_link(block, page.url),
        raw_text: text,
    })
}
