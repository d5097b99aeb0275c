//! ICS generation and parsing.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::{parse_events, ParsedEvent};
