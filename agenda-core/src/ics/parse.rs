//! ICS parsing using the icalendar crate's parser.
//!
//! Used to verify that emitted documents round-trip; the pipeline
//! itself only ever generates.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{
    parser::{read_calendar, unfold, Component},
    CalendarDateTime, DatePerhapsTime,
};

/// An event read back from an emitted document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Parse ICS content into the events it contains, in document order.
/// Returns `None` when the content is not a readable calendar.
pub fn parse_events(content: &str) -> Option<Vec<ParsedEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;

    Some(
        calendar
            .components
            .iter()
            .filter(|c| c.name == "VEVENT")
            .filter_map(parse_vevent)
            .collect(),
    )
}

fn parse_vevent(vevent: &Component) -> Option<ParsedEvent> {
    let uid = vevent.find_prop("UID")?.val.to_string();
    let summary = vevent.find_prop("SUMMARY")?.val.to_string();
    let start = to_instant(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?)?;
    let end = to_instant(DatePerhapsTime::try_from(vevent.find_prop("DTEND")?).ok()?)?;
    let location = vevent.find_prop("LOCATION").map(|p| p.val.to_string());
    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    Some(ParsedEvent {
        uid,
        summary,
        start,
        end,
        location,
        description,
    })
}

fn to_instant(value: DatePerhapsTime) -> Option<DateTime<Tz>> {
    match value {
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: Tz = tzid.parse().ok()?;
            tz.from_local_datetime(&date_time).earliest()
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            Some(dt.with_timezone(&chrono_tz::UTC))
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            chrono_tz::UTC.from_local_datetime(&naive).single()
        }
        DatePerhapsTime::Date(date) => chrono_tz::UTC
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .single(),
    }
}
