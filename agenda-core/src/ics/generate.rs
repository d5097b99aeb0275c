//! ICS document generation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarDateTime, Component, EventLike, Property};

use crate::document::CalendarDocument;
use crate::error::{AgendaError, AgendaResult};

/// Generate the full .ics content for a calendar document.
///
/// Deterministic: the same document always produces the same bytes
/// (DTSTAMP is derived from the event start, not from the wall clock),
/// and the input document is never mutated.
pub fn generate_ics(document: &CalendarDocument) -> AgendaResult<String> {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", &document.name));
    cal.append_property(Property::new("X-WR-TIMEZONE", document.timezone.name()));

    let mut seen_uids: HashSet<&str> = HashSet::new();

    for entry in &document.entries {
        // Document invariant: identifiers are unique.
        if !seen_uids.insert(&entry.uid) {
            return Err(AgendaError::IcsGenerate(format!(
                "duplicate UID '{}'",
                entry.uid
            )));
        }

        let event = &entry.event;
        let mut vevent = icalendar::Event::new();
        vevent.uid(&entry.uid);
        vevent.summary(&event.title);

        // DTSTAMP - required by RFC 5545; derived from the start so the
        // output is reproducible across runs.
        let dtstamp = event
            .start
            .with_timezone(&Utc)
            .format("%Y%m%dT%H%M%SZ")
            .to_string();
        vevent.add_property("DTSTAMP", &dtstamp);

        vevent.starts(with_timezone(event.start));
        vevent.ends(with_timezone(event.end));

        // The outbound link rides along in the description.
        let description = if event.link.is_empty() {
            event.description.clone()
        } else {
            format!("{}\n\n{}", event.description, event.link)
        };
        vevent.description(&description);
        vevent.location(&event.location);

        cal.push(vevent.done());
    }

    let cal = cal.done();
    Ok(rewrite_header(&cal.to_string(), &document.product_id))
}

/// Express an instant as a local datetime with an explicit TZID.
fn with_timezone(dt: DateTime<Tz>) -> CalendarDateTime {
    CalendarDateTime::WithTimezone {
        date_time: dt.naive_local(),
        tzid: dt.timezone().name().to_string(),
    }
}

/// Clean up the icalendar crate's raw output:
/// - Replace the crate's PRODID with ours
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn rewrite_header(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(product_id);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{event_uid, CalendarEntry, PRODUCT_ID};
    use crate::event::ResolvedEvent;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Europe::Madrid;

    fn document(entries: Vec<CalendarEntry>) -> CalendarDocument {
        CalendarDocument {
            name: "Agenda Cultural BCN".to_string(),
            product_id: PRODUCT_ID.to_string(),
            timezone: Madrid,
            entries,
        }
    }

    fn entry(title: &str) -> CalendarEntry {
        let start = Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap();
        let event = ResolvedEvent {
            title: title.to_string(),
            start,
            end: start + Duration::hours(2),
            location: "Cinema Zumzeig".to_string(),
            link: "https://example.org/film".to_string(),
            description: "Film A session".to_string(),
        };
        CalendarEntry {
            uid: event_uid(&event),
            event,
        }
    }

    #[test]
    fn empty_document_is_well_formed() {
        let ics = generate_ics(&document(vec![])).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("VERSION:2.0"));
        assert!(ics.contains("PRODID:-//Agenda Cultural BCN//agenda-cli//"));
        assert!(ics.contains("X-WR-CALNAME:Agenda Cultural BCN"));
        assert!(ics.contains("X-WR-TIMEZONE:Europe/Madrid"));
        assert!(!ics.contains("BEGIN:VEVENT"));
        assert!(!ics.contains("CALSCALE"));
    }

    #[test]
    fn event_fields_are_emitted_with_tzid() {
        let ics = generate_ics(&document(vec![entry("Film A")])).unwrap();

        assert!(ics.contains("SUMMARY:Film A"));
        assert!(ics.contains("DTSTART;TZID=Europe/Madrid:20251026T160000"));
        assert!(ics.contains("DTEND;TZID=Europe/Madrid:20251026T180000"));
        assert!(ics.contains("LOCATION:Cinema Zumzeig"));
        assert!(ics.contains("UID:FilmA-20251026T160000"));
    }

    #[test]
    fn description_carries_the_outbound_link() {
        let ics = generate_ics(&document(vec![entry("Film A")])).unwrap();

        assert!(ics.contains("https://example.org/film"));
    }

    #[test]
    fn duplicate_uids_are_rejected() {
        let result = generate_ics(&document(vec![entry("Film A"), entry("Film A")]));

        assert!(result.is_err());
    }

    #[test]
    fn output_is_deterministic() {
        let doc = document(vec![entry("Film A"), entry("Film B")]);

        assert_eq!(generate_ics(&doc).unwrap(), generate_ics(&doc).unwrap());
    }
}
