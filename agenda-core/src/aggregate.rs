//! Cross-source aggregation and deduplication.

use std::collections::HashSet;

use chrono_tz::Tz;

use crate::document::{event_uid, CalendarDocument, CalendarEntry, PRODUCT_ID};
use crate::event::ResolvedEvent;

/// Merge per-source event lists into the final calendar document.
///
/// Events are stable-sorted by start (ties keep source-arrival order,
/// so the configured source order acts as the tie-break), then
/// deduplicated on `(title, start rounded to the minute)` with the
/// first occurrence winning. The key is intentionally coarse: two
/// venues screening the same title at the same minute collapse to one
/// entry.
pub fn aggregate(
    per_source: Vec<Vec<ResolvedEvent>>,
    name: &str,
    timezone: Tz,
) -> CalendarDocument {
    let mut events: Vec<ResolvedEvent> = per_source.into_iter().flatten().collect();
    events.sort_by_key(|event| event.start);

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut entries = Vec::with_capacity(events.len());
    for event in events {
        let key = (
            event.title.clone(),
            event.start.format("%Y%m%d%H%M").to_string(),
        );
        if seen.insert(key) {
            entries.push(CalendarEntry {
                uid: event_uid(&event),
                event,
            });
        }
    }

    CalendarDocument {
        name: name.to_string(),
        product_id: PRODUCT_ID.to_string(),
        timezone,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone};
    use chrono_tz::Europe::Madrid;

    fn event(title: &str, start: DateTime<Tz>, location: &str) -> ResolvedEvent {
        ResolvedEvent {
            title: title.to_string(),
            start,
            end: start + Duration::hours(2),
            location: location.to_string(),
            link: "https://example.org".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn same_title_and_minute_from_two_sources_collapse_to_one() {
        let start = Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap();
        let document = aggregate(
            vec![
                vec![event("Film A", start, "Cinema One")],
                vec![event("Film A", start, "Cinema Two")],
            ],
            "Agenda",
            Madrid,
        );

        assert_eq!(document.len(), 1);
        assert_eq!(document.entries[0].event.title, "Film A");
        // First occurrence in source order wins.
        assert_eq!(document.entries[0].event.location, "Cinema One");
    }

    #[test]
    fn output_is_sorted_by_start() {
        let early = Madrid.with_ymd_and_hms(2025, 10, 2, 18, 0, 0).unwrap();
        let late = Madrid.with_ymd_and_hms(2025, 10, 5, 20, 0, 0).unwrap();
        let document = aggregate(
            vec![
                vec![event("Late", late, "A")],
                vec![event("Early", early, "B")],
            ],
            "Agenda",
            Madrid,
        );

        let titles: Vec<_> = document
            .entries
            .iter()
            .map(|e| e.event.title.as_str())
            .collect();
        assert_eq!(titles, ["Early", "Late"]);
    }

    #[test]
    fn aggregation_is_order_insensitive_after_sorting() {
        let a = event("A", Madrid.with_ymd_and_hms(2025, 10, 3, 20, 0, 0).unwrap(), "X");
        let b = event("B", Madrid.with_ymd_and_hms(2025, 10, 4, 18, 0, 0).unwrap(), "Y");
        let c = event("C", Madrid.with_ymd_and_hms(2025, 10, 4, 18, 0, 0).unwrap(), "Z");

        let forward = aggregate(
            vec![vec![a.clone(), b.clone()], vec![c.clone()]],
            "Agenda",
            Madrid,
        );
        let shuffled = aggregate(
            vec![vec![c.clone()], vec![b.clone(), a.clone()]],
            "Agenda",
            Madrid,
        );

        let starts = |d: &CalendarDocument| {
            d.entries.iter().map(|e| e.event.start).collect::<Vec<_>>()
        };
        assert_eq!(starts(&forward), starts(&shuffled));
    }

    #[test]
    fn distinct_minutes_are_not_deduplicated() {
        let start = Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap();
        let document = aggregate(
            vec![vec![
                event("Film A", start, "Cinema"),
                event("Film A", start + Duration::hours(4), "Cinema"),
            ]],
            "Agenda",
            Madrid,
        );

        assert_eq!(document.len(), 2);
    }
}
