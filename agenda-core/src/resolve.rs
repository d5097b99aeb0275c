//! Free-text date/time resolution.
//!
//! Venue pages publish dates in whatever format their CMS produces:
//! day-first numerics (`26/10/2025`, `3.11.25`), named months in
//! Spanish or Catalan (`15 octubre 2025`, `3 de març`), sometimes just
//! a time with the date implied by the page. The resolver turns those
//! fragments into a timezone-aware instant, or gives up with `None` so
//! the caller can drop the candidate. It never errors: a wrong parse
//! would silently produce a wrong calendar entry, so anything that does
//! not match a known shape is rejected.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::{RawCandidate, ResolvedEvent};
use crate::window::in_window;

/// Day-first numeric date: `26/10/2025`, `3.11.25`, `26-10` (year optional).
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})(?:[/.\-](\d{2,4}))?\b").unwrap());

/// Named-month date: `15 octubre 2025`, `3 de març`, `1 d'agost del 2026`.
static NAMED_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s*(?:de\s+|d['’]\s*)?(\p{L}{3,})\.?(?:\s+(?:de\s+|del\s+)?(\d{4}))?")
        .unwrap()
});

/// Time of day: `16:00` or the `16h00` form some venues use.
static TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})[:h](\d{2})\b").unwrap());

/// Process-wide resolution settings, immutable after startup.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Target timezone every resolved instant is expressed in.
    pub timezone: Tz,
    /// Time of day assumed when a source publishes only a date.
    pub default_time: NaiveTime,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            timezone: chrono_tz::Europe::Madrid,
            default_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        }
    }
}

/// Resolve a free-text date fragment (and optional time fragment) into
/// an instant in the configured timezone.
///
/// The reference instant supplies the missing pieces of a partial
/// specification: a year-less date takes the reference year, and a bare
/// time with no date at all is read as "reference date at that time".
pub fn resolve(
    date_text: &str,
    time_text: Option<&str>,
    reference: DateTime<Tz>,
    opts: &ResolveOptions,
) -> Option<DateTime<Tz>> {
    let date_text = date_text.trim();

    // A separate time fragment wins over one embedded in the date text.
    let time = time_text.and_then(parse_time).or_else(|| parse_time(date_text));

    let date = match parse_date(date_text, reference.date_naive()) {
        Some(date) => date,
        // Bare time, no recognizable date: the date is implicitly "today".
        None if time.is_some() => reference.date_naive(),
        None => return None,
    };

    let time = time.unwrap_or(opts.default_time);
    localize(date.and_time(time), opts.timezone)
}

/// Resolve a batch of candidates against one shared reference instant,
/// dropping the ones that fail, and keep only events inside the
/// retention window. End instants get the configured default duration
/// since no source in this domain reliably publishes an end time.
pub fn resolve_candidates(
    candidates: Vec<RawCandidate>,
    reference: DateTime<Tz>,
    horizon_days: i64,
    default_duration: Duration,
    opts: &ResolveOptions,
) -> Vec<ResolvedEvent> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let start = resolve(
                &candidate.date_text,
                candidate.time_text.as_deref(),
                reference,
                opts,
            )?;
            if !in_window(start, reference, horizon_days) {
                return None;
            }
            Some(ResolvedEvent {
                title: candidate.title,
                start,
                end: start + default_duration,
                location: candidate.location,
                link: candidate.link,
                description: candidate.raw_text,
            })
        })
        .collect()
}

/// Find the first valid date in the text, day-first biased.
/// Two-digit years map into 2000-2099; a missing year means the
/// reference year.
fn parse_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    for caps in NUMERIC_DATE.captures_iter(text) {
        let (Ok(day), Ok(month)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        let year = match caps.get(3) {
            Some(y) => match y.as_str().parse::<i32>() {
                Ok(y) if y < 100 => y + 2000,
                Ok(y) => y,
                Err(_) => continue,
            },
            None => reference.year(),
        };
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    for caps in NAMED_DATE.captures_iter(text) {
        let Ok(day) = caps[1].parse::<u32>() else {
            continue;
        };
        let Some(month) = month_number(&caps[2]) else {
            continue;
        };
        let year = caps
            .get(3)
            .and_then(|y| y.as_str().parse().ok())
            .unwrap_or_else(|| reference.year());
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

/// Find the first valid time of day in the text, normalizing the
/// `16h00` separator.
fn parse_time(text: &str) -> Option<NaiveTime> {
    for caps in TIME.captures_iter(text) {
        let (Ok(hour), Ok(minute)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return Some(time);
        }
    }
    None
}

/// Month lookup for Spanish and Catalan names, accent-insensitive.
fn month_number(name: &str) -> Option<u32> {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' => 'a',
            'è' | 'é' => 'e',
            'ì' | 'í' => 'i',
            'ò' | 'ó' => 'o',
            'ù' | 'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect();

    let prefix: String = normalized.chars().take(3).collect();
    let month = match prefix.as_str() {
        "gen" | "ene" => 1,
        "feb" => 2,
        "mar" => 3,
        "abr" => 4,
        "mai" | "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" => 8,
        "set" | "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "des" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}

/// Attach the target timezone to a naive local datetime. Ambiguous
/// local times (the repeated hour at a DST fall-back) take the earliest
/// mapping; times skipped by a DST gap do not resolve.
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Madrid;

    fn reference() -> DateTime<Tz> {
        Madrid.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    fn opts() -> ResolveOptions {
        ResolveOptions::default()
    }

    #[test]
    fn numeric_date_with_separate_time() {
        let dt = resolve("26/10/2025", Some("16:00"), reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap());
    }

    #[test]
    fn dotted_date_with_two_digit_year() {
        let dt = resolve("3.11.25", Some("19:30"), reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 11, 3, 19, 30, 0).unwrap());
    }

    #[test]
    fn named_month_spanish() {
        let dt = resolve("15 octubre 2025", Some("18:00"), reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 15, 18, 0, 0).unwrap());
    }

    #[test]
    fn named_month_with_de_particles() {
        let dt = resolve("15 de octubre de 2025", None, reference(), &opts()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
    }

    #[test]
    fn named_month_catalan_without_year_takes_reference_year() {
        let dt = resolve("3 de març", Some("20:00"), reference(), &opts()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn yearless_october_resolves_to_reference_year() {
        let dt = resolve("15 octubre", None, reference(), &opts()).unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
    }

    #[test]
    fn bare_time_takes_reference_date() {
        let dt = resolve("20:30", None, reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 1, 20, 30, 0).unwrap());
    }

    #[test]
    fn h_separator_is_normalized() {
        let dt = resolve("26/10/2025", Some("18h30"), reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 26, 18, 30, 0).unwrap());
    }

    #[test]
    fn date_only_gets_default_time() {
        let dt = resolve("26/10/2025", None, reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 26, 20, 0, 0).unwrap());
    }

    #[test]
    fn time_embedded_in_date_text() {
        let dt = resolve("Diumenge 26/10/2025 a les 16:00", None, reference(), &opts()).unwrap();
        assert_eq!(dt, Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap());
    }

    #[test]
    fn ambiguous_dst_fallback_instant_takes_the_earliest_mapping() {
        // Madrid repeats 02:00-03:00 local on 2025-10-26; the earliest
        // mapping is still on summer time (+02:00).
        let dt = resolve("26/10/2025", Some("02:30"), reference(), &opts()).unwrap();

        assert_eq!(
            dt.with_timezone(&chrono::Utc),
            chrono::Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn dst_gap_instant_fails_resolution() {
        // 02:30 local does not exist on 2025-03-30 (clocks jump 02:00 -> 03:00).
        assert!(resolve("30/03/2025", Some("02:30"), reference(), &opts()).is_none());
    }

    #[test]
    fn unparsable_text_fails() {
        assert!(resolve("properament", None, reference(), &opts()).is_none());
        assert!(resolve("", None, reference(), &opts()).is_none());
        assert!(resolve("99/99/2025", None, reference(), &opts()).is_none());
    }

    #[test]
    fn resolved_instant_carries_target_timezone() {
        let dt = resolve("15 octubre 2025", Some("18:00"), reference(), &opts()).unwrap();
        assert_eq!(dt.timezone(), Madrid);
    }

    #[test]
    fn resolve_candidates_drops_failures_and_out_of_window() {
        let candidate = |date_text: &str| RawCandidate {
            title: "Film".into(),
            date_text: date_text.into(),
            time_text: Some("16:00".into()),
            location: "Cinema".into(),
            link: "https://example.org".into(),
            raw_text: "Film 16:00".into(),
        };

        let events = resolve_candidates(
            vec![
                candidate("26/10/2025"),
                candidate("no date here"),
                candidate("26/10/2030"),
            ],
            reference(),
            14,
            Duration::hours(2),
            &opts(),
        );

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(
            event.start,
            Madrid.with_ymd_and_hms(2025, 10, 26, 16, 0, 0).unwrap()
        );
        assert_eq!(event.end, event.start + Duration::hours(2));
    }
}
