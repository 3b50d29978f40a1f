//! Entity extraction over a normalised utterance.
//!
//! These are keyword and regex heuristics, not language understanding. There
//! is no synonym handling beyond the vocabulary, no negation handling, and the
//! first pattern that matches wins.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{LocationCode, TravelClass};
use crate::vocabulary::Vocabulary;

static FROM_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfrom\s+(\w+(?:\s+\w+)*?)\s+to\s+(\w+(?:\s+\w+)*)")
        .expect("valid from/to route regex")
});

static TO_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bto\s+").expect("valid to regex"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("valid iso date regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    pub origin: Option<LocationCode>,
    pub destination: Option<LocationCode>,
}

/// First and second date found in an utterance. Callers map them onto
/// departure/return or check-in/check-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelDates {
    pub first: Option<String>,
    pub second: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Known(LocationCode),
    Verbatim(LocationCode),
}

impl Resolved {
    fn into_code(self) -> LocationCode {
        match self {
            Resolved::Known(code) | Resolved::Verbatim(code) => code,
        }
    }
}

/// Route extraction in fixed order: `from X to Y`, then `to X`, then a scan of
/// the vocabulary for any known city. A `to` target outside the vocabulary is
/// kept verbatim and stops the scan. The scan never sets an origin.
pub fn extract_route(text: &str, vocabulary: &Vocabulary) -> Route {
    if let Some(caps) = FROM_TO.captures(text) {
        let origin = resolve_city_phrase(&caps[1], vocabulary);
        let destination = resolve_city_phrase(&caps[2], vocabulary);
        if let (Some(origin), Some(destination)) = (origin, destination) {
            return Route {
                origin: Some(origin.into_code()),
                destination: Some(destination.into_code()),
            };
        }
    }

    let mut verbatim = None;
    for marker in TO_MARKER.find_iter(text) {
        match resolve_city_phrase(&text[marker.end()..], vocabulary) {
            Some(Resolved::Known(code)) => {
                return Route {
                    origin: None,
                    destination: Some(code),
                };
            }
            Some(Resolved::Verbatim(code)) => verbatim = Some(code),
            None => {}
        }
    }

    Route {
        origin: None,
        destination: verbatim.or_else(|| scan_known_city(text, vocabulary)),
    }
}

/// Explicit ISO dates win over relative phrases. Only the first matching
/// relative phrase is used, and offsets are never negative.
pub fn extract_dates(text: &str, vocabulary: &Vocabulary, today: NaiveDate) -> TravelDates {
    let mut explicit = ISO_DATE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok());

    if let Some(first) = explicit.next() {
        return TravelDates {
            first: Some(first),
            second: explicit.next(),
        };
    }

    let relative = vocabulary
        .relative_dates()
        .iter()
        .find(|entry| text.contains(entry.phrase.as_str()))
        .and_then(|entry| today.checked_add_days(Days::new(u64::from(entry.offset_days))));

    TravelDates {
        first: relative.map(|date| date.format("%Y-%m-%d").to_string()),
        second: None,
    }
}

/// Every keyword is checked in table order and each hit overwrites the last,
/// so with the built-in table "economy" beats "first" beats "business".
pub fn extract_travel_class(text: &str, vocabulary: &Vocabulary) -> Option<TravelClass> {
    let mut class = None;
    for entry in vocabulary.travel_classes() {
        if text.contains(entry.keyword.as_str()) {
            class = Some(entry.class);
        }
    }
    class
}

fn resolve_city_phrase(phrase: &str, vocabulary: &Vocabulary) -> Option<Resolved> {
    let words = phrase
        .split_whitespace()
        .take(vocabulary.max_city_words().max(1))
        .collect::<Vec<_>>();

    for len in (1..=words.len()).rev() {
        if let Some(code) = vocabulary.lookup_city(&words[..len].join(" ")) {
            return Some(Resolved::Known(code.clone()));
        }
    }

    let token = words.first()?;
    if token.chars().all(char::is_alphabetic) {
        Some(Resolved::Verbatim(LocationCode::new(*token)))
    } else {
        None
    }
}

fn scan_known_city(text: &str, vocabulary: &Vocabulary) -> Option<LocationCode> {
    vocabulary
        .cities()
        .iter()
        .find(|entry| text.contains(entry.name.as_str()))
        .map(|entry| entry.code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn codes(route: &Route) -> (Option<&str>, Option<&str>) {
        (
            route.origin.as_ref().map(LocationCode::as_str),
            route.destination.as_ref().map(LocationCode::as_str),
        )
    }

    #[test]
    fn from_to_resolves_multi_word_cities() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("fly from new york to paris next week", &vocabulary);
        assert_eq!(codes(&route), (Some("JFK"), Some("CDG")));
    }

    #[test]
    fn from_to_falls_back_to_uppercased_token() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("flights from pune to zurich", &vocabulary);
        assert_eq!(codes(&route), (Some("PUNE"), Some("ZURICH")));
    }

    #[test]
    fn weak_pattern_prefers_known_city_after_any_to() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("i want to fly to bangkok", &vocabulary);
        assert_eq!(codes(&route), (None, Some("BKK")));
    }

    #[test]
    fn unmapped_to_token_beats_city_scan() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("fly to zurich via dubai", &vocabulary);
        assert_eq!(codes(&route), (None, Some("ZURICH")));

        let route = extract_route("i want to visit goa", &vocabulary);
        assert_eq!(codes(&route), (None, Some("VISIT")));
    }

    #[test]
    fn last_unmapped_to_token_is_used() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("i want to fly to zurich", &vocabulary);
        assert_eq!(codes(&route), (None, Some("ZURICH")));
    }

    #[test]
    fn city_scan_runs_only_without_a_to_target() {
        let vocabulary = Vocabulary::builtin();
        let route = extract_route("cheap flights for singapore", &vocabulary);
        assert_eq!(codes(&route), (None, Some("SIN")));
    }

    #[test]
    fn no_route_words_yields_nothing() {
        let vocabulary = Vocabulary::builtin();
        assert_eq!(extract_route("any flights", &vocabulary), Route::default());
    }

    #[test]
    fn iso_dates_win_over_relative_phrases() {
        let vocabulary = Vocabulary::builtin();
        let dates = extract_dates(
            "tomorrow or 2024-03-01 back 2024-03-09",
            &vocabulary,
            day("2024-01-01"),
        );
        assert_eq!(dates.first.as_deref(), Some("2024-03-01"));
        assert_eq!(dates.second.as_deref(), Some("2024-03-09"));
    }

    #[test]
    fn impossible_calendar_dates_are_ignored() {
        let vocabulary = Vocabulary::builtin();
        let dates = extract_dates("on 2024-13-40 today", &vocabulary, day("2024-02-28"));
        assert_eq!(dates.first.as_deref(), Some("2024-02-28"));
        assert!(dates.second.is_none());
    }

    #[test]
    fn relative_phrases_use_first_table_match() {
        let vocabulary = Vocabulary::builtin();
        let today = day("2024-12-30");
        let dates = extract_dates("next week or tomorrow", &vocabulary, today);
        assert_eq!(dates.first.as_deref(), Some("2024-12-31"));

        let dates = extract_dates("sometime next week", &vocabulary, today);
        assert_eq!(dates.first.as_deref(), Some("2025-01-06"));
    }

    #[test]
    fn class_keywords_overwrite_in_table_order() {
        let vocabulary = Vocabulary::builtin();
        assert_eq!(
            extract_travel_class("business please", &vocabulary),
            Some(TravelClass::Business)
        );
        assert_eq!(
            extract_travel_class("economy or maybe business", &vocabulary),
            Some(TravelClass::Economy)
        );
        assert_eq!(extract_travel_class("window seat", &vocabulary), None);
    }
}
