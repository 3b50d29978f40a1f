use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::entities::{extract_dates, extract_route, extract_travel_class};
use crate::models::{EntityKey, Intent, IntentKind};
use crate::vocabulary::Vocabulary;

pub const TRAVEL_CONFIDENCE: f32 = 0.9;
pub const GENERAL_SEARCH_CONFIDENCE: f32 = 0.7;

/// Lowercases, replaces punctuation with spaces and collapses whitespace.
/// Hyphens survive so ISO dates stay intact.
pub fn normalize_utterance(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' {
                ch
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keyword rules in fixed precedence: flights, hotels, generic search. An
/// utterance mentioning both a flight and a hotel is a flight search.
pub fn classify_kind(text: &str) -> IntentKind {
    let lower = text.to_lowercase();

    if contains_any(&lower, &["flight", "fly"]) {
        return IntentKind::SearchFlights;
    }

    if contains_any(&lower, &["hotel", "stay"]) {
        return IntentKind::SearchHotels;
    }

    if contains_any(&lower, &["search", "find"]) {
        return IntentKind::GeneralSearch;
    }

    IntentKind::Unknown
}

/// Turns utterances into [`Intent`]s using an injected [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    vocabulary: Arc<Vocabulary>,
}

impl IntentExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Relative dates resolve against the current UTC date.
    pub fn classify_now(&self, utterance: &str) -> Intent {
        self.classify(utterance, Utc::now().date_naive())
    }

    pub fn classify(&self, utterance: &str, today: NaiveDate) -> Intent {
        let text = normalize_utterance(utterance);
        let kind = classify_kind(&text);

        let intent = match kind {
            IntentKind::SearchFlights => Intent {
                kind,
                entities: self.flight_entities(&text, today),
                confidence: TRAVEL_CONFIDENCE,
            },
            IntentKind::SearchHotels => Intent {
                kind,
                entities: self.hotel_entities(&text, today),
                confidence: TRAVEL_CONFIDENCE,
            },
            IntentKind::GeneralSearch => Intent {
                kind,
                entities: BTreeMap::new(),
                confidence: GENERAL_SEARCH_CONFIDENCE,
            },
            IntentKind::Unknown => Intent::unknown(),
        };

        debug!(
            kind = intent.kind.as_code(),
            entities = intent.entities.len(),
            "utterance classified"
        );

        intent
    }

    fn flight_entities(&self, text: &str, today: NaiveDate) -> BTreeMap<EntityKey, String> {
        let mut entities = BTreeMap::new();

        let route = extract_route(text, &self.vocabulary);
        if let Some(origin) = route.origin {
            entities.insert(EntityKey::Origin, origin.into_string());
        }
        if let Some(destination) = route.destination {
            entities.insert(EntityKey::Destination, destination.into_string());
        }

        let dates = extract_dates(text, &self.vocabulary, today);
        if let Some(departure) = dates.first {
            entities.insert(EntityKey::DepartureDate, departure);
        }
        if let Some(back) = dates.second {
            entities.insert(EntityKey::ReturnDate, back);
        }

        if let Some(class) = extract_travel_class(text, &self.vocabulary) {
            entities.insert(EntityKey::TravelClass, class.as_code().to_string());
        }

        entities
    }

    fn hotel_entities(&self, text: &str, today: NaiveDate) -> BTreeMap<EntityKey, String> {
        let mut entities = BTreeMap::new();

        if let Some(city) = extract_route(text, &self.vocabulary).destination {
            entities.insert(EntityKey::CityCode, city.into_string());
        }

        let dates = extract_dates(text, &self.vocabulary, today);
        if let Some(check_in) = dates.first {
            entities.insert(EntityKey::CheckInDate, check_in);
        }
        if let Some(check_out) = dates.second {
            entities.insert(EntityKey::CheckOutDate, check_out);
        }

        entities
    }
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self::new(Vocabulary::builtin())
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
