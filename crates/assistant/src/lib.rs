use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use wayfare_core::{
    synthesize_response, EntityKey, FlightSearchParams, HotelSearchParams, Intent,
    IntentExtractor, IntentKind, SearchResultSet, TravelClass,
};
use wayfare_observability::AppMetrics;
use wayfare_search::TravelSearch;

pub const HELP_REPLY: &str = "I can help you search for flights, hotels, or destinations. \
                              Try saying \"search flights to Goa\"";

/// Values used for any search field the utterance did not mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub origin: String,
    pub destination: String,
    pub hotel_city: String,
    pub departure_offset_days: u32,
    pub return_offset_days: u32,
    pub adults: u8,
    pub children: u8,
    pub rooms: u8,
    pub travel_class: TravelClass,
    pub max_results: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            origin: "DEL".to_string(),
            destination: "GOA".to_string(),
            hotel_city: "GOA".to_string(),
            departure_offset_days: 1,
            return_offset_days: 7,
            adults: 1,
            children: 0,
            rooms: 1,
            travel_class: TravelClass::Economy,
            max_results: 20,
        }
    }
}

impl SearchDefaults {
    fn trip_length_days(&self) -> u32 {
        self.return_offset_days
            .saturating_sub(self.departure_offset_days)
            .max(1)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceReply {
    pub reply_text: String,
    pub intent: Intent,
    pub results: Option<SearchResultSet>,
}

#[derive(Clone)]
pub struct VoiceAssistant<S>
where
    S: TravelSearch,
{
    extractor: IntentExtractor,
    search: Arc<S>,
    defaults: SearchDefaults,
    metrics: Arc<AppMetrics>,
}

impl<S> VoiceAssistant<S>
where
    S: TravelSearch,
{
    pub fn new(extractor: IntentExtractor, search: Arc<S>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            extractor,
            search,
            defaults: SearchDefaults::default(),
            metrics,
        }
    }

    pub fn with_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn extractor(&self) -> &IntentExtractor {
        &self.extractor
    }

    /// Classifies the utterance, runs the matching backend search and phrases
    /// the outcome. `today` defaults to the current UTC date.
    #[instrument(skip(self, utterance))]
    pub async fn handle_utterance(
        &self,
        utterance: &str,
        today: Option<NaiveDate>,
    ) -> Result<VoiceReply> {
        let started = Instant::now();
        self.metrics.inc_utterance();

        let today = today.unwrap_or_else(|| Utc::now().date_naive());
        let intent = self.extractor.classify(utterance, today);

        let results = match intent.kind {
            IntentKind::SearchFlights => {
                let params = flight_params(&intent, &self.defaults, today);
                self.metrics.inc_search();
                let results = self
                    .search
                    .search_flights(&params)
                    .await
                    .with_context(|| {
                        format!(
                            "flight search {} -> {} failed",
                            params.origin, params.destination
                        )
                    })?;
                Some(results)
            }
            IntentKind::SearchHotels => {
                let params = hotel_params(&intent, &self.defaults, today);
                self.metrics.inc_search();
                let results = self
                    .search
                    .search_hotels(&params)
                    .await
                    .with_context(|| format!("hotel search in {} failed", params.city_code))?;
                Some(results)
            }
            IntentKind::GeneralSearch => None,
            IntentKind::Unknown => {
                self.metrics.inc_unknown();
                None
            }
        };

        let reply_text = match &results {
            Some(results) => {
                if results.is_empty() {
                    self.metrics.inc_empty_results();
                }
                synthesize_response(Some(results), intent.kind)
            }
            None => HELP_REPLY.to_string(),
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            intent = intent.kind.as_code(),
            confidence = intent.confidence,
            entities = intent.entities.len(),
            results = results.as_ref().map_or(0, SearchResultSet::len),
            "utterance handled"
        );

        Ok(VoiceReply {
            reply_text,
            intent,
            results,
        })
    }
}

/// Builds the backend request for a flight intent. A departure taken from the
/// utterance without a return date searches one-way.
pub fn flight_params(
    intent: &Intent,
    defaults: &SearchDefaults,
    today: NaiveDate,
) -> FlightSearchParams {
    let spoken_departure = intent.entity(EntityKey::DepartureDate);
    let departure_date = spoken_departure
        .map(ToString::to_string)
        .unwrap_or_else(|| offset_date(today, defaults.departure_offset_days));

    let return_date = match (intent.entity(EntityKey::ReturnDate), spoken_departure) {
        (Some(back), _) => Some(back.to_string()),
        (None, Some(_)) => None,
        (None, None) => Some(offset_date(today, defaults.return_offset_days)),
    };

    FlightSearchParams {
        origin: entity_or(intent, EntityKey::Origin, &defaults.origin),
        destination: entity_or(intent, EntityKey::Destination, &defaults.destination),
        departure_date,
        return_date,
        adults: defaults.adults,
        children: defaults.children,
        travel_class: intent
            .entity(EntityKey::TravelClass)
            .and_then(TravelClass::parse)
            .unwrap_or(defaults.travel_class),
        max_results: defaults.max_results,
    }
}

/// Builds the backend request for a hotel intent. A missing check-out is
/// placed the default trip length after check-in.
pub fn hotel_params(
    intent: &Intent,
    defaults: &SearchDefaults,
    today: NaiveDate,
) -> HotelSearchParams {
    let check_in = intent
        .entity(EntityKey::CheckInDate)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| today.checked_add_days(Days::new(u64::from(defaults.departure_offset_days))))
        .unwrap_or(today);

    let check_out_date = intent
        .entity(EntityKey::CheckOutDate)
        .map(ToString::to_string)
        .unwrap_or_else(|| offset_date(check_in, defaults.trip_length_days()));

    HotelSearchParams {
        city_code: entity_or(intent, EntityKey::CityCode, &defaults.hotel_city),
        check_in_date: check_in.format("%Y-%m-%d").to_string(),
        check_out_date,
        adults: defaults.adults,
        rooms: defaults.rooms,
        max_results: defaults.max_results,
    }
}

fn entity_or(intent: &Intent, key: EntityKey, fallback: &str) -> String {
    intent.entity(key).unwrap_or(fallback).to_string()
}

fn offset_date(from: NaiveDate, days: u32) -> String {
    from.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(from)
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_search::FixtureSearch;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn assistant() -> (VoiceAssistant<FixtureSearch>, Arc<AppMetrics>) {
        let metrics = AppMetrics::shared();
        let assistant = VoiceAssistant::new(
            IntentExtractor::default(),
            Arc::new(FixtureSearch::demo()),
            metrics.clone(),
        );
        (assistant, metrics)
    }

    #[test]
    fn flight_params_fill_gaps_from_defaults() {
        let extractor = IntentExtractor::default();
        let intent = extractor.classify("fly to dubai in business", day("2024-01-01"));
        let params = flight_params(&intent, &SearchDefaults::default(), day("2024-01-01"));

        assert_eq!(params.origin, "DEL");
        assert_eq!(params.destination, "DXB");
        assert_eq!(params.departure_date, "2024-01-02");
        assert_eq!(params.return_date.as_deref(), Some("2024-01-08"));
        assert_eq!(params.travel_class, TravelClass::Business);
        assert_eq!(params.max_results, 20);
    }

    #[test]
    fn spoken_departure_without_return_is_one_way() {
        let extractor = IntentExtractor::default();
        let intent =
            extractor.classify("flight from mumbai to goa on 2024-06-01", day("2024-01-01"));
        let params = flight_params(&intent, &SearchDefaults::default(), day("2024-01-01"));

        assert_eq!(params.origin, "BOM");
        assert_eq!(params.departure_date, "2024-06-01");
        assert!(params.return_date.is_none());
        assert_eq!(params.travel_class, TravelClass::Economy);
    }

    #[test]
    fn hotel_check_out_follows_check_in() {
        let extractor = IntentExtractor::default();
        let intent = extractor.classify("hotel in goa on 2024-06-01", day("2024-01-01"));
        let params = hotel_params(&intent, &SearchDefaults::default(), day("2024-01-01"));

        assert_eq!(params.city_code, "GOA");
        assert_eq!(params.check_in_date, "2024-06-01");
        assert_eq!(params.check_out_date, "2024-06-07");
        assert_eq!(params.rooms, 1);
    }

    #[tokio::test]
    async fn answers_flight_search_with_cheapest_fare() {
        let (assistant, metrics) = assistant();
        let reply = assistant
            .handle_utterance(
                "search flights from delhi to goa tomorrow",
                Some(day("2024-01-01")),
            )
            .await
            .unwrap();

        assert_eq!(reply.intent.kind, IntentKind::SearchFlights);
        assert_eq!(
            reply.reply_text,
            "I found 3 flights for you. The cheapest option costs ₹5,420 or 5.420 HP. \
             Would you like to see more details?"
        );
        assert_eq!(metrics.snapshot().searches_total, 1);
    }

    #[tokio::test]
    async fn unknown_utterance_gets_help_prompt() {
        let (assistant, metrics) = assistant();
        let reply = assistant
            .handle_utterance("show my wallet", Some(day("2024-01-01")))
            .await
            .unwrap();

        assert_eq!(reply.reply_text, HELP_REPLY);
        assert!(reply.results.is_none());
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.unknown_total, 1);
        assert_eq!(snapshot.searches_total, 0);
    }
}
