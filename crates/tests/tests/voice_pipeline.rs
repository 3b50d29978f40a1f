use std::sync::Arc;

use serde_json::json;
use wayfare_assistant::{SearchDefaults, VoiceAssistant, HELP_REPLY};
use wayfare_core::{
    EntityKey, IntentExtractor, IntentKind, SearchResultSet, Vocabulary, NO_RESULTS_REPLY,
};
use wayfare_observability::AppMetrics;
use wayfare_search::{FixtureSearch, SearchFixtures};
use wayfare_tests::{day, UnavailableSearch};

fn demo_assistant() -> (VoiceAssistant<FixtureSearch>, Arc<AppMetrics>) {
    let metrics = AppMetrics::shared();
    let assistant = VoiceAssistant::new(
        IntentExtractor::default(),
        Arc::new(FixtureSearch::demo()),
        metrics.clone(),
    );
    (assistant, metrics)
}

#[tokio::test]
async fn hotel_utterance_reports_nightly_starting_price() {
    let (assistant, _) = demo_assistant();
    let reply = assistant
        .handle_utterance("find hotels in Dubai for next week", Some(day("2024-01-01")))
        .await
        .expect("fixture search never fails");

    assert_eq!(reply.intent.kind, IntentKind::SearchHotels);
    assert_eq!(reply.intent.entity(EntityKey::CityCode), Some("DXB"));
    assert_eq!(
        reply.intent.entity(EntityKey::CheckInDate),
        Some("2024-01-08")
    );
    assert_eq!(
        reply.reply_text,
        "I found 2 hotels for you. The best deal starts at ₹9,800 per night. \
         Shall I show you the options?"
    );
}

#[tokio::test]
async fn sold_out_hotels_are_not_counted() {
    let (assistant, _) = demo_assistant();
    let reply = assistant
        .handle_utterance("a stay in goa please", Some(day("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(reply.results.as_ref().map(SearchResultSet::len), Some(3));
    assert_eq!(
        reply.reply_text,
        "I found 2 hotels for you. The best deal starts at ₹6,200 per night. \
         Shall I show you the options?"
    );
}

#[tokio::test]
async fn unmapped_destination_is_searched_verbatim() {
    let (assistant, metrics) = demo_assistant();
    let reply = assistant
        .handle_utterance("fly to zurich via dubai", Some(day("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(reply.intent.entity(EntityKey::Destination), Some("ZURICH"));
    assert_eq!(reply.results, Some(SearchResultSet::Empty));
    assert_eq!(reply.reply_text, NO_RESULTS_REPLY);
    assert_eq!(metrics.snapshot().searches_total, 1);
}

#[tokio::test]
async fn route_without_inventory_apologises() {
    let (assistant, metrics) = demo_assistant();
    let reply = assistant
        .handle_utterance("fly from kolkata to tokyo tomorrow", Some(day("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(reply.intent.entity(EntityKey::Origin), Some("CCU"));
    assert_eq!(reply.intent.entity(EntityKey::Destination), Some("NRT"));
    assert_eq!(reply.results, Some(SearchResultSet::Empty));
    assert_eq!(reply.reply_text, NO_RESULTS_REPLY);
    assert_eq!(metrics.snapshot().empty_results_total, 1);
}

#[tokio::test]
async fn general_search_asks_for_more_detail() {
    let (assistant, metrics) = demo_assistant();
    let reply = assistant
        .handle_utterance("search for something nice", Some(day("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(reply.intent.kind, IntentKind::GeneralSearch);
    assert_eq!(reply.reply_text, HELP_REPLY);
    assert_eq!(metrics.snapshot().searches_total, 0);
}

#[tokio::test]
async fn backend_failures_propagate_with_context() {
    let assistant = VoiceAssistant::new(
        IntentExtractor::default(),
        Arc::new(UnavailableSearch),
        AppMetrics::shared(),
    );

    let err = assistant
        .handle_utterance("flights to london", Some(day("2024-01-01")))
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("flight search DEL -> LHR failed"), "{message}");
    assert!(message.contains("flight backend unavailable"), "{message}");
}

#[tokio::test]
async fn custom_vocabulary_and_fixtures_flow_end_to_end() {
    let vocabulary = Vocabulary::from_json_str(
        &json!({
            "cities": [
                { "name": "Tel Aviv", "code": "TLV" },
                { "name": "Eilat", "code": "ETM" }
            ]
        })
        .to_string(),
    )
    .unwrap();

    let fixtures: SearchFixtures = serde_json::from_value(json!({
        "flights": [
            {
                "id": "LY-1",
                "origin": "TLV",
                "destination": "ETM",
                "price": { "total_price": 6100, "happy_paisa": { "amount": 6.1 } }
            },
            {
                "id": "6H-2",
                "origin": "TLV",
                "destination": "ETM",
                "price": { "total_price": 6100, "happy_paisa": { "amount": 5.9 } }
            }
        ]
    }))
    .unwrap();

    let assistant = VoiceAssistant::new(
        IntentExtractor::new(Arc::new(vocabulary)),
        Arc::new(FixtureSearch::from_fixtures(fixtures)),
        AppMetrics::shared(),
    )
    .with_defaults(SearchDefaults {
        origin: "TLV".to_string(),
        ..SearchDefaults::default()
    });

    let reply = assistant
        .handle_utterance("I need a flight to Eilat today", Some(day("2024-01-01")))
        .await
        .unwrap();

    assert_eq!(reply.intent.entity(EntityKey::Destination), Some("ETM"));
    assert_eq!(
        reply.intent.entity(EntityKey::DepartureDate),
        Some("2024-01-01")
    );
    assert_eq!(
        reply.reply_text,
        "I found 2 flights for you. The cheapest option costs ₹6,100 or 6.100 HP. \
         Would you like to see more details?"
    );
}
