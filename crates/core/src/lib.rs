pub mod currency;
pub mod entities;
pub mod error;
pub mod intent;
pub mod models;
pub mod response;
pub mod vocabulary;

pub use currency::{
    format_currency, format_happy_paisa, happy_paisa_to_inr, inr_to_happy_paisa,
    INR_PER_HAPPY_PAISA,
};
pub use entities::{extract_dates, extract_route, extract_travel_class, Route, TravelDates};
pub use error::VocabularyError;
pub use intent::{classify_kind, normalize_utterance, IntentExtractor};
pub use models::*;
pub use response::{synthesize_response, GENERIC_RESULTS_REPLY, NO_RESULTS_REPLY};
pub use vocabulary::{CityEntry, ClassKeyword, RelativeDatePhrase, Vocabulary};
