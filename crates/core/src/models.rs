use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const BASE_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    SearchFlights,
    SearchHotels,
    GeneralSearch,
    Unknown,
}

impl IntentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "search_flights" | "flights" | "flight" => Some(Self::SearchFlights),
            "search_hotels" | "hotels" | "hotel" => Some(Self::SearchHotels),
            "general_search" | "search" => Some(Self::GeneralSearch),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::SearchFlights => "search_flights",
            Self::SearchHotels => "search_hotels",
            Self::GeneralSearch => "general_search",
            Self::Unknown => "unknown",
        }
    }
}

/// Names of the entities the extractor can fill. Serialised in camelCase so
/// the map reads `{"origin": .., "departureDate": ..}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKey {
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    TravelClass,
    CityCode,
    CheckInDate,
    CheckOutDate,
}

impl EntityKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::DepartureDate => "departureDate",
            Self::ReturnDate => "returnDate",
            Self::TravelClass => "travelClass",
            Self::CityCode => "cityCode",
            Self::CheckInDate => "checkInDate",
            Self::CheckOutDate => "checkOutDate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelClass {
    Economy,
    Business,
    First,
}

impl TravelClass {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "economy" => Some(Self::Economy),
            "business" => Some(Self::Business),
            "first" => Some(Self::First),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }
}

/// A three-letter city or airport code. Codes coming from the vocabulary are
/// validated on load; codes built from unmapped words are best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationCode(String);

impl LocationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification result for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub entities: BTreeMap<EntityKey, String>,
    pub confidence: f32,
}

impl Intent {
    pub fn unknown() -> Self {
        Self {
            kind: IntentKind::Unknown,
            entities: BTreeMap::new(),
            confidence: 0.0,
        }
    }

    pub fn entity(&self, key: EntityKey) -> Option<&str> {
        self.entities.get(&key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HappyPaisaAmount {
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightPrice {
    pub total_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub happy_paisa: Option<HappyPaisaAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    pub price: FlightPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelPrice {
    pub total: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    #[serde(default)]
    pub id: String,
    pub price: HotelPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelResult {
    #[serde(default)]
    pub hotel_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city_code: Option<String>,
    #[serde(default)]
    pub offers: Vec<HotelOffer>,
}

/// Backend search response. Externally tagged, so the backend's
/// `{"flights": [...]}` and `{"hotels": [...]}` bodies deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResultSet {
    Flights(Vec<FlightOffer>),
    Hotels(Vec<HotelResult>),
    Empty,
}

impl SearchResultSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Flights(flights) => flights.len(),
            Self::Hotels(hotels) => hotels.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u8,
    pub children: u8,
    pub travel_class: TravelClass,
    pub max_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSearchParams {
    pub city_code: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub adults: u8,
    pub rooms: u8,
    pub max_results: usize,
}

fn default_currency() -> String {
    BASE_CURRENCY.to_string()
}
