use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use wayfare_core::{
    inr_to_happy_paisa, FlightOffer, FlightPrice, FlightSearchParams, HappyPaisaAmount, HotelOffer,
    HotelPrice, HotelResult, HotelSearchParams, SearchResultSet, BASE_CURRENCY,
};

/// Backend that answers flight and hotel searches. The production
/// implementation is an HTTP client owned by the app shell.
pub trait TravelSearch: Send + Sync {
    async fn search_flights(&self, params: &FlightSearchParams) -> Result<SearchResultSet>;
    async fn search_hotels(&self, params: &HotelSearchParams) -> Result<SearchResultSet>;
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed reading search fixtures at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid search fixture json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFixtures {
    #[serde(default)]
    pub flights: Vec<FlightOffer>,
    #[serde(default)]
    pub hotels: Vec<HotelResult>,
}

/// In-memory backend serving canned offers, filtered by route or city.
#[derive(Clone, Default)]
pub struct FixtureSearch {
    flights: Arc<RwLock<Vec<FlightOffer>>>,
    hotels: Arc<RwLock<Vec<HotelResult>>>,
}

impl FixtureSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: SearchFixtures) -> Self {
        Self {
            flights: Arc::new(RwLock::new(fixtures.flights)),
            hotels: Arc::new(RwLock::new(fixtures.hotels)),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let fixtures: SearchFixtures = serde_json::from_str(&raw)?;
        Ok(Self::from_fixtures(fixtures))
    }

    /// A handful of domestic and Gulf routes used by the CLI when no fixture
    /// file is configured.
    pub fn demo() -> Self {
        let flights = [
            ("AI-865", "Air India", "DEL", "GOA", 7850.0),
            ("6E-2143", "IndiGo", "DEL", "GOA", 5420.0),
            ("UK-881", "Vistara", "DEL", "GOA", 9310.0),
            ("EK-501", "Emirates", "BOM", "DXB", 18250.0),
            ("6E-1457", "IndiGo", "BOM", "DXB", 14980.0),
            ("SQ-403", "Singapore Airlines", "DEL", "SIN", 27600.0),
        ]
        .into_iter()
        .map(|(id, airline, origin, destination, total)| {
            demo_flight(id, airline, origin, destination, total)
        })
        .collect();

        let hotels = [
            ("GOATAJ01", "Taj Exotica Resort", "GOA", &[18500.0, 21000.0][..]),
            ("GOABCH02", "Candolim Beach House", "GOA", &[6200.0][..]),
            ("GOASLD03", "Sold Out Villas", "GOA", &[][..]),
            ("DXBATL01", "Atlantis The Palm", "DXB", &[42000.0][..]),
            ("DXBROV02", "Rove Downtown", "DXB", &[9800.0, 11200.0][..]),
        ]
        .into_iter()
        .map(|(hotel_id, name, city, totals)| demo_hotel(hotel_id, name, city, totals))
        .collect();

        Self::from_fixtures(SearchFixtures { flights, hotels })
    }

    pub fn add_flight(&self, offer: FlightOffer) {
        self.flights.write().push(offer);
    }

    pub fn add_hotel(&self, hotel: HotelResult) {
        self.hotels.write().push(hotel);
    }
}

impl TravelSearch for FixtureSearch {
    async fn search_flights(&self, params: &FlightSearchParams) -> Result<SearchResultSet> {
        let matches = self
            .flights
            .read()
            .iter()
            .filter(|offer| code_matches(offer.origin.as_deref(), &params.origin))
            .filter(|offer| code_matches(offer.destination.as_deref(), &params.destination))
            .take(params.max_results)
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            origin = %params.origin,
            destination = %params.destination,
            hits = matches.len(),
            "fixture flight search"
        );

        Ok(if matches.is_empty() {
            SearchResultSet::Empty
        } else {
            SearchResultSet::Flights(matches)
        })
    }

    async fn search_hotels(&self, params: &HotelSearchParams) -> Result<SearchResultSet> {
        let matches = self
            .hotels
            .read()
            .iter()
            .filter(|hotel| code_matches(hotel.city_code.as_deref(), &params.city_code))
            .take(params.max_results)
            .cloned()
            .collect::<Vec<_>>();

        debug!(city = %params.city_code, hits = matches.len(), "fixture hotel search");

        Ok(if matches.is_empty() {
            SearchResultSet::Empty
        } else {
            SearchResultSet::Hotels(matches)
        })
    }
}

// Offers without a code are not route-specific and match any request.
fn code_matches(offer_code: Option<&str>, wanted: &str) -> bool {
    offer_code.map_or(true, |code| code.eq_ignore_ascii_case(wanted))
}

fn demo_flight(
    id: &str,
    airline: &str,
    origin: &str,
    destination: &str,
    total: f64,
) -> FlightOffer {
    FlightOffer {
        id: id.to_string(),
        airline: Some(airline.to_string()),
        origin: Some(origin.to_string()),
        destination: Some(destination.to_string()),
        price: FlightPrice {
            total_price: total,
            currency: BASE_CURRENCY.to_string(),
            happy_paisa: Some(HappyPaisaAmount {
                amount: inr_to_happy_paisa(total),
            }),
        },
    }
}

fn demo_hotel(hotel_id: &str, name: &str, city: &str, totals: &[f64]) -> HotelResult {
    HotelResult {
        hotel_id: hotel_id.to_string(),
        name: name.to_string(),
        city_code: Some(city.to_string()),
        offers: totals
            .iter()
            .enumerate()
            .map(|(idx, total)| HotelOffer {
                id: format!("{hotel_id}-{idx}"),
                price: HotelPrice {
                    total: *total,
                    currency: BASE_CURRENCY.to_string(),
                },
            })
            .collect(),
    }
}
