//! Shared fixtures for the cross-crate tests under `tests/`.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use wayfare_core::{FlightSearchParams, HotelSearchParams, SearchResultSet};
use wayfare_search::TravelSearch;

pub fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test dates are valid")
}

/// Backend that is always down.
#[derive(Debug, Default)]
pub struct UnavailableSearch;

impl TravelSearch for UnavailableSearch {
    async fn search_flights(&self, _params: &FlightSearchParams) -> Result<SearchResultSet> {
        bail!("flight backend unavailable")
    }

    async fn search_hotels(&self, _params: &HotelSearchParams) -> Result<SearchResultSet> {
        bail!("hotel backend unavailable")
    }
}
