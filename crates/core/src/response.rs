use crate::currency::{format_currency, format_happy_paisa, inr_to_happy_paisa};
use crate::models::{
    FlightOffer, FlightPrice, HotelOffer, HotelResult, IntentKind, SearchResultSet, BASE_CURRENCY,
};

pub const NO_RESULTS_REPLY: &str =
    "I couldn't find any results for your search. Please try different criteria.";
pub const GENERIC_RESULTS_REPLY: &str =
    "I found some great options for your trip. Check the results below!";

/// Summarises a search result set in one sentence suitable for speech.
///
/// Entries without a usable price (a hotel with no offers, a non-finite
/// total) are skipped rather than treated as errors. A result set whose
/// variant does not match `kind` gets a neutral sentence.
pub fn synthesize_response(results: Option<&SearchResultSet>, kind: IntentKind) -> String {
    let Some(results) = results else {
        return NO_RESULTS_REPLY.to_string();
    };

    match (results, kind) {
        (SearchResultSet::Flights(flights), IntentKind::SearchFlights) => flight_summary(flights),
        (SearchResultSet::Hotels(hotels), IntentKind::SearchHotels) => hotel_summary(hotels),
        (other, _) if other.is_empty() => NO_RESULTS_REPLY.to_string(),
        _ => GENERIC_RESULTS_REPLY.to_string(),
    }
}

fn flight_summary(flights: &[FlightOffer]) -> String {
    let priced = flights
        .iter()
        .filter(|flight| flight.price.total_price.is_finite())
        .collect::<Vec<_>>();

    let Some(cheapest) = cheapest(priced.iter().copied(), |flight| flight.price.total_price) else {
        return NO_RESULTS_REPLY.to_string();
    };

    let amount = format_currency(cheapest.price.total_price, &cheapest.price.currency);
    let spoken_price = match happy_paisa_amount(&cheapest.price) {
        Some(happy_paisa) => format!("{amount} or {}", format_happy_paisa(happy_paisa)),
        None => amount,
    };

    format!(
        "I found {} for you. The cheapest option costs {spoken_price}. \
         Would you like to see more details?",
        count_noun(priced.len(), "flight", "flights"),
    )
}

/// The offer's own HP amount, else one derived from a base-currency total.
/// Other currencies have no fixed HP rate.
fn happy_paisa_amount(price: &FlightPrice) -> Option<f64> {
    let supplied = price
        .happy_paisa
        .as_ref()
        .map(|hp| hp.amount)
        .filter(|amount| amount.is_finite());

    supplied.or_else(|| {
        price
            .currency
            .eq_ignore_ascii_case(BASE_CURRENCY)
            .then(|| inr_to_happy_paisa(price.total_price))
    })
}

fn hotel_summary(hotels: &[HotelResult]) -> String {
    let priced = hotels
        .iter()
        .filter_map(|hotel| hotel.offers.first())
        .filter(|offer| offer.price.total.is_finite())
        .collect::<Vec<&HotelOffer>>();

    let Some(cheapest) = cheapest(priced.iter().copied(), |offer| offer.price.total) else {
        return NO_RESULTS_REPLY.to_string();
    };

    format!(
        "I found {} for you. The best deal starts at {} per night. \
         Shall I show you the options?",
        count_noun(priced.len(), "hotel", "hotels"),
        format_currency(cheapest.price.total, &cheapest.price.currency),
    )
}

// Ties keep the earliest entry.
fn cheapest<'a, T>(items: impl Iterator<Item = &'a T>, price: impl Fn(&T) -> f64) -> Option<&'a T>
where
    T: 'a,
{
    items.fold(None, |best: Option<&'a T>, item| match best {
        Some(current) if price(current) <= price(item) => Some(current),
        _ => Some(item),
    })
}

fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
