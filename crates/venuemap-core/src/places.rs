//! Provider-neutral place records handed from a place provider to the import flow.

use serde::{Deserialize, Serialize};

use crate::venues::Coordinate;

/// A candidate returned by a nearby search. Only the external id is needed
/// to drive the import; the rest is kept for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub external_id: String,
    pub name: Option<String>,
    pub vicinity: Option<String>,
}

/// Extended detail record for a single place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub external_id: String,
    pub name: String,
    pub formatted_address: String,
    pub coordinate: Coordinate,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub price_level: Option<i16>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub open_now: Option<bool>,
    pub types: Vec<String>,
    /// Weekly opening periods as reported by the provider.
    pub opening_periods: Vec<OpeningPeriod>,
}

/// One open interval of the weekly schedule.
///
/// A period with no `close` means the place is open around the clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub open: PlaceTime,
    pub close: Option<PlaceTime>,
}

/// Day index (0 = Sunday) plus `HHMM` time, the provider's native shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTime {
    pub day: u8,
    pub time: String,
}
