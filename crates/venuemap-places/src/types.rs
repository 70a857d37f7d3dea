//! Wire types for the Google Maps legacy JSON web services.
//!
//! Only the fields the import and geocode flows read are modelled; everything
//! else in the payload is ignored by serde.

use serde::Deserialize;

/// `status` values that mean "the request worked".
pub const STATUS_OK: &str = "OK";
/// `status` values that mean "the request worked but nothing matched".
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
pub const STATUS_NOT_FOUND: &str = "NOT_FOUND";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

// ---------------------------------------------------------------------------
// geocode/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

// ---------------------------------------------------------------------------
// place/nearbysearch/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<NearbyResult>,
    /// Present when more pages exist. Only the first page is consumed.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyResult {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
}

// ---------------------------------------------------------------------------
// place/details/json
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResponse {
    pub result: Option<PlaceDetailsResult>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceDetailsResult {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<i32>,
    #[serde(default)]
    pub price_level: Option<i16>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
pub struct Period {
    pub open: DayTime,
    #[serde(default)]
    pub close: Option<DayTime>,
}

#[derive(Debug, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub time: String,
}
