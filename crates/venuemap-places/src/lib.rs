//! Google Maps web-service client: geocoding, nearby search, and place details.

pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::GoogleMapsClient;
pub use error::PlacesError;
pub use normalize::{miles_to_meters, normalize_details, MAX_NEARBY_RADIUS_METERS};
