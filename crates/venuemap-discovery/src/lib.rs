//! Venue discovery: proximity search and Google Places import over pluggable
//! stores and providers.
//!
//! Both engines fail open. Public operations never return an error; they log
//! the failure and hand back an empty page, an empty list, `None`, or `0`.

pub mod adapters;
pub mod error;
pub mod import;
pub mod search;
pub mod traits;

mod fallback;

pub use adapters::{PgCategoryStore, PgVenueStore, UnconfiguredGoogle};
pub use error::{BoxError, DiscoveryError};
pub use fallback::error_chain;
pub use import::{ImportReport, VenueImportEngine};
pub use search::VenueSearchEngine;
pub use traits::{CategoryStore, Geocoder, PlaceProvider, VenueStore};
