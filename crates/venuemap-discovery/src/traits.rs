//! Collaborator seams for the search and import engines.
//!
//! Each trait is object safe and injected as `Arc<dyn …>` so the engines can
//! run against Postgres and Google in production and in-memory fakes in tests.

use async_trait::async_trait;
use venuemap_core::{
    Coordinate, NewVenue, PlaceDetails, PlaceSummary, Venue, VenueCategory, VenueQuery,
};

use crate::error::DiscoveryError;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address matches nothing.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, DiscoveryError>;
}

#[async_trait]
pub trait PlaceProvider: Send + Sync {
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_miles: f64,
        category_hint: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, DiscoveryError>;

    /// `Ok(None)` when the provider has no usable record for the id.
    async fn get_details(&self, external_id: &str)
        -> Result<Option<PlaceDetails>, DiscoveryError>;
}

#[async_trait]
pub trait VenueStore: Send + Sync {
    /// One page of matches plus the unpaginated total.
    async fn search(&self, query: &VenueQuery) -> Result<(Vec<Venue>, i64), DiscoveryError>;

    async fn find_by_external_id(&self, external_id: &str)
        -> Result<Option<Venue>, DiscoveryError>;

    /// Persist a new venue and report whether a row was inserted. If one with
    /// the same external id already exists the stored record is returned with
    /// `false`.
    async fn create(&self, venue: NewVenue) -> Result<(Venue, bool), DiscoveryError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<VenueCategory>, DiscoveryError>;

    /// Names without a matching category are absent from the result.
    async fn find_by_names(&self, names: &[&str]) -> Result<Vec<VenueCategory>, DiscoveryError>;
}
