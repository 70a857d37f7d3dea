//! Production implementations of the collaborator traits.

use async_trait::async_trait;
use sqlx::PgPool;
use venuemap_core::{
    Coordinate, NewVenue, PlaceDetails, PlaceSummary, Venue, VenueCategory, VenueQuery,
};
use venuemap_places::GoogleMapsClient;

use crate::error::DiscoveryError;
use crate::traits::{CategoryStore, Geocoder, PlaceProvider, VenueStore};

/// Venue store backed by the Postgres `venues` tables.
#[derive(Clone)]
pub struct PgVenueStore {
    pool: PgPool,
}

impl PgVenueStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueStore for PgVenueStore {
    async fn search(&self, query: &VenueQuery) -> Result<(Vec<Venue>, i64), DiscoveryError> {
        venuemap_db::search_venues(&self.pool, query)
            .await
            .map_err(DiscoveryError::store)
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Venue>, DiscoveryError> {
        venuemap_db::find_venue_by_google_place_id(&self.pool, external_id)
            .await
            .map_err(DiscoveryError::store)
    }

    async fn create(&self, venue: NewVenue) -> Result<(Venue, bool), DiscoveryError> {
        venuemap_db::insert_venue(&self.pool, &venue)
            .await
            .map_err(DiscoveryError::store)
    }
}

/// Category store backed by the seeded `venue_categories` table.
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_all(&self) -> Result<Vec<VenueCategory>, DiscoveryError> {
        venuemap_db::list_venue_categories(&self.pool)
            .await
            .map_err(DiscoveryError::store)
    }

    async fn find_by_names(&self, names: &[&str]) -> Result<Vec<VenueCategory>, DiscoveryError> {
        let owned: Vec<String> = names.iter().map(|n| (*n).to_owned()).collect();
        venuemap_db::find_categories_by_names(&self.pool, &owned)
            .await
            .map_err(DiscoveryError::store)
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, DiscoveryError> {
        GoogleMapsClient::geocode(self, address)
            .await
            .map_err(DiscoveryError::geocoder)
    }
}

#[async_trait]
impl PlaceProvider for GoogleMapsClient {
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_miles: f64,
        category_hint: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, DiscoveryError> {
        GoogleMapsClient::search_nearby(self, center, radius_miles, category_hint)
            .await
            .map_err(DiscoveryError::place_provider)
    }

    async fn get_details(
        &self,
        external_id: &str,
    ) -> Result<Option<PlaceDetails>, DiscoveryError> {
        self.get_place_details(external_id)
            .await
            .map_err(DiscoveryError::place_provider)
    }
}

/// Stand-in used when no Google Maps API key is configured. Every call fails,
/// so geocoding degrades to `None` and imports to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGoogle;

const NO_API_KEY: &str = "GOOGLE_MAPS_API_KEY is not configured";

#[async_trait]
impl Geocoder for UnconfiguredGoogle {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinate>, DiscoveryError> {
        Err(DiscoveryError::geocoder(NO_API_KEY))
    }
}

#[async_trait]
impl PlaceProvider for UnconfiguredGoogle {
    async fn search_nearby(
        &self,
        _center: Coordinate,
        _radius_miles: f64,
        _category_hint: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, DiscoveryError> {
        Err(DiscoveryError::place_provider(NO_API_KEY))
    }

    async fn get_details(
        &self,
        _external_id: &str,
    ) -> Result<Option<PlaceDetails>, DiscoveryError> {
        Err(DiscoveryError::place_provider(NO_API_KEY))
    }
}
