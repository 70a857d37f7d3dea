//! Read side of venue discovery: proximity search, geocoding, category list.

use std::sync::Arc;

use venuemap_core::{
    Coordinate, SearchCriteria, Venue, VenueCategory, VenuePage, VenueQuery,
    DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_MILES,
};

use crate::error::DiscoveryError;
use crate::fallback::degrade;
use crate::traits::{CategoryStore, Geocoder, VenueStore};

/// Venue search with fail-open semantics.
///
/// Every public method returns an empty value instead of an error; failures
/// are logged where they happen.
#[derive(Clone)]
pub struct VenueSearchEngine {
    venues: Arc<dyn VenueStore>,
    categories: Arc<dyn CategoryStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl VenueSearchEngine {
    #[must_use]
    pub fn new(
        venues: Arc<dyn VenueStore>,
        categories: Arc<dyn CategoryStore>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            venues,
            categories,
            geocoder,
        }
    }

    /// Proximity search driven by client criteria.
    ///
    /// Criteria without both latitude and longitude yield an empty page and
    /// never reach the store.
    pub async fn search_venues(&self, criteria: &SearchCriteria) -> VenuePage {
        degrade("search_venues", async {
            let query =
                VenueQuery::from_criteria(criteria).ok_or(DiscoveryError::MissingCoordinate)?;
            let (venues, total) = self.venues.search(&query).await?;
            Ok::<_, DiscoveryError>(VenuePage { venues, total })
        })
        .await
    }

    /// Closest venues to a point, nearest first.
    ///
    /// `radius_miles` defaults to 10 and `limit` to 20.
    pub async fn get_venues_near_location(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: Option<f64>,
        limit: Option<i64>,
    ) -> Vec<Venue> {
        let query = VenueQuery::nearby(
            Coordinate::new(latitude, longitude),
            radius_miles.unwrap_or(DEFAULT_NEARBY_RADIUS_MILES),
            limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
        );
        degrade("get_venues_near_location", async {
            let (venues, _) = self.venues.search(&query).await?;
            Ok::<_, DiscoveryError>(venues)
        })
        .await
    }

    /// Resolve an address to a coordinate. Not-found and failure both give `None`.
    pub async fn geocode_address(&self, address: &str) -> Option<Coordinate> {
        degrade("geocode_address", async {
            let coordinate = self.geocoder.geocode(address).await?;
            if coordinate.is_none() {
                tracing::warn!(address, "address could not be geocoded");
            }
            Ok::<_, DiscoveryError>(coordinate)
        })
        .await
    }

    pub async fn get_venue_types(&self) -> Vec<VenueCategory> {
        degrade("get_venue_types", self.categories.find_all()).await
    }
}
