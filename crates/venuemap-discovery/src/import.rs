//! Bulk venue ingestion from the place provider.

use std::sync::Arc;

use venuemap_core::{
    map_google_types, Coordinate, NewVenue, PlaceDetails, VenueCategory, VenueHour, VenueStatus,
};

use crate::error::DiscoveryError;
use crate::fallback::degrade;
use crate::traits::{CategoryStore, PlaceProvider, VenueStore};

/// Outcome counters for one import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub candidates: usize,
    pub created: u64,
    pub already_present: usize,
    pub details_missing: usize,
}

#[derive(Clone)]
pub struct VenueImportEngine {
    places: Arc<dyn PlaceProvider>,
    venues: Arc<dyn VenueStore>,
    categories: Arc<dyn CategoryStore>,
}

impl VenueImportEngine {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlaceProvider>,
        venues: Arc<dyn VenueStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            places,
            venues,
            categories,
        }
    }

    /// Import the first page of nearby places and return how many venues
    /// were created.
    ///
    /// Any collaborator failure stops the batch and yields 0. Venues created
    /// before the failure stay persisted.
    pub async fn import_venues_from_google(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        category_hint: Option<&str>,
    ) -> u64 {
        let report = degrade(
            "import_venues_from_google",
            self.try_import_venues_from_google(latitude, longitude, radius_miles, category_hint),
        )
        .await;
        report.created
    }

    /// Same as [`Self::import_venues_from_google`] but surfaces the error and
    /// the full report.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiscoveryError`] raised by a collaborator.
    pub async fn try_import_venues_from_google(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: f64,
        category_hint: Option<&str>,
    ) -> Result<ImportReport, DiscoveryError> {
        let center = Coordinate::new(latitude, longitude);
        let candidates = self
            .places
            .search_nearby(center, radius_miles, category_hint)
            .await?;

        let mut report = ImportReport {
            candidates: candidates.len(),
            ..ImportReport::default()
        };

        for candidate in &candidates {
            if self
                .venues
                .find_by_external_id(&candidate.external_id)
                .await?
                .is_some()
            {
                report.already_present += 1;
                continue;
            }

            let Some(details) = self.places.get_details(&candidate.external_id).await? else {
                tracing::debug!(
                    external_id = %candidate.external_id,
                    "no details for candidate, skipping"
                );
                report.details_missing += 1;
                continue;
            };

            let names: Vec<&str> = map_google_types(&details.types).into_iter().collect();
            let categories = self.categories.find_by_names(&names).await?;

            let (venue, is_new) = self.venues.create(new_venue(details, &categories)).await?;
            if is_new {
                tracing::debug!(venue_id = %venue.id, name = %venue.name, "imported venue");
                report.created += 1;
            } else {
                tracing::debug!(
                    venue_id = %venue.id,
                    google_place_id = ?venue.google_place_id,
                    "venue was inserted concurrently, keeping existing row"
                );
                report.already_present += 1;
            }
        }

        tracing::info!(
            latitude,
            longitude,
            radius_miles,
            category_hint,
            candidates = report.candidates,
            created = report.created,
            already_present = report.already_present,
            details_missing = report.details_missing,
            "venue import complete"
        );

        Ok(report)
    }
}

/// Build the insert record for a provider place. Imported venues always
/// start out pending.
fn new_venue(details: PlaceDetails, categories: &[VenueCategory]) -> NewVenue {
    NewVenue {
        hours: VenueHour::from_periods(&details.opening_periods),
        name: details.name,
        address: details.formatted_address,
        latitude: details.coordinate.latitude,
        longitude: details.coordinate.longitude,
        google_place_id: Some(details.external_id),
        google_rating: details.rating,
        google_ratings_total: details.rating_count,
        price_level: details.price_level,
        website: details.website,
        phone: details.phone,
        is_open_now: details.open_now,
        status: VenueStatus::Pending,
        category_ids: categories.iter().map(|c| c.id).collect(),
    }
}
