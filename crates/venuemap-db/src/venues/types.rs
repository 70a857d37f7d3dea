//! Row types for the `venues`, `venue_category_links`, and `venue_hours` tables.

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;
use venuemap_core::{Venue, VenueCategory, VenueHour};

use crate::DbError;

/// A row from the `venues` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueRow {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub google_place_id: Option<String>,
    pub google_rating: Option<f64>,
    pub google_ratings_total: Option<i32>,
    pub price_level: Option<i16>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub is_open_now: Option<bool>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A proximity search hit: the venue row plus its distance from the center.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueSearchRow {
    #[sqlx(flatten)]
    pub venue: VenueRow,
    pub distance_miles: f64,
}

/// A category joined through `venue_category_links`, keyed by venue.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct VenueCategoryLinkRow {
    pub venue_id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
}

/// A row from the `venue_hours` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueHourRow {
    pub venue_id: Uuid,
    pub day_of_week: String,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
    pub is_open_24_hours: bool,
}

impl VenueHourRow {
    pub(crate) fn into_hour(self) -> Result<VenueHour, DbError> {
        Ok(VenueHour {
            day_of_week: self.day_of_week.parse()?,
            open_time: self.open_time,
            close_time: self.close_time,
            is_closed: self.is_closed,
            is_open_24_hours: self.is_open_24_hours,
        })
    }
}

impl VenueRow {
    /// Assemble the domain venue from this row and its related records.
    pub(crate) fn into_venue(
        self,
        categories: Vec<VenueCategory>,
        hours: Vec<VenueHour>,
        distance_miles: Option<f64>,
    ) -> Result<Venue, DbError> {
        Ok(Venue {
            id: self.id,
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            google_place_id: self.google_place_id,
            google_rating: self.google_rating,
            google_ratings_total: self.google_ratings_total,
            price_level: self.price_level,
            website: self.website,
            phone: self.phone,
            is_open_now: self.is_open_now,
            status: self.status.parse()?,
            categories,
            hours,
            distance_miles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
