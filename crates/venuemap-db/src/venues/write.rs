//! Write operations for the `venues` table.

use chrono::NaiveTime;
use sqlx::PgPool;
use uuid::Uuid;
use venuemap_core::{NewVenue, Venue};

use super::read::hydrate;
use super::types::VenueRow;
use crate::DbError;

/// Insert a venue together with its category links and hours.
///
/// Returns the stored venue and whether this call created it. When another
/// writer already holds the same `google_place_id`, the existing row is
/// returned unchanged with `is_new = false` and no links or hours are written.
///
/// Everything runs in one transaction so a venue never becomes visible
/// without its categories.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn insert_venue(pool: &PgPool, venue: &NewVenue) -> Result<(Venue, bool), DbError> {
    let mut tx = pool.begin().await?;

    // The no-op update makes RETURNING yield the existing row on conflict.
    let (id, is_new): (Uuid, bool) = sqlx::query_as(
        "INSERT INTO venues \
             (name, address, latitude, longitude, google_place_id, google_rating, \
              google_ratings_total, price_level, website, phone, is_open_now, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (google_place_id) DO UPDATE SET updated_at = venues.updated_at \
         RETURNING id, (xmax = 0) AS is_new",
    )
    .bind(&venue.name)
    .bind(&venue.address)
    .bind(venue.latitude)
    .bind(venue.longitude)
    .bind(venue.google_place_id.as_deref())
    .bind(venue.google_rating)
    .bind(venue.google_ratings_total)
    .bind(venue.price_level)
    .bind(venue.website.as_deref())
    .bind(venue.phone.as_deref())
    .bind(venue.is_open_now)
    .bind(venue.status.as_str())
    .fetch_one(&mut *tx)
    .await?;

    if is_new {
        if !venue.category_ids.is_empty() {
            sqlx::query(
                "INSERT INTO venue_category_links (venue_id, category_id) \
                 SELECT $1, * FROM UNNEST($2::uuid[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(&venue.category_ids)
            .execute(&mut *tx)
            .await?;
        }

        if !venue.hours.is_empty() {
            // Collect each column into a parallel Vec for UNNEST binding.
            let mut days: Vec<&str> = Vec::with_capacity(venue.hours.len());
            let mut opens: Vec<NaiveTime> = Vec::with_capacity(venue.hours.len());
            let mut closes: Vec<NaiveTime> = Vec::with_capacity(venue.hours.len());
            let mut closed: Vec<bool> = Vec::with_capacity(venue.hours.len());
            let mut all_day: Vec<bool> = Vec::with_capacity(venue.hours.len());

            for hour in &venue.hours {
                days.push(hour.day_of_week.as_str());
                opens.push(hour.open_time);
                closes.push(hour.close_time);
                closed.push(hour.is_closed);
                all_day.push(hour.is_open_24_hours);
            }

            sqlx::query(
                "INSERT INTO venue_hours \
                     (venue_id, day_of_week, open_time, close_time, is_closed, is_open_24_hours) \
                 SELECT $1, * FROM UNNEST(\
                      $2::text[], $3::time[], $4::time[], $5::bool[], $6::bool[])",
            )
            .bind(id)
            .bind(&days)
            .bind(&opens)
            .bind(&closes)
            .bind(&closed)
            .bind(&all_day)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    let row = sqlx::query_as::<_, VenueRow>(&format!(
        "SELECT {} FROM venues v WHERE v.id = $1",
        super::read::VENUE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok((hydrate(pool, row).await?, is_new))
}
