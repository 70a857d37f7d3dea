//! Database operations for the `venue_categories` table.

use sqlx::PgPool;
use uuid::Uuid;
use venuemap_core::VenueCategory;

use crate::DbError;

/// A row from the `venue_categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueCategoryRow {
    pub id: Uuid,
    pub name: String,
}

impl From<VenueCategoryRow> for VenueCategory {
    fn from(row: VenueCategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// List every venue category, ordered by `name ASC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_venue_categories(pool: &PgPool) -> Result<Vec<VenueCategory>, DbError> {
    let rows = sqlx::query_as::<_, VenueCategoryRow>(
        "SELECT id, name FROM venue_categories ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VenueCategory::from).collect())
}

/// Look up categories by exact name.
///
/// Names with no matching row are simply absent from the result.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_categories_by_names(
    pool: &PgPool,
    names: &[String],
) -> Result<Vec<VenueCategory>, DbError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_as::<_, VenueCategoryRow>(
        "SELECT id, name FROM venue_categories \
         WHERE name = ANY($1::text[]) \
         ORDER BY name ASC",
    )
    .bind(names)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(VenueCategory::from).collect())
}
