//! Read operations for the `venues` table.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use venuemap_core::{SortBy, SortOrder, Venue, VenueCategory, VenueHour, VenueQuery};

use super::types::{VenueCategoryLinkRow, VenueHourRow, VenueRow, VenueSearchRow};
use crate::DbError;

/// Radius applied when the query does not carry a usable one.
pub const DEFAULT_SEARCH_RADIUS_MILES: f64 = 10.0;
/// Page size applied when the query does not carry one.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;
/// Upper bound on page size.
pub const MAX_SEARCH_LIMIT: i64 = 100;

const MILES_PER_DEGREE_LATITUDE: f64 = 69.0;

pub(super) const VENUE_COLUMNS: &str = "v.id, v.name, v.address, v.latitude, v.longitude, \
     v.google_place_id, v.google_rating, v.google_ratings_total, v.price_level, \
     v.website, v.phone, v.is_open_now, v.status, v.created_at, v.updated_at";

/// Store-side defaults resolved from a [`VenueQuery`].
#[derive(Debug, Clone, PartialEq)]
struct SearchPlan {
    radius_miles: f64,
    text: Option<String>,
    sort_by: SortBy,
    order: SortOrder,
    limit: i64,
    offset: i64,
}

impl SearchPlan {
    fn from_query(query: &VenueQuery) -> Self {
        let sort_by = query.sort_by.unwrap_or_default();
        Self {
            radius_miles: query
                .radius_miles
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(DEFAULT_SEARCH_RADIUS_MILES),
            text: query
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToOwned::to_owned),
            sort_by,
            order: query.order.unwrap_or_else(|| sort_by.default_order()),
            limit: query
                .limit
                .unwrap_or(DEFAULT_SEARCH_LIMIT)
                .clamp(1, MAX_SEARCH_LIMIT),
            offset: query.offset.unwrap_or(0).max(0),
        }
    }

    fn order_clause(&self) -> String {
        let dir = self.order.as_sql();
        match self.sort_by {
            SortBy::Distance => format!("distance_miles {dir}, id ASC"),
            SortBy::Rating => {
                format!("google_rating {dir} NULLS LAST, distance_miles ASC, id ASC")
            }
            SortBy::Name => format!("LOWER(name) {dir}, distance_miles ASC, id ASC"),
            SortBy::Relevance => format!("relevance {dir}, distance_miles ASC, id ASC"),
        }
    }
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Push the great-circle distance (miles) from `center` to `v.latitude/v.longitude`.
fn push_distance(qb: &mut QueryBuilder<'_, Postgres>, latitude: f64, longitude: f64) {
    qb.push("(3958.8 * 2 * ASIN(LEAST(1.0, SQRT(POWER(SIN(RADIANS(v.latitude - ")
        .push_bind(latitude)
        .push(") / 2), 2) + COS(RADIANS(")
        .push_bind(latitude)
        .push(")) * COS(RADIANS(v.latitude)) * POWER(SIN(RADIANS(v.longitude - ")
        .push_bind(longitude)
        .push(") / 2), 2)))))");
}

/// Push the inner `SELECT` producing every approved venue that passes the
/// filters, annotated with `distance_miles` and `relevance`.
fn push_candidates(qb: &mut QueryBuilder<'_, Postgres>, query: &VenueQuery, plan: &SearchPlan) {
    let latitude = query.center.latitude;
    let longitude = query.center.longitude;

    qb.push("SELECT ").push(VENUE_COLUMNS).push(", ");
    push_distance(qb, latitude, longitude);
    qb.push(" AS distance_miles, ");

    match plan.text.as_deref() {
        Some(text) => {
            let escaped = escape_like(text);
            qb.push("CASE WHEN LOWER(v.name) = LOWER(")
                .push_bind(text.to_owned())
                .push(") THEN 3 WHEN v.name ILIKE ")
                .push_bind(format!("{escaped}%"))
                .push(" THEN 2 WHEN v.name ILIKE ")
                .push_bind(format!("%{escaped}%"))
                .push(" THEN 1 ELSE 0 END AS relevance");
        }
        None => {
            qb.push("0 AS relevance");
        }
    }

    let lat_span = plan.radius_miles / MILES_PER_DEGREE_LATITUDE;
    qb.push(" FROM venues v WHERE v.status = 'approved' AND v.latitude BETWEEN ")
        .push_bind(latitude - lat_span)
        .push(" AND ")
        .push_bind(latitude + lat_span);

    if let Some(text) = plan.text.as_deref() {
        let pattern = format!("%{}%", escape_like(text));
        qb.push(" AND (v.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR v.address ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if !query.category_ids.is_empty() {
        qb.push(
            " AND EXISTS (SELECT 1 FROM venue_category_links l \
             WHERE l.venue_id = v.id AND l.category_id = ANY(",
        )
        .push_bind(query.category_ids.clone())
        .push("))");
    }

    if let Some(open_now) = query.open_now {
        qb.push(" AND v.is_open_now = ").push_bind(open_now);
    }

    if let Some(price_level) = query.price_level {
        qb.push(" AND v.price_level = ").push_bind(price_level);
    }
}

/// Proximity search over approved venues.
///
/// Returns one page of venues (with categories and `distance_miles`) and the
/// total number of matches ignoring pagination. Missing options fall back to
/// a 10 mile radius, 20 results, offset 0, and distance ordering.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or [`DbError::InvalidValue`]
/// if a stored status cannot be parsed.
pub async fn search_venues(
    pool: &PgPool,
    query: &VenueQuery,
) -> Result<(Vec<Venue>, i64), DbError> {
    let plan = SearchPlan::from_query(query);

    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (");
    push_candidates(&mut count_qb, query, &plan);
    count_qb
        .push(") AS candidates WHERE candidates.distance_miles <= ")
        .push_bind(plan.radius_miles);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    if total == 0 {
        return Ok((Vec::new(), 0));
    }

    let mut page_qb = QueryBuilder::<Postgres>::new("SELECT * FROM (");
    push_candidates(&mut page_qb, query, &plan);
    page_qb
        .push(") AS candidates WHERE candidates.distance_miles <= ")
        .push_bind(plan.radius_miles)
        .push(" ORDER BY ")
        .push(plan.order_clause())
        .push(" LIMIT ")
        .push_bind(plan.limit)
        .push(" OFFSET ")
        .push_bind(plan.offset);
    let rows: Vec<VenueSearchRow> = page_qb.build_query_as::<VenueSearchRow>().fetch_all(pool).await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.venue.id).collect();
    let mut categories = load_categories(pool, &ids).await?;

    let venues = rows
        .into_iter()
        .map(|row| {
            let cats = categories.remove(&row.venue.id).unwrap_or_default();
            row.venue
                .into_venue(cats, Vec::new(), Some(row.distance_miles))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((venues, total))
}

/// Fetch a single venue by id, with categories and hours.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn get_venue_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Venue>, DbError> {
    let row = sqlx::query_as::<_, VenueRow>(&format!(
        "SELECT {VENUE_COLUMNS} FROM venues v WHERE v.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => hydrate(pool, row).await.map(Some),
        None => Ok(None),
    }
}

/// Fetch a venue by its Google place id, the import dedup key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn find_venue_by_google_place_id(
    pool: &PgPool,
    google_place_id: &str,
) -> Result<Option<Venue>, DbError> {
    let row = sqlx::query_as::<_, VenueRow>(&format!(
        "SELECT {VENUE_COLUMNS} FROM venues v WHERE v.google_place_id = $1"
    ))
    .bind(google_place_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => hydrate(pool, row).await.map(Some),
        None => Ok(None),
    }
}

pub(super) async fn hydrate(pool: &PgPool, row: VenueRow) -> Result<Venue, DbError> {
    let categories = load_categories(pool, &[row.id])
        .await?
        .remove(&row.id)
        .unwrap_or_default();
    let hours = load_hours(pool, row.id).await?;
    row.into_venue(categories, hours, None)
}

async fn load_categories(
    pool: &PgPool,
    venue_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<VenueCategory>>, DbError> {
    if venue_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, VenueCategoryLinkRow>(
        "SELECT l.venue_id, c.id AS category_id, c.name AS category_name \
         FROM venue_category_links l \
         JOIN venue_categories c ON c.id = l.category_id \
         WHERE l.venue_id = ANY($1::uuid[]) \
         ORDER BY c.name ASC",
    )
    .bind(venue_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<VenueCategory>> = HashMap::new();
    for row in rows {
        grouped.entry(row.venue_id).or_default().push(VenueCategory {
            id: row.category_id,
            name: row.category_name,
        });
    }
    Ok(grouped)
}

async fn load_hours(pool: &PgPool, venue_id: Uuid) -> Result<Vec<VenueHour>, DbError> {
    let rows = sqlx::query_as::<_, VenueHourRow>(
        "SELECT venue_id, day_of_week, open_time, close_time, is_closed, is_open_24_hours \
         FROM venue_hours \
         WHERE venue_id = $1",
    )
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    let mut hours = rows
        .into_iter()
        .map(VenueHourRow::into_hour)
        .collect::<Result<Vec<_>, _>>()?;
    hours.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then(a.open_time.cmp(&b.open_time))
    });
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use venuemap_core::Coordinate;

    fn query() -> VenueQuery {
        VenueQuery::nearby(Coordinate::new(40.7128, -74.0060), 5.0, 10)
    }

    #[test]
    fn plan_applies_store_defaults() {
        let q = VenueQuery {
            radius_miles: None,
            sort_by: None,
            order: None,
            limit: None,
            offset: None,
            ..query()
        };
        let plan = SearchPlan::from_query(&q);
        assert!((plan.radius_miles - DEFAULT_SEARCH_RADIUS_MILES).abs() < f64::EPSILON);
        assert_eq!(plan.sort_by, SortBy::Distance);
        assert_eq!(plan.order, SortOrder::Asc);
        assert_eq!(plan.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(plan.offset, 0);
    }

    #[test]
    fn plan_clamps_limit_and_offset() {
        let q = VenueQuery {
            limit: Some(10_000),
            offset: Some(-5),
            ..query()
        };
        let plan = SearchPlan::from_query(&q);
        assert_eq!(plan.limit, MAX_SEARCH_LIMIT);
        assert_eq!(plan.offset, 0);

        let q = VenueQuery {
            limit: Some(0),
            ..query()
        };
        assert_eq!(SearchPlan::from_query(&q).limit, 1);
    }

    #[test]
    fn plan_rejects_non_positive_radius() {
        for radius in [0.0, -3.0, f64::NAN] {
            let q = VenueQuery {
                radius_miles: Some(radius),
                ..query()
            };
            let plan = SearchPlan::from_query(&q);
            assert!((plan.radius_miles - DEFAULT_SEARCH_RADIUS_MILES).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn plan_drops_blank_text() {
        let q = VenueQuery {
            query: Some("   ".to_string()),
            ..query()
        };
        assert!(SearchPlan::from_query(&q).text.is_none());

        let q = VenueQuery {
            query: Some("  Blue Note ".to_string()),
            ..query()
        };
        assert_eq!(SearchPlan::from_query(&q).text.as_deref(), Some("Blue Note"));
    }

    #[test]
    fn rating_sort_defaults_to_descending_with_nulls_last() {
        let q = VenueQuery {
            sort_by: Some(SortBy::Rating),
            order: None,
            ..query()
        };
        let clause = SearchPlan::from_query(&q).order_clause();
        assert_eq!(
            clause,
            "google_rating DESC NULLS LAST, distance_miles ASC, id ASC"
        );
    }

    #[test]
    fn explicit_order_overrides_default() {
        let q = VenueQuery {
            sort_by: Some(SortBy::Name),
            order: Some(SortOrder::Desc),
            ..query()
        };
        assert_eq!(
            SearchPlan::from_query(&q).order_clause(),
            "LOWER(name) DESC, distance_miles ASC, id ASC"
        );
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("100%_bar\\"), "100\\%\\_bar\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn candidate_sql_includes_requested_filters() {
        let q = VenueQuery {
            query: Some("jazz".to_string()),
            category_ids: vec![Uuid::nil()],
            open_now: Some(true),
            price_level: Some(2),
            ..query()
        };
        let plan = SearchPlan::from_query(&q);
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_candidates(&mut qb, &q, &plan);
        let sql = qb.sql();
        assert!(sql.contains("v.status = 'approved'"));
        assert!(sql.contains("v.name ILIKE"));
        assert!(sql.contains("venue_category_links"));
        assert!(sql.contains("v.is_open_now = "));
        assert!(sql.contains("v.price_level = "));
        assert!(sql.contains("AS relevance"));
    }

    #[test]
    fn candidate_sql_omits_absent_filters() {
        let q = query();
        let plan = SearchPlan::from_query(&q);
        let mut qb = QueryBuilder::<Postgres>::new("");
        push_candidates(&mut qb, &q, &plan);
        let sql = qb.sql();
        assert!(!sql.contains("ILIKE"));
        assert!(!sql.contains("venue_category_links"));
        assert!(!sql.contains("is_open_now ="));
        assert!(sql.contains("0 AS relevance"));
    }
}
