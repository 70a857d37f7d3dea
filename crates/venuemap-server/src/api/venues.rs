use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use venuemap_core::{
    Coordinate, SearchCriteria, SortBy, SortOrder, Venue, VenueCategory, VenuePage,
    DEFAULT_NEARBY_RADIUS_MILES,
};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchParams {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(alias = "radius_miles")]
    pub radius: Option<f64>,
    #[serde(alias = "q")]
    pub query: Option<String>,
    /// Comma-separated category UUIDs.
    pub category_ids: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub open_now: Option<bool>,
    pub price_level: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyParams {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(alias = "radius_miles")]
    pub radius: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeParams {
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImportRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_miles: Option<f64>,
    #[serde(rename = "type")]
    pub venue_type: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(super) struct ImportResult {
    pub created: u64,
}

impl SearchParams {
    /// Validate the raw query string. Latitude and longitude stay optional
    /// here; the search engine answers an incomplete coordinate with an
    /// empty page.
    fn into_criteria(self) -> Result<SearchCriteria, String> {
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            validate_coordinate(lat, lon)?;
        }
        if let Some(radius) = self.radius {
            validate_radius(radius)?;
        }
        if let Some(level) = self.price_level {
            if !(0..=4).contains(&level) {
                return Err(format!("price_level must be between 0 and 4, got {level}"));
            }
        }

        let sort_by = self
            .sort_by
            .as_deref()
            .map(str::parse::<SortBy>)
            .transpose()
            .map_err(|e| e.to_string())?;
        let order = self
            .order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()
            .map_err(|e| e.to_string())?;
        let category_ids = parse_category_ids(self.category_ids.as_deref())?;

        Ok(SearchCriteria {
            latitude: self.latitude,
            longitude: self.longitude,
            radius_miles: self.radius,
            query: self.query,
            category_ids,
            sort_by,
            order,
            open_now: self.open_now,
            price_level: self.price_level,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

fn parse_category_ids(raw: Option<&str>) -> Result<Vec<Uuid>, String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).map_err(|_| format!("invalid category id '{s}'")))
        .collect()
}

fn validate_coordinate(latitude: f64, longitude: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude must be between -90 and 90, got {latitude}"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!(
            "longitude must be between -180 and 180, got {longitude}"
        ));
    }
    Ok(())
}

fn validate_radius(radius: f64) -> Result<(), String> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(format!("radius must be a positive number of miles, got {radius}"))
    }
}

pub(super) async fn search_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<VenuePage>>, ApiError> {
    let criteria = params
        .into_criteria()
        .map_err(|msg| ApiError::validation(req_id.0.clone(), msg))?;

    let page = state.search.search_venues(&criteria).await;
    Ok(Json(ApiResponse::new(req_id.0, page)))
}

pub(super) async fn nearby_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<ApiResponse<Vec<Venue>>>, ApiError> {
    let (Some(latitude), Some(longitude)) = (params.latitude, params.longitude) else {
        return Err(ApiError::validation(
            req_id.0,
            "latitude and longitude are required",
        ));
    };
    validate_coordinate(latitude, longitude)
        .and_then(|()| params.radius.map_or(Ok(()), validate_radius))
        .map_err(|msg| ApiError::validation(req_id.0.clone(), msg))?;

    let venues = state
        .search
        .get_venues_near_location(latitude, longitude, params.radius, params.limit)
        .await;
    Ok(Json(ApiResponse::new(req_id.0, venues)))
}

pub(super) async fn geocode_address(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<ApiResponse<Coordinate>>, ApiError> {
    let Some(address) = params
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    else {
        return Err(ApiError::validation(req_id.0, "address is required"));
    };

    match state.search.geocode_address(address).await {
        Some(coordinate) => Ok(Json(ApiResponse::new(req_id.0, coordinate))),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            "address could not be geocoded",
        )),
    }
}

pub(super) async fn get_venue(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Venue>>, ApiError> {
    let venue = venuemap_db::get_venue_by_id(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "venue not found"))?;

    Ok(Json(ApiResponse::new(req_id.0, venue)))
}

pub(super) async fn list_venue_types(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<VenueCategory>>> {
    let types = state.search.get_venue_types().await;
    Json(ApiResponse::new(req_id.0, types))
}

pub(super) async fn import_venues(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ImportRequest>,
) -> Result<Json<ApiResponse<ImportResult>>, ApiError> {
    let radius_miles = body.radius_miles.unwrap_or(DEFAULT_NEARBY_RADIUS_MILES);
    validate_coordinate(body.latitude, body.longitude)
        .and_then(|()| validate_radius(radius_miles))
        .map_err(|msg| ApiError::validation(req_id.0.clone(), msg))?;

    let created = state
        .import
        .import_venues_from_google(
            body.latitude,
            body.longitude,
            radius_miles,
            body.venue_type.as_deref(),
        )
        .await;

    Ok(Json(ApiResponse::new(req_id.0, ImportResult { created })))
}
