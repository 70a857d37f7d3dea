//! Venue domain types shared by the store, the engines, and the HTTP layer.

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::places::OpeningPeriod;
use crate::CoreError;

/// Radius used by the nearby lookup when the caller does not pass one.
pub const DEFAULT_NEARBY_RADIUS_MILES: f64 = 10.0;
/// Result cap used by the nearby lookup when the caller does not pass one.
pub const DEFAULT_NEARBY_LIMIT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VenueStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VenueStatus::Pending => "pending",
            VenueStatus::Approved => "approved",
            VenueStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VenueStatus::Pending),
            "approved" => Ok(VenueStatus::Approved),
            "rejected" => Ok(VenueStatus::Rejected),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Relevance,
    #[default]
    Distance,
    Rating,
    Name,
}

impl SortBy {
    /// Order applied when the caller picks a sort key but no direction.
    #[must_use]
    pub fn default_order(self) -> SortOrder {
        match self {
            SortBy::Distance | SortBy::Name => SortOrder::Asc,
            SortBy::Rating | SortBy::Relevance => SortOrder::Desc,
        }
    }
}

impl FromStr for SortBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortBy::Relevance),
            "distance" => Ok(SortBy::Distance),
            "rating" => Ok(SortBy::Rating),
            "name" => Ok(SortBy::Name),
            _ => Err(CoreError::InvalidSortBy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc", alias = "ASC")]
    Asc,
    #[serde(rename = "desc", alias = "DESC")]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(CoreError::InvalidSortOrder(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueCategory {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Convert a Google day index (0 = Sunday … 6 = Saturday).
    #[must_use]
    pub fn from_google_index(day: u8) -> Option<Self> {
        match day {
            0 => Some(DayOfWeek::Sunday),
            1 => Some(DayOfWeek::Monday),
            2 => Some(DayOfWeek::Tuesday),
            3 => Some(DayOfWeek::Wednesday),
            4 => Some(DayOfWeek::Thursday),
            5 => Some(DayOfWeek::Friday),
            6 => Some(DayOfWeek::Saturday),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::InvalidDayOfWeek(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueHour {
    pub day_of_week: DayOfWeek,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub is_closed: bool,
    pub is_open_24_hours: bool,
}

/// Hours row to be written alongside a new venue.
pub type NewVenueHour = VenueHour;

impl VenueHour {
    fn closed(day_of_week: DayOfWeek) -> Self {
        Self {
            day_of_week,
            open_time: NaiveTime::MIN,
            close_time: NaiveTime::MIN,
            is_closed: true,
            is_open_24_hours: false,
        }
    }

    fn all_day(day_of_week: DayOfWeek) -> Self {
        Self {
            day_of_week,
            open_time: NaiveTime::MIN,
            close_time: NaiveTime::MIN,
            is_closed: false,
            is_open_24_hours: true,
        }
    }

    /// Build one row per open period plus a closed row for every day
    /// without any period.
    ///
    /// A lone period that opens Sunday at `0000` and never closes is the
    /// provider's encoding for "always open" and expands to seven 24-hour rows.
    /// Periods with unparseable days or times are skipped. An empty schedule
    /// yields no rows at all (hours unknown, not "closed every day").
    #[must_use]
    pub fn from_periods(periods: &[OpeningPeriod]) -> Vec<Self> {
        if periods.is_empty() {
            return Vec::new();
        }

        if let [only] = periods {
            if only.close.is_none() && only.open.day == 0 && only.open.time == "0000" {
                return DayOfWeek::ALL.into_iter().map(Self::all_day).collect();
            }
        }

        let mut rows: Vec<Self> = periods
            .iter()
            .filter_map(|period| {
                let day = DayOfWeek::from_google_index(period.open.day)?;
                let open_time = parse_hhmm(&period.open.time)?;
                match &period.close {
                    None => Some(Self::all_day(day)),
                    Some(close) => Some(Self {
                        day_of_week: day,
                        open_time,
                        close_time: parse_hhmm(&close.time)?,
                        is_closed: false,
                        is_open_24_hours: false,
                    }),
                }
            })
            .collect();

        for day in DayOfWeek::ALL {
            if !rows.iter().any(|row| row.day_of_week == day) {
                rows.push(Self::closed(day));
            }
        }

        rows.sort_by(|a, b| {
            a.day_of_week
                .cmp(&b.day_of_week)
                .then(a.open_time.cmp(&b.open_time))
        });
        rows
    }
}

fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H%M").ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
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
    pub status: VenueStatus,
    pub categories: Vec<VenueCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hours: Vec<VenueHour>,
    /// Distance from the search center, set only by proximity queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input record for creating a venue.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVenue {
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
    pub status: VenueStatus,
    pub category_ids: Vec<Uuid>,
    pub hours: Vec<NewVenueHour>,
}

/// Search request as received from a client. Every field is optional at the
/// type level; latitude and longitude are required by contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_miles: Option<f64>,
    pub query: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    pub sort_by: Option<SortBy>,
    pub order: Option<SortOrder>,
    pub open_now: Option<bool>,
    pub price_level: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchCriteria {
    /// The search center, when both halves are present.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }
}

/// Normalized query handed to the venue store. Optional fields are passed
/// through untouched; the store applies its own defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    pub center: Coordinate,
    pub radius_miles: Option<f64>,
    pub query: Option<String>,
    pub category_ids: Vec<Uuid>,
    pub sort_by: Option<SortBy>,
    pub order: Option<SortOrder>,
    pub open_now: Option<bool>,
    pub price_level: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl VenueQuery {
    /// Build a store query from client criteria, or `None` when the
    /// coordinate is incomplete.
    #[must_use]
    pub fn from_criteria(criteria: &SearchCriteria) -> Option<Self> {
        Some(Self {
            center: criteria.coordinate()?,
            radius_miles: criteria.radius_miles,
            query: criteria.query.clone(),
            category_ids: criteria.category_ids.clone(),
            sort_by: criteria.sort_by,
            order: criteria.order,
            open_now: criteria.open_now,
            price_level: criteria.price_level,
            limit: criteria.limit,
            offset: criteria.offset,
        })
    }

    /// Distance-ordered query with no filters.
    #[must_use]
    pub fn nearby(center: Coordinate, radius_miles: f64, limit: i64) -> Self {
        Self {
            center,
            radius_miles: Some(radius_miles),
            query: None,
            category_ids: Vec::new(),
            sort_by: Some(SortBy::Distance),
            order: Some(SortOrder::Asc),
            open_now: None,
            price_level: None,
            limit: Some(limit),
            offset: Some(0),
        }
    }
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenuePage {
    pub venues: Vec<Venue>,
    pub total: i64,
}
