pub mod app_config;
pub mod categories;
pub mod config;
pub mod places;
pub mod venues;

pub use app_config::{AppConfig, Environment};
pub use categories::{map_google_types, GOOGLE_TYPE_CATEGORIES, OTHER_CATEGORY};
pub use config::{load_app_config, load_app_config_from_env};
pub use places::{OpeningPeriod, PlaceDetails, PlaceSummary, PlaceTime};
pub use venues::{
    Coordinate, DayOfWeek, NewVenue, NewVenueHour, SearchCriteria, SortBy, SortOrder, Venue,
    VenueCategory, VenueHour, VenuePage, VenueQuery, VenueStatus, DEFAULT_NEARBY_LIMIT,
    DEFAULT_NEARBY_RADIUS_MILES,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid venue status: {0}")]
    InvalidStatus(String),

    #[error("invalid sort key: {0}")]
    InvalidSortBy(String),

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),

    #[error("invalid day of week: {0}")]
    InvalidDayOfWeek(String),
}
