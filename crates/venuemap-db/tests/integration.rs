//! Offline unit tests for venuemap-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::{NaiveTime, Utc};
use uuid::Uuid;
use venuemap_core::{AppConfig, Environment};
use venuemap_db::{PoolConfig, VenueHourRow, VenueRow, VenueSearchRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        google_maps_api_key: None,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        places_request_timeout_secs: 30,
        places_connect_timeout_secs: 10,
        places_max_retries: 3,
        places_retry_backoff_base_ms: 500,
        rate_limit_per_minute: 120,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`VenueSearchRow`] flattens a
/// [`VenueRow`] and carries the computed distance. No database required.
#[test]
fn venue_search_row_has_expected_fields() {
    let row = VenueSearchRow {
        venue: VenueRow {
            id: Uuid::new_v4(),
            name: "The Blue Note".to_string(),
            address: "131 W 3rd St, New York".to_string(),
            latitude: 40.7308,
            longitude: -74.0005,
            google_place_id: Some("ChIJ-blue-note".to_string()),
            google_rating: Some(4.6),
            google_ratings_total: Some(5200),
            price_level: Some(3),
            website: None,
            phone: None,
            is_open_now: Some(true),
            status: "approved".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        distance_miles: 1.25,
    };

    assert_eq!(row.venue.name, "The Blue Note");
    assert_eq!(row.venue.status, "approved");
    assert_eq!(row.venue.price_level, Some(3));
    assert!((row.distance_miles - 1.25).abs() < f64::EPSILON);
}

#[test]
fn venue_hour_row_has_expected_fields() {
    let row = VenueHourRow {
        venue_id: Uuid::new_v4(),
        day_of_week: "friday".to_string(),
        open_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        close_time: NaiveTime::from_hms_opt(2, 0, 0).unwrap(),
        is_closed: false,
        is_open_24_hours: false,
    };

    assert_eq!(row.day_of_week, "friday");
    assert!(row.open_time > row.close_time);
}
