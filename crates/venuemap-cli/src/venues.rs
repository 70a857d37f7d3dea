//! Venue command handlers for the CLI.
//!
//! Unlike the HTTP surface these commands surface errors directly, so a failed
//! import or search exits non-zero with the cause instead of printing an
//! empty result.

use std::sync::Arc;

use clap::Subcommand;
use venuemap_core::{
    AppConfig, Coordinate, SearchCriteria, SortBy, SortOrder, Venue, VenueQuery,
    DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_MILES,
};
use venuemap_discovery::{error_chain, PgCategoryStore, PgVenueStore, VenueImportEngine};
use venuemap_places::GoogleMapsClient;

/// Sub-commands available under `venues`.
#[derive(Debug, Subcommand)]
pub enum VenuesCommands {
    /// Search approved venues around a point
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in miles
        #[arg(long)]
        radius: Option<f64>,
        /// Free text matched against name and address
        #[arg(long)]
        query: Option<String>,
        /// Category name filter (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// relevance, distance, rating, or name
        #[arg(long)]
        sort: Option<SortBy>,
        /// asc or desc
        #[arg(long)]
        order: Option<SortOrder>,
        #[arg(long)]
        open_now: bool,
        #[arg(long, default_value = "20")]
        limit: i64,
        #[arg(long, default_value = "0")]
        offset: i64,
    },
    /// List the closest venues to a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Resolve an address to coordinates via Google
    Geocode { address: String },
    /// Import nearby places from Google as pending venues
    Import {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value = "10")]
        radius: f64,
        /// Google place type hint (e.g. bar, restaurant)
        #[arg(long = "type")]
        place_type: Option<String>,
    },
    /// List venue categories
    Types,
}

/// Dispatch a `venues` sub-command.
///
/// # Errors
///
/// Returns an error if a query fails, the Google client cannot be built, or
/// an import is interrupted by a collaborator failure.
pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: VenuesCommands,
) -> anyhow::Result<()> {
    match command {
        VenuesCommands::Search {
            lat,
            lon,
            radius,
            query,
            categories,
            sort,
            order,
            open_now,
            limit,
            offset,
        } => {
            let category_ids = if categories.is_empty() {
                Vec::new()
            } else {
                let found = venuemap_db::find_categories_by_names(pool, &categories).await?;
                if found.len() < categories.len() {
                    tracing::warn!(
                        requested = ?categories,
                        "some category names did not match a known category"
                    );
                }
                found.into_iter().map(|c| c.id).collect()
            };

            let criteria = SearchCriteria {
                latitude: Some(lat),
                longitude: Some(lon),
                radius_miles: radius,
                query,
                category_ids,
                sort_by: sort,
                order,
                open_now: open_now.then_some(true),
                price_level: None,
                limit: Some(limit),
                offset: Some(offset),
            };
            let query = VenueQuery::from_criteria(&criteria)
                .ok_or_else(|| anyhow::anyhow!("latitude and longitude are required"))?;
            let (venues, total) = venuemap_db::search_venues(pool, &query).await?;

            println!("{total} venue(s) match; showing {}", venues.len());
            print_venues(&venues);
        }
        VenuesCommands::Nearby {
            lat,
            lon,
            radius,
            limit,
        } => {
            let query = VenueQuery::nearby(
                Coordinate::new(lat, lon),
                radius.unwrap_or(DEFAULT_NEARBY_RADIUS_MILES),
                limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
            );
            let (venues, _) = venuemap_db::search_venues(pool, &query).await?;
            print_venues(&venues);
        }
        VenuesCommands::Geocode { address } => {
            let client = google_client(config)?;
            match client.geocode(&address).await? {
                Some(c) => println!("{:.6}, {:.6}", c.latitude, c.longitude),
                None => anyhow::bail!("address '{address}' could not be geocoded"),
            }
        }
        VenuesCommands::Import {
            lat,
            lon,
            radius,
            place_type,
        } => {
            let client = Arc::new(google_client(config)?);
            let engine = VenueImportEngine::new(
                client,
                Arc::new(PgVenueStore::new(pool.clone())),
                Arc::new(PgCategoryStore::new(pool.clone())),
            );
            let report = engine
                .try_import_venues_from_google(lat, lon, radius, place_type.as_deref())
                .await
                .map_err(|e| anyhow::anyhow!("import failed: {}", error_chain(&e)))?;

            println!(
                "candidates: {}  created: {}  already present: {}  no details: {}",
                report.candidates, report.created, report.already_present, report.details_missing
            );
        }
        VenuesCommands::Types => {
            for category in venuemap_db::list_venue_categories(pool).await? {
                println!("{}  {}", category.id, category.name);
            }
        }
    }

    Ok(())
}

fn google_client(config: &AppConfig) -> anyhow::Result<GoogleMapsClient> {
    let key = config
        .google_maps_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("GOOGLE_MAPS_API_KEY must be set for this command"))?;
    let client = GoogleMapsClient::new(key, config.places_request_timeout_secs)?
        .with_connect_timeout(config.places_connect_timeout_secs)?
        .with_retry(config.places_max_retries, config.places_retry_backoff_base_ms);
    Ok(client)
}

fn print_venues(venues: &[Venue]) {
    for venue in venues {
        println!("{}", format_venue_line(venue));
    }
}

pub(crate) fn format_venue_line(venue: &Venue) -> String {
    let distance = venue
        .distance_miles
        .map_or_else(|| "-".to_string(), |d| format!("{d:.2} mi"));
    let rating = venue
        .google_rating
        .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
    let categories: Vec<&str> = venue.categories.iter().map(|c| c.name.as_str()).collect();

    format!(
        "{:>8}  {:>4}  {}  [{}]  {}",
        distance,
        rating,
        venue.name,
        categories.join(", "),
        venue.address
    )
}
