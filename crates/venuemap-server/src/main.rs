mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use venuemap_core::{AppConfig, Environment};
use venuemap_discovery::{
    Geocoder, PgCategoryStore, PgVenueStore, PlaceProvider, UnconfiguredGoogle,
    VenueImportEngine, VenueSearchEngine,
};
use venuemap_places::GoogleMapsClient;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = venuemap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = venuemap_db::PoolConfig::from_app_config(&config);
    let pool = venuemap_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = venuemap_db::run_migrations(&pool).await?;
    tracing::info!(migrations = applied, "database ready");

    let state = build_state(&config, pool)?;
    let auth = AuthState::from_env(matches!(config.env, Environment::Development))?;
    let rate_limit = RateLimitState::per_minute(config.rate_limit_per_minute);
    let app = build_app(state, auth, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "venuemap-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_state(config: &AppConfig, pool: sqlx::PgPool) -> anyhow::Result<AppState> {
    let (geocoder, places): (Arc<dyn Geocoder>, Arc<dyn PlaceProvider>) =
        if let Some(key) = config.google_maps_api_key.as_deref() {
            let client = Arc::new(
                GoogleMapsClient::new(key, config.places_request_timeout_secs)?
                    .with_connect_timeout(config.places_connect_timeout_secs)?
                    .with_retry(
                        config.places_max_retries,
                        config.places_retry_backoff_base_ms,
                    ),
            );
            (client.clone(), client)
        } else {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set; geocoding and imports are disabled");
            (Arc::new(UnconfiguredGoogle), Arc::new(UnconfiguredGoogle))
        };

    let venues = Arc::new(PgVenueStore::new(pool.clone()));
    let categories = Arc::new(PgCategoryStore::new(pool.clone()));

    Ok(AppState {
        pool,
        search: VenueSearchEngine::new(venues.clone(), categories.clone(), geocoder),
        import: VenueImportEngine::new(places, venues, categories),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
