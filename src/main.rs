//! Release Dashboard Backend
//!
//! REST backend serving user management over SQLite and release analytics
//! computed from a CSV snapshot.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod releases;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use releases::ReleaseDataset;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub releases: Arc<ReleaseDataset>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Release Dashboard Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Release data path: {:?}", config.release_data_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Load the release snapshot before accepting requests
    let releases = match releases::load(&config.release_data_path).await {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            tracing::error!("Failed to load release data: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState {
        repo,
        releases,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let api_routes = Router::new()
        // Health
        .route("/health", get(api::health_check))
        // Users
        .route("/users", get(api::list_users).post(api::create_user))
        .route(
            "/users/{id}",
            get(api::get_user)
                .put(api::update_user)
                .delete(api::delete_user),
        )
        // Dashboard
        .route("/dashboard", get(api::get_dashboard))
        .route("/timeline", get(api::get_timeline))
        .route("/calendar", get(api::get_calendar))
        .route("/weekday", get(api::get_weekday))
        .route("/time-distribution", get(api::get_time_distribution))
        .route("/contributors", get(api::get_contributors))
        .route("/release-types", get(api::get_release_types))
        .route("/word-cloud", get(api::get_word_cloud))
        // Raw snapshot
        .route("/releases", get(api::list_releases))
        .route("/releases/summary", get(api::get_release_summary));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured frontend origin, or any origin when unset.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(_)) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
