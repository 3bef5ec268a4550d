//! # raktmap: blood-donation coordination backend
//!
//! `raktmap` is a small control plane sitting between hospitals that need
//! blood units and donors willing to give them. Hospitals post blood
//! requests (group, quantity, deadline); donors follow an SMS link, share
//! their location, and confirm availability; the service tracks fulfillment.
//!
//! ## What It Does
//!
//! The interesting part of the system is deliberately small. A blood
//! request carries a `confirmed_units` counter and a `quantity` cap, and
//! the one correctness guarantee the service makes is that the counter
//! never exceeds the cap, no matter how many donors confirm at once. That
//! guarantee comes from a single conditional `UPDATE` against PostgreSQL
//! (see [`db::handlers::BloodRequests::try_confirm_unit`]); there is no
//! application-level locking anywhere. Status derivation and the donor
//! record bookkeeping hang off that one operation.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum)
//! for the HTTP layer and uses PostgreSQL (via SQLx) for all persistence.
//!
//! - The **API layer** ([`api`]) exposes the donor-facing endpoints under
//!   `/api`: request lookup, request creation, and confirmation.
//! - The **database layer** ([`db`]) uses the repository pattern; each
//!   entity has a repository handling queries and mutations.
//! - [`config`] loads YAML + environment configuration via figment;
//!   [`telemetry`] wires up tracing; [`errors`] maps failures to HTTP
//!   responses.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use raktmap::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = raktmap::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     raktmap::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod geo;
pub mod ids;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;

use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};

use crate::config::CorsOrigin;

/// Application state shared across all request handlers.
///
/// The pool is the explicitly constructed, dependency-injected store
/// handle: built once at startup, cloned into every handler, no global
/// connection caching.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the raktmap database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(config.cors.allow_credentials);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// `/api/bloodrequest/confirm` and `/api/save-location` are two historical
/// paths for the same confirmation handler; both are kept for link
/// compatibility.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route("/bloodrequest", post(api::handlers::blood_requests::create_blood_request))
        .route("/bloodrequest/confirm", post(api::handlers::blood_requests::confirm_donation))
        .route("/bloodrequest/{id}", get(api::handlers::blood_requests::get_blood_request))
        .route("/save-location", post(api::handlers::blood_requests::confirm_donation))
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects the pool and runs
///    migrations
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.pool.max_connections)
            .min_connections(config.database.pool.min_connections)
            .acquire_timeout(Duration::from_secs(config.database.pool.acquire_timeout_secs))
            .connect(&config.database.url)
            .await?;

        migrator().run(&pool).await?;

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
        };
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("raktmap listening on http://{bind_addr}");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
