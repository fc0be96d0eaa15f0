//! # qaboard: a points-based Q&A board
//!
//! Devices register with their hardware address and start with a balance of points. Posting a
//! question costs points; other users answer, and the asker can reward an answer by tipping its
//! author. Tipping is the one operation with a real invariant: the two balance changes and the
//! answer's tip counter move together or not at all.
//!
//! ## Architecture
//!
//! The HTTP layer ([`api`]) is built on [Axum](https://github.com/tokio-rs/axum). Handlers reach
//! persistence through an injected [`store::ForumStore`] held in [`AppState`]; operations that
//! move points go through the [`ledger`], which applies the points policy from [`config`] and
//! records [`metrics`]. The production store is PostgreSQL ([`store::PostgresStore`], built on
//! the repositories in [`db`]); an in-memory store backs the tests and `database.type: memory`.
//!
//! ```text
//! api::handlers ──▶ ledger ──▶ ForumStore ──▶ PostgresStore ──▶ db::handlers ──▶ PostgreSQL
//!        │                          ▲     └─▶ InMemoryStore
//!        └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use qaboard::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = qaboard::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     qaboard::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod ledger;
mod metrics;
mod openapi;
pub mod store;
pub mod telemetry;
pub mod types;

#[cfg(test)]
mod test_utils;

use crate::config::{CorsOrigin, DatabaseConfig};
use crate::openapi::ApiDoc;
use crate::store::{ForumStore, InMemoryStore, PostgresStore};
use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{AnswerId, QuestionId, UserId};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .store(Arc::new(InMemoryStore::new()))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn ForumStore>,
    pub config: Config,
}

/// Get the qaboard database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the configured store. For PostgreSQL this also runs pending migrations.
async fn setup_store(config: &Config) -> anyhow::Result<(Arc<dyn ForumStore>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let pool = pool.pool_options().connect(url).await?;
            migrator().run(&pool).await?;
            let store: Arc<dyn ForumStore> = Arc::new(PostgresStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
        DatabaseConfig::Memory => {
            info!("Using in-memory store: data will be lost on shutdown");
            let store: Arc<dyn ForumStore> = Arc::new(InMemoryStore::new());
            Ok((store, None))
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        if let CorsOrigin::Url(url) = origin {
            origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
        }
    }

    let mut cors = CorsLayer::new()
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    // tower-http rejects a literal "*" inside an origin list
    let has_wildcard = config.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));
    cors = if has_wildcard {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        cors.allow_origin(origins).allow_credentials(config.cors.allow_credentials)
    };

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with every endpoint and middleware:
/// board routes, OpenAPI docs, optional Prometheus metrics, CORS and request tracing.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;
    let enable_metrics = state.config.enable_metrics;

    let router = Router::new()
        .route("/", get(api::handlers::system::root))
        .route("/healthz", get(api::handlers::system::healthz))
        .route("/auth", post(api::handlers::auth::auth))
        .route("/register", post(api::handlers::auth::register))
        .route("/add-question", post(api::handlers::questions::add_question))
        .route("/questions", get(api::handlers::questions::list_questions))
        .route("/questions/{id}/answers", get(api::handlers::answers::list_answers))
        .route("/answer", post(api::handlers::answers::post_answer))
        .route("/tip", post(api::handlers::tips::tip))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }));

    let mut router = router.layer(cors_layer);

    if enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route(
                "/internal/metrics",
                get(|| async move { metrics::render(metric_handle.render()) }),
            )
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured, ready-to-serve board.
///
/// 1. **Create**: [`Application::new`] connects the store and runs migrations
/// 2. **Serve**: [`Application::serve`] binds to the configured address and handles requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, the pool is
///    closed and pending spans are flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting qaboard with configuration: {:#?}", config);

        let (store, pool) = setup_store(&config).await?;
        let state = AppState::builder().store(store).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "qaboard listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
