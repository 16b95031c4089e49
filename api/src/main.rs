//! Petstore API Server
//!
//! Pets, store orders and user accounts backed by a document-style store.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{LocalImageStore, PostgresStorage};
use app::{PetService, StoreService, UserService};
use config::Config;
use domain::ports::{ImageStore, Storage};

/// Application state shared across all handlers
pub struct AppState<S, IS>
where
    S: Storage,
    IS: ImageStore,
{
    pub user_service: Arc<UserService<S>>,
    pub pet_service: Arc<PetService<S, IS>>,
    pub store_service: Arc<StoreService<S>>,
}

impl<S, IS> AppState<S, IS>
where
    S: Storage,
    IS: ImageStore,
{
    pub fn new(storage: Arc<S>, images: Arc<IS>, public_base_uri: &str) -> Self {
        Self {
            user_service: Arc::new(UserService::new(storage.clone())),
            pet_service: Arc::new(PetService::new(storage.clone(), images, public_base_uri)),
            store_service: Arc::new(StoreService::new(storage)),
        }
    }
}

// Derived Clone would require S: Clone and IS: Clone
impl<S, IS> Clone for AppState<S, IS>
where
    S: Storage,
    IS: ImageStore,
{
    fn clone(&self) -> Self {
        Self {
            user_service: self.user_service.clone(),
            pet_service: self.pet_service.clone(),
            store_service: self.store_service.clone(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router: API under `/v2`, uploaded images under
/// `public_uri`, and the health probe.
///
/// `upload_max_bytes` caps the image upload body; every other route keeps
/// axum's default limit.
pub fn build_router<S, IS>(
    state: AppState<S, IS>,
    public_uri: &str,
    public_path: &Path,
    upload_max_bytes: usize,
) -> Router
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let api = Router::new()
        // Pets
        .route(
            "/pet",
            post(handlers::add_pet::<S, IS>).put(handlers::update_pet::<S, IS>),
        )
        .route(
            "/pet/findByStatus",
            get(handlers::find_pets_by_status::<S, IS>),
        )
        .route(
            "/pet/:pet_id",
            get(handlers::get_pet::<S, IS>)
                .post(handlers::update_pet_with_form::<S, IS>)
                .delete(handlers::delete_pet::<S, IS>),
        )
        .route(
            "/pet/:pet_id/uploadImage",
            post(handlers::upload_image::<S, IS>)
                .layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        // Store
        .route("/store/inventory", get(handlers::get_inventory::<S, IS>))
        .route("/store/order", post(handlers::place_order::<S, IS>))
        .route(
            "/store/order/:order_id",
            get(handlers::get_order::<S, IS>).delete(handlers::delete_order::<S, IS>),
        )
        // Users
        .route("/user", post(handlers::create_user::<S, IS>))
        .route(
            "/user/createWithArray",
            post(handlers::create_users_with_array::<S, IS>),
        )
        .route(
            "/user/createWithList",
            post(handlers::create_users_with_list::<S, IS>),
        )
        .route("/user/login", get(handlers::login::<S, IS>))
        .route("/user/logout", get(handlers::logout::<S, IS>))
        .route(
            "/user/:username",
            get(handlers::get_user::<S, IS>)
                .put(handlers::update_user::<S, IS>)
                .delete(handlers::delete_user::<S, IS>),
        );

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/v2", api);

    // An absolute URL means images are served elsewhere
    if public_uri.is_empty() {
        router = router.fallback_service(ServeDir::new(public_path));
    } else if public_uri.starts_with('/') {
        router = router.nest_service(public_uri, ServeDir::new(public_path));
    }

    router
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,petstore_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Petstore API...");

    // Load configuration
    let config = Config::from_env()?;

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = adapters::postgres::connect(&config.database_url, config.database_timeout)
        .await
        .context("Failed to connect to database")?;
    adapters::postgres::ensure_schema(&db)
        .await
        .context("Failed to prepare collections")?;
    tracing::info!("Database connected");

    // Create adapters
    let storage = Arc::new(PostgresStorage::new(db, config.database_timeout));
    let images = Arc::new(LocalImageStore::new(config.public_file_path.clone()));
    images.ensure_dir().await.with_context(|| {
        format!(
            "Failed to create image directory {}",
            config.public_file_path.display()
        )
    })?;

    let state = AppState::new(storage, images, &config.public_base_uri);

    // Per-IP rate limiting
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .context("Invalid rate limit settings")?,
    );

    let app = build_router(
        state,
        &config.public_base_uri,
        &config.public_file_path,
        config.upload_max_bytes,
    )
    .layer(GovernorLayer {
        config: governor_config,
    });

    // Start server
    let addr = config.listen_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
