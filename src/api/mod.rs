use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::library::UploadVault;
use crate::services::{
    AccountService, DefaultOnboardingService, OnboardingService, SeaOrmAccountService,
};

pub mod auth;
mod error;
mod observability;
mod profile;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub vault: UploadVault,

    pub onboarding: Arc<dyn OnboardingService>,

    pub accounts: Arc<dyn AccountService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let vault = UploadVault::new(&config.storage.retained_path);
    vault.ensure_exists().await?;
    tokio::fs::create_dir_all(&config.storage.upload_path).await?;

    let onboarding: Arc<dyn OnboardingService> = Arc::new(DefaultOnboardingService::new(
        store.clone(),
        vault.clone(),
        config.security.clone(),
    ));
    let accounts: Arc<dyn AccountService> = Arc::new(SeaOrmAccountService::new(store.clone()));

    Ok(Arc::new(AppState {
        config,
        store,
        vault,
        onboarding,
        accounts,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let max_upload_bytes = state.config.storage.max_upload_bytes;

    let api_router = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/{username}/profile", get(profile::read_profile))
        .route("/system/status", get(system::get_status))
        .route("/system/health/live", get(system::health_live))
        .with_state(state.clone());

    let metrics_router = Router::new()
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .merge(metrics_router)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests))
}
