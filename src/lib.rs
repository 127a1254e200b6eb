// src/lib.rs

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod state;

use crate::handlers::{generate_text, health_check, server_status};
use crate::middleware::{no_cache_middleware, request_size_limit_middleware};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request as AxumRequest},
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc, time::Instant};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub use config::AppConfig;
pub use core::KeyRotationProxy;
pub use error::{AppError, Result};
pub use state::AppState;

/// Builds the application router.
///
/// Routes are served both under `/api` and at the root so the service works
/// behind hosts that strip the `/api` prefix.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/generate-text", post(generate_text))
        .route("/status", get(server_status));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_routes.clone())
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.max_request_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(trace_requests))
                .layer(CorsLayer::permissive())
                .layer(from_fn(no_cache_middleware))
                .layer(from_fn_with_state(state.clone(), request_size_limit_middleware)),
        )
        .with_state(state)
}

/// Middleware adding a request ID and a tracing span to each request.
async fn trace_requests(
    mut req: AxumRequest<Body>,
    next: axum::middleware::Next,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        http.method = %method,
        url.path = %path,
    );

    req.extensions_mut().insert(request_id);

    async move {
        let mut response = next.run(req).await;
        let elapsed = start_time.elapsed();

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("X-Request-ID", value);
        }

        info!(
            http.response.duration = ?elapsed,
            http.status_code = response.status().as_u16(),
            "Finished processing request"
        );

        response
    }
    .instrument(span)
    .await
}

/// Loads configuration, builds the shared state and returns the router
/// together with the configuration it was built from.
pub async fn run(
    config_path_override: Option<PathBuf>,
) -> std::result::Result<(Router, AppConfig), AppError> {
    info!("Starting fiction text-generation proxy...");

    let app_config = setup_configuration(config_path_override)?;

    let app_state = AppState::new(&app_config).map_err(|e| {
        error!(error = ?e, "Failed to initialize application state. Exiting.");
        e
    })?;
    info!("Application state initialized successfully.");

    Ok((create_router(Arc::new(app_state)), app_config))
}

/// Resolves the config path, then loads, validates and logs the configuration.
pub fn setup_configuration(config_path_override: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = config_path_override.unwrap_or_else(|| {
        std::env::var("FICTION_PROXY_CONFIG").map_or_else(|_| PathBuf::from("config.yaml"), PathBuf::from)
    });

    let config_path_display = config_path.display().to_string();
    if config_path.exists() {
        info!(config.path = %config_path_display, "Using configuration file");
    } else {
        info!(config.path = %config_path_display, "Optional configuration file not found. Using defaults and environment variables.");
    }

    let app_config = config::load_config(&config_path).map_err(|e| {
        error!(
            config.path = %config_path_display,
            error = ?e,
            "Failed to load or validate configuration. Exiting."
        );
        e
    })?;

    info!(
        config.usable_keys = app_config.usable_key_count(),
        upstream.base_url = %app_config.upstream.base_url,
        server.port = app_config.server.port,
        "Configuration loaded and validated successfully."
    );

    Ok(app_config)
}
