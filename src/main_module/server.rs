//! HTTP server initialization and routing

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;
use crate::intake::configure_intake_routes;
use crate::security::{
    create_cors_layer, create_security_headers_layer, security_headers_middleware,
    SecurityHeadersConfig,
};

use super::{health_check, shutdown_signal};

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let server = &app_state.config.server;
    let security_headers = SecurityHeadersConfig::for_environment(server.environment);
    let cors = create_cors_layer(&server.cors_allowed_origins);
    let max_body_bytes = server.max_body_bytes;

    // Layers run in reverse order: the last one added sees the request first.
    Router::new()
        .route(ApiUrls::HEALTH, get(health_check))
        .merge(configure_intake_routes())
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(create_security_headers_layer(security_headers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_axum_server(app_state: Arc<AppState>) -> std::io::Result<()> {
    let addr = app_state
        .config
        .server
        .socket_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app = build_router(app_state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(
                "Failed to bind to {}: {} - is another instance running?",
                addr, e
            );
            return Err(e);
        }
    };
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(std::io::Error::other)
}
