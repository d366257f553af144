// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use keyrack_core::KeyrackError;
use keyrack_vault::VaultService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The vault service holding all policy and cryptography.
    pub service: Arc<VaultService>,
}

/// Gateway server configuration (mirrors ServerConfig from keyrack-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the vault API router.
///
/// Exposed separately from [`start_server`] so tests can drive the router
/// in-process without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/status/", get(handlers::get_status))
        .route("/initialize/", post(handlers::post_initialize))
        .route("/verify/", post(handlers::post_verify))
        .route("/apps/", get(handlers::get_apps))
        .route(
            "/credentials/",
            post(handlers::post_credential).get(handlers::get_credentials),
        )
        .route(
            "/credentials/{id}",
            put(handlers::put_credential).delete(handlers::delete_credential),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the vault HTTP server.
///
/// Binds to the configured host:port and serves until the task is dropped or
/// the listener fails.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), KeyrackError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KeyrackError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("vault server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| KeyrackError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
