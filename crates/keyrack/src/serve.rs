// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyrack serve` command implementation.
//!
//! Opens the vault database, wires the vault service into the HTTP gateway,
//! and serves until interrupted.

use std::sync::Arc;

use keyrack_config::KeyrackConfig;
use keyrack_core::KeyrackError;
use keyrack_gateway::{GatewayState, ServerConfig, start_server};
use keyrack_storage::Database;
use keyrack_vault::VaultService;
use tracing::info;

/// Runs the `keyrack serve` command.
///
/// The database open runs migrations; the gateway binds after the service is
/// ready, so no request can observe a half-migrated store.
pub async fn run_serve(config: KeyrackConfig) -> Result<(), KeyrackError> {
    init_tracing(&config.log.level);

    info!("starting keyrack serve");

    let db = Database::open(&config.storage.database_path).await?;
    let service = VaultService::new(db, &config.vault)?;

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let state = GatewayState {
        service: Arc::new(service),
    };

    tokio::select! {
        result = start_server(&server_config, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyrack={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
