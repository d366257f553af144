// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the keyrack vault.
//!
//! A thin transport: handlers marshal requests and responses and map typed
//! service errors to status codes. All cryptography and policy live behind
//! [`keyrack_vault::VaultService`]; nothing in this crate touches a key.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
