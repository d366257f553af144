// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service-error to HTTP-status mapping.
//!
//! Authentication and decryption failures both map to 401 with the error's
//! generic message; raw error detail (stack, source chains) never reaches the
//! response body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keyrack_core::KeyrackError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Newtype carrying a service error across the handler boundary.
#[derive(Debug)]
pub struct ApiError(pub KeyrackError);

impl From<KeyrackError> for ApiError {
    fn from(err: KeyrackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            KeyrackError::NotInitialized => StatusCode::NOT_FOUND,
            KeyrackError::AlreadyInitialized => StatusCode::BAD_REQUEST,
            KeyrackError::Authentication | KeyrackError::Decryption => StatusCode::UNAUTHORIZED,
            KeyrackError::WeakPassword(_) => StatusCode::UNPROCESSABLE_ENTITY,
            KeyrackError::NotFound { .. } => StatusCode::NOT_FOUND,
            KeyrackError::Storage { .. }
            | KeyrackError::Config(_)
            | KeyrackError::Crypto(_)
            | KeyrackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            // Internal detail stays in the log.
            return (
                status,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response();
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
