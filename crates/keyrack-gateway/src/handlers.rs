// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the vault REST API.
//!
//! Every authenticated route takes the master password from the
//! `master-password` header; a missing or non-ASCII header fails closed with
//! 401 before the service is ever consulted.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use keyrack_core::{CreateOutcome, KeyrackError};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Header carrying the master password on authenticated routes.
pub const MASTER_PASSWORD_HEADER: &str = "master-password";

/// Request body for POST /initialize/ and POST /verify/.
#[derive(Debug, Deserialize)]
pub struct MasterPasswordBody {
    pub master_password: String,
}

/// Response body for GET /status/.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub is_initialized: bool,
}

/// Response body for POST /initialize/ and POST /verify/.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for GET /apps/.
#[derive(Debug, Serialize)]
pub struct AppsResponse {
    pub apps: Vec<String>,
}

/// Request body for POST /credentials/.
#[derive(Debug, Deserialize)]
pub struct CredentialCreateRequest {
    pub app_name: String,
    pub username: String,
    pub created_by: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for PUT /credentials/{id}.
#[derive(Debug, Deserialize)]
pub struct CredentialUpdateRequest {
    #[serde(default)]
    pub password: Option<String>,
}

/// Query parameters for GET /credentials/.
#[derive(Debug, Deserialize)]
pub struct CredentialListQuery {
    #[serde(default)]
    pub app_name: Option<String>,
}

/// Response body for a successful creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// Response body when the (app_name, username) pair already exists.
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub message: &'static str,
    pub existing_id: i64,
    pub app_name: String,
    pub username: String,
    pub created_by: String,
}

/// Response body for PUT /credentials/{id}.
#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub message: &'static str,
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// One row of GET /credentials/.
///
/// `encrypted_password` carries the decrypted plaintext in the response; the
/// field keeps the stored column's name on the wire.
#[derive(Debug, Serialize)]
pub struct CredentialItem {
    pub id: i64,
    pub app_name: String,
    pub username: String,
    pub created_by: String,
    pub encrypted_password: String,
}

/// Response body for DELETE /credentials/{id}.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Extract the master password from the request headers, failing closed.
fn master_password(headers: &HeaderMap) -> Result<SecretString, ApiError> {
    headers
        .get(MASTER_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(|value| SecretString::from(value.to_string()))
        .ok_or(ApiError(KeyrackError::Authentication))
}

/// GET /status/
pub async fn get_status(State(state): State<GatewayState>) -> Result<Response, ApiError> {
    let status = state.service.status().await?;
    Ok(Json(StatusResponse {
        is_initialized: status.is_initialized,
    })
    .into_response())
}

/// POST /initialize/
pub async fn post_initialize(
    State(state): State<GatewayState>,
    Json(body): Json<MasterPasswordBody>,
) -> Result<Response, ApiError> {
    let master = SecretString::from(body.master_password);
    state.service.initialize(&master).await?;
    Ok(Json(SuccessResponse { success: true }).into_response())
}

/// POST /verify/
pub async fn post_verify(
    State(state): State<GatewayState>,
    Json(body): Json<MasterPasswordBody>,
) -> Result<Response, ApiError> {
    let master = SecretString::from(body.master_password);
    state.service.verify(&master).await?;
    Ok(Json(SuccessResponse { success: true }).into_response())
}

/// GET /apps/
pub async fn get_apps(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let master = master_password(&headers)?;
    let apps = state.service.list_apps(&master).await?;
    Ok(Json(AppsResponse { apps }).into_response())
}

/// POST /credentials/
pub async fn post_credential(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<CredentialCreateRequest>,
) -> Result<Response, ApiError> {
    let master = master_password(&headers)?;
    let outcome = state
        .service
        .create_credential(
            &master,
            &body.app_name,
            &body.username,
            &body.created_by,
            body.password,
        )
        .await?;

    let response = match outcome {
        CreateOutcome::Created {
            id,
            generated_password,
        } => Json(CreatedResponse {
            message: "created",
            id,
            generated_password,
        })
        .into_response(),
        CreateOutcome::Duplicate {
            existing_id,
            app_name,
            username,
            created_by,
        } => Json(ExistsResponse {
            message: "exists",
            existing_id,
            app_name,
            username,
            created_by,
        })
        .into_response(),
    };
    Ok(response)
}

/// PUT /credentials/{id}
pub async fn put_credential(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<CredentialUpdateRequest>,
) -> Result<Response, ApiError> {
    let master = master_password(&headers)?;
    let updated = state
        .service
        .update_credential(&master, id, body.password)
        .await?;
    Ok(Json(UpdatedResponse {
        message: "updated",
        id: updated.id,
        generated_password: updated.generated_password,
    })
    .into_response())
}

/// GET /credentials/?app_name=
pub async fn get_credentials(
    State(state): State<GatewayState>,
    Query(query): Query<CredentialListQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let master = master_password(&headers)?;
    let credentials = state
        .service
        .list_credentials(&master, query.app_name.as_deref())
        .await?;

    let items: Vec<CredentialItem> = credentials
        .into_iter()
        .map(|cred| CredentialItem {
            id: cred.id,
            app_name: cred.app_name,
            username: cred.username,
            created_by: cred.created_by,
            encrypted_password: cred.password,
        })
        .collect();
    Ok(Json(items).into_response())
}

/// DELETE /credentials/{id}
pub async fn delete_credential(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let master = master_password(&headers)?;
    state.service.delete_credential(&master, id).await?;
    Ok(Json(MessageResponse {
        message: "credential deleted".to_string(),
    })
    .into_response())
}
