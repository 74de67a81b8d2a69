//! HTTP request handlers for `/api/users`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::api::AppState;
use crate::api::envelope::{Created, Envelope};
use crate::api::error::{ApiError, ApiResult};
use crate::id::UserId;
use crate::model::User;

/// Parse the `{id}` path segment.
fn parse_user_id(raw: &str) -> ApiResult<UserId> {
    raw.parse()
        .map_err(|e| ApiError::MalformedIdentifier(format!("{raw}: {e}")))
}

/// Decode a request body into a user record. The content type is not checked.
///
/// A body that could not be read keeps the rejection's status (413 when over
/// the size limit), a body that is not a user object is 422.
fn decode_user(body: Result<Bytes, BytesRejection>) -> ApiResult<User> {
    let body = body?;
    serde_json::from_slice(&body).map_err(|e| ApiError::MalformedInput(e.to_string()))
}

/// POST /api/users
#[tracing::instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Created>>)> {
    let user = decode_user(body)?;
    let uuid = state.store.create(user)?;
    Ok((StatusCode::CREATED, Json(Envelope::data(Created { uuid }))))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<User>>>> {
    let users = state.store.list_all()?;
    Ok(Json(Envelope::data(users)))
}

/// GET /api/users/{id}
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<User>>> {
    let id = parse_user_id(&id)?;
    let user = state.store.get(&id)?;
    Ok(Json(Envelope::data(user)))
}

/// PUT /api/users/{id}
///
/// The body is decoded before the store is consulted, so a malformed body on
/// an unknown id is reported as 422.
#[tracing::instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Envelope<()>>> {
    let id = parse_user_id(&id)?;
    let user = decode_user(body)?;
    state.store.update(&id, user)?;
    Ok(Json(Envelope::message("User updated")))
}

/// DELETE /api/users/{id}
#[tracing::instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    let id = parse_user_id(&id)?;
    state.store.delete(&id)?;
    Ok(Json(Envelope::message("User deleted")))
}

/// Fallback for unknown routes
pub async fn route_not_found() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::NOT_FOUND, Json(Envelope::message("Route not found")))
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(Envelope::message("Method not allowed")),
    )
}
