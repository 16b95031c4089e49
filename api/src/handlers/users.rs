//! User handlers
//!
//! Endpoints under `/v2/user`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::domain::entities::User;
use crate::domain::ports::{ImageStore, Storage};
use crate::error::{ApiResponse, AppError};
use crate::AppState;

/// Advertised login session lifetime
const SESSION_TTL_SECS: i64 = 3600;
/// Advertised calls per hour allowed for a session
const SESSION_RATE_LIMIT: &str = "100";

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /v2/user
pub async fn create_user<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(user): Json<User>,
) -> Result<Json<User>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.user_service.create_user(&user).await?;
    Ok(Json(user))
}

/// POST /v2/user/createWithArray
pub async fn create_users_with_array<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(users): Json<Vec<User>>,
) -> Result<Json<Vec<User>>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.user_service.create_users_with_array(&users).await?;
    Ok(Json(users))
}

/// POST /v2/user/createWithList
pub async fn create_users_with_list<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(users): Json<Vec<User>>,
) -> Result<Json<Vec<User>>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.user_service.create_users_with_list(&users).await?;
    Ok(Json(users))
}

/// GET /v2/user/login?username=..&password=..
pub async fn login<S, IS>(
    State(state): State<AppState<S, IS>>,
    Query(query): Query<LoginQuery>,
) -> Result<impl IntoResponse, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    if query.username.is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    state
        .user_service
        .login(&query.username, &query.password)
        .await?;

    let expires_after = (Utc::now() + Duration::seconds(SESSION_TTL_SECS)).to_rfc3339();
    let headers = [
        ("X-Rate-Limit", SESSION_RATE_LIMIT.to_string()),
        ("X-Expires-After", expires_after),
    ];
    let body = ApiResponse::new(
        200,
        "ok",
        format!("logged in user session: {}", query.username),
    );

    Ok((headers, Json(body)))
}

/// GET /v2/user/logout
pub async fn logout<S, IS>(
    State(state): State<AppState<S, IS>>,
) -> Result<Json<ApiResponse>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.user_service.logout().await?;
    Ok(Json(ApiResponse::new(200, "ok", "logged out")))
}

/// GET /v2/user/:username
pub async fn get_user<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(username): Path<String>,
) -> Result<Json<User>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let user = state.user_service.get_user_by_username(&username).await?;
    Ok(Json(user))
}

/// PUT /v2/user/:username
///
/// Replace the whole user document. The body may rename the user.
pub async fn update_user<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(username): Path<String>,
    Json(user): Json<User>,
) -> Result<Json<User>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let updated = state
        .user_service
        .update_user_by_username(&username, &user)
        .await?;
    Ok(Json(updated))
}

/// DELETE /v2/user/:username
pub async fn delete_user<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.user_service.delete_user_by_username(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}
