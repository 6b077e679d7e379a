//! User route handlers. All routes require a bearer token.

use axum::{
    Json,
    extract::{Path, State},
};

use parcelhub_core::Username;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::UserResponse;
use crate::state::AppState;

/// List all users.
pub async fn index(
    RequireAuth(_subject): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.store().list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a single user by username, through the cache.
pub async fn show(
    RequireAuth(_subject): RequireAuth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    // A name that cannot parse cannot be registered either.
    let username =
        Username::parse(&username).map_err(|_| AppError::NotFound("user".to_owned()))?;

    let user = state.users().get(&username).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("user".to_owned()),
        other => AppError::Database(other),
    })?;

    Ok(Json(user.into()))
}
