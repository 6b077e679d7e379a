//! Package route handlers. All routes require a bearer token.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use parcelhub_core::UserId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{NewPackage, Package};
use crate::state::AppState;

/// Package creation request body.
#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub user_id: UserId,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub weight: f64,
}

/// Create a package for a user.
pub async fn create(
    RequireAuth(_subject): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreatePackageRequest>,
) -> Result<(StatusCode, Json<Package>)> {
    let package = state
        .store()
        .insert_package(NewPackage {
            user_id: request.user_id,
            height: request.height,
            width: request.width,
            length: request.length,
            weight: request.weight,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(package)))
}

/// List all packages.
pub async fn index(
    RequireAuth(_subject): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Package>>> {
    let packages = state.store().list_packages().await?;
    Ok(Json(packages))
}
