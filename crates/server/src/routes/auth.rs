//! Authentication route handlers.
//!
//! Handles login (`POST /token`) and registration (`POST /register`). Both
//! endpoints produce tokens rather than consume them, so neither sits behind
//! the bearer gate.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Login form data (OAuth2 password grant shape).
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub age: Option<i32>,
}

/// Bearer token response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Exchange username/password for a bearer token.
///
/// Unknown username and wrong password both map to the same 401.
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>> {
    let access_token = state.auth().login(&form.username, &form.password).await?;
    Ok(Json(TokenResponse::bearer(access_token)))
}

/// Register a new user and return their first bearer token.
///
/// A duplicate username or email responds 409.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let (user, access_token) = state
        .auth()
        .register(
            &request.username,
            &request.email,
            &request.password,
            request.age,
        )
        .await?;

    tracing::info!(username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(TokenResponse::bearer(access_token))))
}
