//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health             - Liveness check (in main)
//! GET  /health/ready       - Readiness check (in main)
//!
//! # Auth (produce tokens, no bearer required)
//! POST /token              - Exchange username/password for a bearer token
//! POST /register           - Register a user, returns a bearer token
//!
//! # Users (bearer required)
//! GET  /users              - List users
//! GET  /users/{username}   - Single user, served through the cache
//!
//! # Packages (bearer required)
//! POST /packages           - Create a package
//! GET  /packages           - List packages
//!
//! # Orders (document store, no bearer required)
//! POST /orders/            - Create an order
//! GET  /orders/            - List orders
//! ```

pub mod auth;
pub mod orders;
pub mod packages;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(auth::token))
        .route("/register", post(auth::register))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route("/{username}", get(users::show))
}

/// Create the package routes router.
pub fn package_routes() -> Router<AppState> {
    Router::new().route("/", post(packages::create).get(packages::index))
}

/// Create the order routes router.
///
/// Registered at the literal trailing-slash path the API has always used.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/orders/", post(orders::create).get(orders::index))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/users", user_routes())
        .nest("/packages", package_routes())
        .merge(order_routes())
}
