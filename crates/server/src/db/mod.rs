//! Record persistence for the relational system of record.
//!
//! ## Tables
//!
//! - `users` - Identity records; username and email are unique
//! - `packages` - Shipment descriptors, many per user
//!
//! The [`RecordStore`] trait is the narrow seam between the service and the
//! relational store: handlers and services only ever see the trait, which
//! keeps query execution an external concern and lets tests substitute
//! in-memory doubles.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and are applied
//! explicitly with `psql`; they are never run at startup.

pub mod postgres;
#[cfg(test)]
pub mod testing;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use parcelhub_core::Username;

use crate::models::{NewPackage, NewUser, Package, User};

pub use postgres::PgRecordStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Gateway to the relational store for users and packages.
///
/// Every write commits atomically as a single record insert; uniqueness is
/// enforced by the database, not by the caller.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check connectivity to the underlying store.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Look up a user by username.
    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError>;

    /// Insert a user, assigning its ID.
    ///
    /// A username or email collision surfaces as [`RepositoryError::Conflict`]
    /// and leaves no partial record behind.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// List all users.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert a package, assigning its ID.
    async fn insert_package(&self, package: NewPackage) -> Result<Package, RepositoryError>;

    /// List all packages.
    async fn list_packages(&self) -> Result<Vec<Package>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
