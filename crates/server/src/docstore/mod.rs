//! Document store for orders.
//!
//! Orders are schemaless documents with a lifecycle independent from the
//! relational records. The [`DocumentStore`] trait is the narrow seam to the
//! storage engine; the production backend keeps documents in a JSONB table,
//! and tests substitute an in-memory backend.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewOrder, Order};

pub use postgres::PgDocumentStore;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The storage engine failed.
    #[error("document store backend error: {0}")]
    Backend(String),

    /// A document could not be (de)serialized.
    #[error("document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for DocumentStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Storage contract for order documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert an order document, assigning its ID.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DocumentStoreError>;

    /// List all order documents.
    async fn list_orders(&self) -> Result<Vec<Order>, DocumentStoreError>;
}
