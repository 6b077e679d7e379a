//! JSONB-backed document store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use parcelhub_core::OrderId;

use super::{DocumentStore, DocumentStoreError};
use crate::models::{NewOrder, Order};

/// Document store keeping each order as a JSONB document in the
/// `order_documents` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DocumentStoreError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO order_documents (doc)
            VALUES ($1)
            RETURNING id
            ",
        )
        .bind(Json(&order))
        .fetch_one(&self.pool)
        .await?;

        Ok(order.with_id(OrderId::new(id)))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, DocumentStoreError> {
        let rows = sqlx::query_as::<_, (i32, Json<NewOrder>)>(
            r"
            SELECT id, doc
            FROM order_documents
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(doc))| doc.with_id(OrderId::new(id)))
            .collect())
    }
}
