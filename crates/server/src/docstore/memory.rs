//! In-memory document store for tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use parcelhub_core::OrderId;

use super::{DocumentStore, DocumentStoreError};
use crate::models::{NewOrder, Order};

/// Document store keeping orders in a `Vec`, assigning sequential IDs.
#[derive(Default)]
pub struct MemoryDocumentStore {
    orders: Mutex<Vec<Order>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DocumentStoreError> {
        let mut orders = self.orders.lock().await;
        let id = i32::try_from(orders.len())
            .map_err(|_| DocumentStoreError::Backend("order id overflow".to_owned()))?
            + 1;
        let created = order.with_id(OrderId::new(id));
        orders.push(created.clone());
        Ok(created)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, DocumentStoreError> {
        Ok(self.orders.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelhub_core::{PackageId, UserId};

    fn order(user: i32) -> NewOrder {
        NewOrder {
            user_id: UserId::new(user),
            package_id: PackageId::new(1),
            address_from: "1 Depot Way".to_owned(),
            address_to: "9 Harbor St".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryDocumentStore::new();
        let first = store.insert_order(order(1)).await.expect("insert");
        let second = store.insert_order(order(2)).await.expect("insert");

        assert_eq!(first.id, OrderId::new(1));
        assert_eq!(second.id, OrderId::new(2));
    }

    #[tokio::test]
    async fn test_list_returns_inserted_orders() {
        let store = MemoryDocumentStore::new();
        store.insert_order(order(1)).await.expect("insert");
        store.insert_order(order(2)).await.expect("insert");

        let orders = store.list_orders().await.expect("list");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].user_id, UserId::new(1));
        assert_eq!(orders[1].user_id, UserId::new(2));
    }
}
