//! Order domain types.
//!
//! Orders live in the document store with a lifecycle independent from
//! users and packages; referenced IDs are not foreign-key checked.

use serde::{Deserialize, Serialize};

use parcelhub_core::{OrderId, PackageId, UserId};

/// A shipping order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID, assigned by the document store.
    pub id: OrderId,
    pub user_id: UserId,
    pub package_id: PackageId,
    /// Origin address, free-form.
    pub address_from: String,
    /// Destination address, free-form.
    pub address_to: String,
}

/// The document body of an order; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub package_id: PackageId,
    pub address_from: String,
    pub address_to: String,
}

impl NewOrder {
    /// Attach a store-assigned ID, producing the full order.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            package_id: self.package_id,
            address_from: self.address_from,
            address_to: self.address_to,
        }
    }
}
