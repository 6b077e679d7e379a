//! Package domain types.

use serde::{Deserialize, Serialize};

use parcelhub_core::{PackageId, UserId};

/// A shipment descriptor. Many packages per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Unique package ID.
    pub id: PackageId,
    /// Owning user.
    pub user_id: UserId,
    /// Dimensions in centimeters.
    pub height: f64,
    pub width: f64,
    pub length: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

/// Fields for creating a package; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub user_id: UserId,
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub weight: f64,
}
