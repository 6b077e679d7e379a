//! Domain types.
//!
//! These types represent validated domain objects separate from database row
//! types and from the request/response shapes defined next to the handlers.

pub mod order;
pub mod package;
pub mod user;

pub use order::{NewOrder, Order};
pub use package::{NewPackage, Package};
pub use user::{NewUser, User, UserResponse};
