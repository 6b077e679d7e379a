//! User domain types.

use serde::{Deserialize, Serialize};

use parcelhub_core::{Email, UserId, Username};

/// A registered user (domain type).
///
/// This is the full record as stored in the system of record. It also
/// serializes as the cache snapshot, so the password hash travels with it;
/// [`UserResponse`] is the client-facing shape with the hash stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Argon2 password hash (PHC string).
    pub password_hash: String,
    /// Optional age.
    pub age: Option<i32>,
}

/// Fields for creating a user; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub age: Option<i32>,
}

/// Client-facing user representation. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub age: Option<i32>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            age: user.age,
        }
    }
}
