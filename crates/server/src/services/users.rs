//! Cache-aside access to user records.
//!
//! Reads go through the cache: a hit returns the deserialized snapshot
//! without touching the record store; a miss falls back to the store and
//! populates the cache on the way out. Creates write through: the freshly
//! inserted record is cached unconditionally under its username key.
//!
//! There is no invalidation path because no update or delete mutation of
//! users exists; if one is added, it must be paired with an
//! invalidation-on-mutation rule.

use std::sync::Arc;

use parcelhub_core::Username;

use crate::cache::CacheBackend;
use crate::db::{RecordStore, RepositoryError};
use crate::models::{NewUser, User};

/// Cache key for a user snapshot.
fn cache_key(username: &Username) -> String {
    format!("user:{username}")
}

/// Read-through / write-through accessor for user records.
#[derive(Clone)]
pub struct CachedUsers {
    store: Arc<dyn RecordStore>,
    cache: CacheBackend,
}

impl CachedUsers {
    /// Create an accessor over the given store and cache.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, cache: CacheBackend) -> Self {
        Self { store, cache }
    }

    /// Fetch a user, preferring the cache.
    ///
    /// A snapshot that fails to deserialize is treated as a miss and the
    /// store is consulted instead.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the user does not exist,
    /// or the store's error if the fallback read fails.
    pub async fn get(&self, username: &Username) -> Result<User, RepositoryError> {
        let key = cache_key(username);

        if let Some(bytes) = self.cache.get(&key).await {
            match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => {
                    tracing::debug!(username = %username, "user served from cache");
                    return Ok(user);
                }
                Err(e) => {
                    tracing::warn!(username = %username, error = %e, "corrupt cache entry, treating as miss");
                }
            }
        }

        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        self.store_snapshot(&key, &user).await;
        Ok(user)
    }

    /// Create a user and write the new record through to the cache.
    ///
    /// # Errors
    ///
    /// Propagates the store's error; on [`RepositoryError::Conflict`] no
    /// record exists and nothing is cached.
    pub async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let user = self.store.insert_user(user).await?;
        self.store_snapshot(&cache_key(&user.username), &user).await;
        Ok(user)
    }

    async fn store_snapshot(&self, key: &str, user: &User) {
        match serde_json::to_vec(user) {
            Ok(bytes) => self.cache.set(key, bytes).await,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to serialize user snapshot");
            }
        }
    }
}
