//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::CacheBackend;
use crate::config::AppConfig;
use crate::db::RecordStore;
use crate::docstore::DocumentStore;
use crate::events::EventPublisher;
use crate::services::auth::AuthService;
use crate::services::token::TokenService;
use crate::services::users::CachedUsers;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// process-scoped collaborators, all constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: Arc<dyn RecordStore>,
    documents: Arc<dyn DocumentStore>,
    users: CachedUsers,
    auth: AuthService,
    tokens: Arc<TokenService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    /// * `store` - Relational record store
    /// * `documents` - Order document store
    /// * `cache` - Cache backend for user snapshots
    /// * `events` - Domain event publisher
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        documents: Arc<dyn DocumentStore>,
        cache: CacheBackend,
        events: EventPublisher,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(&config.token_secret));
        let users = CachedUsers::new(store.clone(), cache);
        let auth = AuthService::new(
            users.clone(),
            store.clone(),
            tokens.clone(),
            events,
            config.access_token_ttl,
            config.hash_cost,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                documents,
                users,
                auth,
                tokens,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the relational record store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.inner.store
    }

    /// Get a reference to the order document store.
    #[must_use]
    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.documents
    }

    /// Get a reference to the cache-aside user accessor.
    #[must_use]
    pub fn users(&self) -> &CachedUsers {
        &self.inner.users
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
