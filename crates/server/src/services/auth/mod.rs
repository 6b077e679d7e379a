//! Authentication service.
//!
//! Owns registration and login: password hashing and verification, the
//! write-through user create, the registration event, and token issuance.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use parcelhub_core::{Email, Username};

use crate::db::{RecordStore, RepositoryError};
use crate::events::{DomainEvent, EventPublisher};
use crate::models::{NewUser, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;
use crate::services::users::CachedUsers;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration and login; issues bearer tokens.
#[derive(Clone)]
pub struct AuthService {
    users: CachedUsers,
    store: Arc<dyn RecordStore>,
    tokens: Arc<TokenService>,
    events: EventPublisher,
    /// Token lifetime policy passed on every issue call.
    token_ttl: Duration,
    /// Argon2 iteration count.
    hash_cost: u32,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        users: CachedUsers,
        store: Arc<dyn RecordStore>,
        tokens: Arc<TokenService>,
        events: EventPublisher,
        token_ttl: Duration,
        hash_cost: u32,
    ) -> Self {
        Self {
            users,
            store,
            tokens,
            events,
            token_ttl,
            hash_cost,
        }
    }

    /// Register a new user and issue their first token.
    ///
    /// Inserts the record, writes it through to the cache, publishes a
    /// `user created` event (best-effort), and signs a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername`/`InvalidEmail` on malformed
    /// input, `AuthError::WeakPassword` if the password is too short, and
    /// `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        age: Option<i32>,
    ) -> Result<(User, String), AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password, self.hash_cost)?;

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash,
                age,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        self.events
            .publish(DomainEvent::user_created(&user.username, Utc::now()))
            .await;

        let token = self.tokens.issue(&user.username, Some(self.token_ttl))?;
        Ok((user, token))
    }

    /// Login with username and password.
    ///
    /// Reads the record store directly; the credential check needs the
    /// stored hash and never rides the cache.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown,
    /// malformed, or the password does not match.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .store
            .find_user_by_username(&username)
            .await
            .map_err(AuthError::Repository)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username, Some(self.token_ttl))?;
        Ok(token)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::CacheBackend;
    use crate::db::testing::{CountingRecordStore, MemoryRecordStore};
    use crate::events::USER_CREATED_TOPIC;
    use secrecy::SecretString;
    use tokio::sync::mpsc;

    const PASSWORD: &str = "correct-horse-battery";

    struct Fixture {
        auth: AuthService,
        users: CachedUsers,
        store: Arc<CountingRecordStore>,
        tokens: Arc<TokenService>,
        events_rx: mpsc::Receiver<DomainEvent>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(CountingRecordStore::new(Arc::new(MemoryRecordStore::new())));
        let cache = CacheBackend::new_local(Duration::from_secs(3600));
        let users = CachedUsers::new(store.clone(), cache);
        let tokens = Arc::new(TokenService::new(&SecretString::from(
            "kT9#mW2x!qRv8zLp4Y@cJd7N$fGh3Sb6",
        )));
        let (events, events_rx) = EventPublisher::channel(8);

        let auth = AuthService::new(
            users.clone(),
            store.clone(),
            tokens.clone(),
            events,
            Duration::from_secs(30 * 60),
            1,
        );

        Fixture {
            auth,
            users,
            store,
            tokens,
            events_rx,
        }
    }

    #[tokio::test]
    async fn test_register_then_login_round_trip() {
        let f = fixture();
        let (user, register_token) = f
            .auth
            .register("alice", "alice@example.com", PASSWORD, Some(30))
            .await
            .unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert_eq!(f.tokens.verify(&register_token).unwrap(), user.username);

        let login_token = f.auth.login("alice", PASSWORD).await.unwrap();
        assert_eq!(f.tokens.verify(&login_token).unwrap(), user.username);
    }

    #[tokio::test]
    async fn test_register_caches_the_new_user() {
        let f = fixture();
        f.auth
            .register("alice", "alice@example.com", PASSWORD, None)
            .await
            .unwrap();

        let username = Username::parse("alice").unwrap();
        let cached = f.users.get(&username).await.unwrap();
        assert_eq!(cached.username, username);
        assert_eq!(f.store.reads(), 0, "lookup after register must hit the cache");
    }

    #[tokio::test]
    async fn test_register_publishes_user_created_event() {
        let mut f = fixture();
        f.auth
            .register("alice", "alice@example.com", PASSWORD, None)
            .await
            .unwrap();

        let event = f.events_rx.recv().await.expect("event published");
        assert_eq!(event.topic, USER_CREATED_TOPIC);
        assert_eq!(event.key, b"alice");
        assert_eq!(event.payload["username"], "alice");
        assert!(event.payload["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let f = fixture();
        f.auth
            .register("alice", "alice@example.com", PASSWORD, None)
            .await
            .unwrap();

        let result = f
            .auth
            .register("alice", "other@example.com", PASSWORD, None)
            .await;
        assert!(matches!(result, Err(AuthError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration_one_wins() {
        let f = fixture();

        let (a, b) = tokio::join!(
            f.auth
                .register("alice", "alice@example.com", PASSWORD, None),
            f.auth
                .register("alice", "alice@example.com", PASSWORD, None)
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        let conflicts = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(AuthError::UserAlreadyExists)))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejected() {
        let f = fixture();
        f.auth
            .register("alice", "alice@example.com", PASSWORD, None)
            .await
            .unwrap();

        let result = f.auth.login("alice", "wrong-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_rejected() {
        let f = fixture();
        let result = f.auth.login("ghost", PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let f = fixture();
        let result = f
            .auth
            .register("alice", "alice@example.com", "short", None)
            .await;
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_input() {
        let f = fixture();
        assert!(matches!(
            f.auth
                .register("a b", "alice@example.com", PASSWORD, None)
                .await,
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(matches!(
            f.auth.register("alice", "not-an-email", PASSWORD, None).await,
            Err(AuthError::InvalidEmail(_))
        ));
    }
}
