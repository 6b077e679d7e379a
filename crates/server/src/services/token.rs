//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the subject username and an absolute
//! expiry in seconds since the epoch. The signing secret and algorithm are
//! process-wide configuration, fixed at startup.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parcelhub_core::Username;

/// Fallback lifetime when a caller does not specify one.
///
/// Production callers always pass the configured 30-minute policy value, so
/// this default is only reachable through direct service use; the tests pin
/// both paths so the mismatch stays visible.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Errors that can occur during token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token failed verification.
    ///
    /// Signature, decoding, and expiry failures all collapse here; callers
    /// get no distinction.
    #[error("invalid token")]
    Invalid,

    /// Signing a new token failed.
    #[error("token signing failed")]
    Signing,
}

/// JWT claims for an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,
    /// Absolute expiry, seconds since the epoch.
    pub exp: i64,
}

/// Service for issuing and verifying access tokens.
///
/// Thread-safe (`Send + Sync`) and shareable across async tasks.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the shared secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a signed token for `subject`.
    ///
    /// `None` falls back to [`DEFAULT_TOKEN_TTL`].
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, subject: &Username, ttl: Option<Duration>) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::Signing)?;

        let claims = Claims {
            sub: subject.as_str().to_owned(),
            exp: Utc::now().timestamp() + ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for any signature, decoding, or
    /// expiry failure.
    pub fn verify(&self, token: &str) -> Result<Username, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| TokenError::Invalid)?;

        Username::parse(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kT9#mW2x!qRv8zLp4Y@cJd7N$fGh3Sb6")
    }

    fn service() -> TokenService {
        TokenService::new(&secret())
    }

    fn subject() -> Username {
        Username::parse("alice").unwrap()
    }

    /// Decode claims without expiry checks, for asserting on `exp`.
    fn decode_claims(service: &TokenService, token: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<Claims>(token, &service.decoding, &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let service = service();
        let token = service.issue(&subject(), Some(Duration::from_secs(60))).unwrap();

        let verified = service.verify(&token).unwrap();
        assert_eq!(verified, subject());
    }

    #[test]
    fn test_default_ttl_is_fifteen_minutes() {
        let service = service();
        let before = Utc::now().timestamp();
        let token = service.issue(&subject(), None).unwrap();

        let claims = decode_claims(&service, &token);
        let expected = before + 15 * 60;
        assert!((claims.exp - expected).abs() <= 2, "exp={} expected≈{expected}", claims.exp);
    }

    #[test]
    fn test_explicit_ttl_overrides_default() {
        // The policy value every production caller passes.
        let service = service();
        let before = Utc::now().timestamp();
        let token = service
            .issue(&subject(), Some(Duration::from_secs(30 * 60)))
            .unwrap();

        let claims = decode_claims(&service, &token);
        let expected = before + 30 * 60;
        assert!((claims.exp - expected).abs() <= 2, "exp={} expected≈{expected}", claims.exp);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();

        // Encode an already-expired claim with the same secret.
        let claims = Claims {
            sub: "alice".to_owned(),
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = service();
        let verifier = TokenService::new(&SecretString::from("another-secret-another-secret!!!"));

        let token = issuer.issue(&subject(), Some(Duration::from_secs(60))).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = service();
        assert!(matches!(service.verify(""), Err(TokenError::Invalid)));
        assert!(matches!(
            service.verify("not.a.jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_non_username_subject_rejected() {
        let service = service();
        let claims = Claims {
            sub: "has spaces!".to_owned(),
            exp: Utc::now().timestamp() + 600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }
}
