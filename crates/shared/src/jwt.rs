//! Bearer token validation.
//!
//! Tokens are issued by the external identity provider. The service verifies
//! the signature, expiry and issuer, then resolves the caller's role from the
//! groups claim. Token generation exists for local development and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, Principal};
use crate::config::AuthConfig;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for verifying (and signing) tokens.
    pub secret: String,
    /// Expected issuer.
    pub issuer: String,
    /// Group that grants the admin role.
    pub admin_group: String,
    /// Lifetime of generated tokens in minutes.
    pub token_ttl_minutes: i64,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            admin_group: config.admin_group.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token was issued by someone else.
    #[error("token issuer is not trusted")]
    UntrustedIssuer,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// Turns a bearer token into an authenticated [`Principal`].
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` and resolves the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`JwtError`] when the token is expired, malformed or untrusted.
    fn verify(&self, token: &str) -> Result<Principal, JwtError>;
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("admin_group", &self.config.admin_group)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a token for `subject` in the given groups.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(&self, subject: &str, groups: &[&str]) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            username: Some(subject.to_string()),
            groups: groups.iter().map(ToString::to_string).collect(),
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.token_ttl_minutes)).timestamp(),
        };
        self.encode_claims(&claims)
    }

    /// Signs arbitrary claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::UntrustedIssuer` on an issuer mismatch and
    /// `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::UntrustedIssuer,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

impl TokenVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<Principal, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.sub.trim().is_empty() {
            return Err(JwtError::Invalid);
        }
        let role = claims.role(&self.config.admin_group);
        Ok(Principal {
            subject: claims.sub,
            username: claims.username,
            role,
        })
    }
}
