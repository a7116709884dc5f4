//! JWT issue and verification

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use trellis_domain::error::{Error, Result};

use crate::config::JwtConfig;
use crate::di::Named;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Issued at (seconds since epoch)
    pub iat: u64,
    /// Expiration (seconds since epoch)
    pub exp: u64,
}

/// Issues and verifies HS256 tokens
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtService {
    /// Create a service from the JWT configuration
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime: Duration::from_secs(config.expiration_days.saturating_mul(SECONDS_PER_DAY)),
        }
    }

    /// Override the token lifetime
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sign a token for `user_id`
    pub fn sign(&self, user_id: &str) -> Result<String> {
        let iat = now_secs()?;
        let claims = Claims {
            user_id: Some(user_id.to_string()),
            iat,
            exp: iat.saturating_add(self.lifetime.as_secs()),
        };
        self.sign_claims(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign_claims(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| Error::internal(format!("Failed to sign token: {e}")))
    }

    /// Verify signature and expiry and return the claims
    ///
    /// Every failure is an authorization error.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::authorization("Token has expired."),
                _ => Error::authorization(format!("Token is invalid. {e}")),
            })
    }
}

impl Named for JwtService {
    const NAME: &'static str = "JwtService";
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| Error::internal(format!("System clock is before the epoch: {e}")))
}
