use std::sync::Arc;

use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;
use super::keys::KeyPair;
use crate::clock::Clock;
use crate::role::Role;

/// Default token lifetime: one hour.
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// A freshly signed token and its declared lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// Compact RS256 JWT
    pub access_token: String,
    /// Seconds until expiry
    pub expires_in: i64,
    /// Claims embedded in the token
    pub claims: Claims,
}

/// Builds and signs identity tokens.
///
/// Every token is RS256-signed with the process key pair and carries the
/// key identifier in its header.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    key_id: String,
    issuer: String,
    lifetime_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer bound to the process key pair.
    ///
    /// # Arguments
    /// * `keys` - Loaded key pair
    /// * `issuer` - Issuer identity written into `iss`
    /// * `lifetime_seconds` - Token lifetime
    /// * `clock` - Timestamp source (monotonic in production)
    pub fn new(
        keys: &KeyPair,
        issuer: impl Into<String>,
        lifetime_seconds: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            encoding_key: keys.encoding_key().clone(),
            key_id: keys.key_id().to_string(),
            issuer: issuer.into(),
            lifetime_seconds,
            clock,
        }
    }

    /// Issuer identity written into every token; discovery publishes the same value.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token for a verified user.
    ///
    /// # Arguments
    /// * `subject` - User identifier
    /// * `role` - Role of the user
    ///
    /// # Returns
    /// SignedToken with the compact token and its lifetime
    ///
    /// # Errors
    /// * `InvalidLifetime` - Computed lifetime is not positive; no token is emitted
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: impl ToString, role: Role) -> Result<SignedToken, TokenError> {
        if self.lifetime_seconds <= 0 {
            return Err(TokenError::InvalidLifetime(self.lifetime_seconds));
        }

        let issued_at = self.clock.now();
        let claims = Claims::for_user(
            subject,
            role,
            &self.issuer,
            issued_at,
            self.lifetime_seconds,
        )
        .ok_or(TokenError::InvalidLifetime(self.lifetime_seconds))?;

        let expires_in = claims.lifetime();
        if expires_in <= 0 {
            return Err(TokenError::InvalidLifetime(expires_in));
        }

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_id.clone());

        let access_token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(SignedToken {
            access_token,
            expires_in,
            claims,
        })
    }
}
