use std::sync::Arc;

use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::KeyError;
use super::errors::TokenError;
use super::jwks::JwkSet;
use super::keys::KeyPair;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::role::Role;

/// Identity extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject: String,
    pub role: Role,
    pub expires_at: i64,
}

/// Consumer-side token verification.
///
/// Needs only the published public key: construct it with
/// [`TokenVerifier::from_jwks`] from the authority's JWKS document and no
/// call back to the authority is made per verification. The algorithm is
/// pinned to RS256; the `alg` header of a presented token is never trusted.
///
/// Checks run in order: key identifier, signature, issuer, claim shape,
/// expiry. Verification never extends a token's lifetime.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    key_id: String,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    /// Create a verifier for a single key.
    ///
    /// # Arguments
    /// * `decoding_key` - RSA public key
    /// * `key_id` - Identifier tokens must carry in their header
    /// * `issuer` - Expected `iss` claim
    pub fn new(
        decoding_key: DecodingKey,
        key_id: impl Into<String>,
        issuer: impl ToString,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        // Expiry is checked against our own clock after decoding.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[issuer]);

        Self {
            decoding_key,
            key_id: key_id.into(),
            validation,
            clock: Arc::new(SystemClock::new()),
        }
    }

    /// Create a verifier from the authority's own key pair.
    pub fn for_key_pair(keys: &KeyPair, issuer: impl ToString) -> Self {
        Self::new(keys.decoding_key().clone(), keys.key_id(), issuer)
    }

    /// Create a verifier purely from a published key set.
    ///
    /// # Errors
    /// * `NoSigningKey` - Set has no RS256 signing key
    /// * `MalformedPublicKey` - Key components cannot be decoded
    pub fn from_jwks(jwks: &JwkSet, issuer: impl ToString) -> Result<Self, KeyError> {
        let jwk = jwks.signing_key()?;
        Ok(Self::new(jwk.decoding_key()?, jwk.kid.clone(), issuer))
    }

    /// Replace the timestamp source used for expiry checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `UnknownKey` - Header kid missing or not the published key
    /// * `InvalidSignature` - Signature does not verify under RS256
    /// * `InvalidIssuer` - `iss` is not the expected issuer
    /// * `MalformedToken` - Token or its claims are malformed
    /// * `TokenExpired` - Current time is at or past `exp`
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify a token as of the given Unix timestamp.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedIdentity, TokenError> {
        let header =
            decode_header(token).map_err(|e| TokenError::MalformedToken(e.to_string()))?;

        match header.kid {
            Some(ref kid) if *kid == self.key_id => {}
            other => return Err(TokenError::UnknownKey(other)),
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
                ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::MalformedToken(e.to_string()),
            })?;

        if claims.exp <= claims.iat {
            return Err(TokenError::MalformedToken(
                "expiry is not after issuance".to_string(),
            ));
        }

        if claims.is_expired(now) {
            return Err(TokenError::TokenExpired);
        }

        Ok(VerifiedIdentity {
            subject: claims.sub,
            role: claims.role,
            expires_at: claims.exp,
        })
    }
}
