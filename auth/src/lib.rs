//! Credential and token primitives for the authentication authority
//!
//! Provides the building blocks shared by the authority and by every service
//! that trusts its tokens:
//! - Password hashing (Argon2id, self-describing PHC strings)
//! - Signing key pair loading with a sign/verify self-test
//! - RS256 token issuance with a key identifier in the header
//! - Token verification from a published JWKS, with no call back to the authority
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Issuing and Verifying Tokens
//! ```no_run
//! use std::sync::Arc;
//!
//! use auth::{KeyPair, Role, SystemClock, TokenIssuer, TokenVerifier};
//!
//! let keys = KeyPair::load("keys/private_key.pem", "keys/public_key.pem", "key-1").unwrap();
//! let issuer = TokenIssuer::new(&keys, "http://auth.local", 3600, Arc::new(SystemClock::new()));
//!
//! let token = issuer.issue(42, Role::User).unwrap();
//!
//! // A downstream service only needs the published key set
//! let verifier = TokenVerifier::from_jwks(&keys.jwk_set(), "http://auth.local").unwrap();
//! let identity = verifier.verify(&token.access_token).unwrap();
//! assert_eq!(identity.subject, "42");
//! ```

pub mod clock;
pub mod jwt;
pub mod password;
pub mod role;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::Jwk;
pub use jwt::JwkSet;
pub use jwt::KeyError;
pub use jwt::KeyPair;
pub use jwt::SignedToken;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use jwt::VerifiedIdentity;
pub use jwt::DEFAULT_TOKEN_LIFETIME_SECONDS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::RoleError;
