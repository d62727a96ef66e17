pub mod claims;
pub mod errors;
pub mod issuer;
pub mod jwks;
pub mod keys;
pub mod verifier;

pub use claims::Claims;
pub use errors::KeyError;
pub use errors::TokenError;
pub use issuer::SignedToken;
pub use issuer::TokenIssuer;
pub use issuer::DEFAULT_TOKEN_LIFETIME_SECONDS;
pub use jwks::Jwk;
pub use jwks::JwkSet;
pub use keys::KeyPair;
pub use verifier::TokenVerifier;
pub use verifier::VerifiedIdentity;
