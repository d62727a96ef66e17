use thiserror::Error;

/// Error type for token issuance and verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token lifetime must be positive, got {0} seconds")]
    InvalidLifetime(i64),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token was signed with an unknown key: {}", .0.as_deref().unwrap_or("<none>"))]
    UnknownKey(Option<String>),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token was issued by an unexpected issuer")]
    InvalidIssuer,
}

/// Error type for loading and checking signing key material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Failed to read key file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Malformed private key: {0}")]
    MalformedPrivateKey(String),

    #[error("Malformed public key: {0}")]
    MalformedPublicKey(String),

    #[error("Public key does not correspond to private key")]
    Mismatch,

    #[error("Key identifier must not be empty")]
    EmptyKeyId,

    #[error("Key set contains no RS256 signing key")]
    NoSigningKey,
}
