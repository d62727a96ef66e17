use serde::Deserialize;
use serde::Serialize;

/// Path of the published key set, relative to the issuer.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Path of the discovery document, relative to the issuer.
pub const OPENID_CONFIGURATION_PATH: &str = "/.well-known/openid-configuration";

/// Path that accepts credentials and returns a token.
pub const TOKEN_PATH: &str = "/api/auth/login";

/// Path that reports the identity carried by a presented token.
pub const USERINFO_PATH: &str = "/api/auth/status";

/// OpenID provider metadata describing how to verify issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    pub issuer: String,
    pub jwks_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub subject_types_supported: Vec<String>,
    pub id_token_signing_alg_values_supported: Vec<String>,
}

impl OpenIdConfiguration {
    /// Describe an issuer whose single signing algorithm is `algorithm`.
    ///
    /// # Arguments
    /// * `issuer` - Externally visible base URL, without trailing slash
    /// * `algorithm` - Signing algorithm of the published key
    pub fn for_issuer(issuer: &str, algorithm: &str) -> Self {
        Self {
            issuer: issuer.to_string(),
            jwks_uri: format!("{}{}", issuer, JWKS_PATH),
            authorization_endpoint: format!("{}{}", issuer, TOKEN_PATH),
            token_endpoint: format!("{}{}", issuer, TOKEN_PATH),
            userinfo_endpoint: format!("{}{}", issuer, USERINFO_PATH),
            response_types_supported: vec!["token".to_string()],
            subject_types_supported: vec!["public".to_string()],
            id_token_signing_alg_values_supported: vec![algorithm.to_string()],
        }
    }
}
