use auth::JwkSet;
use auth::KeyPair;

use crate::domain::discovery::models::OpenIdConfiguration;

/// Read-only publisher of verification material.
///
/// Both documents are derived once from the loaded key pair and never change
/// for the life of the process. Holds no private key material.
#[derive(Debug, Clone)]
pub struct DiscoveryService {
    jwks: JwkSet,
    configuration: OpenIdConfiguration,
}

impl DiscoveryService {
    /// Build the published documents.
    ///
    /// # Arguments
    /// * `keys` - Active signing key pair (only its public half is kept)
    /// * `issuer` - Issuer identity embedded in every token
    pub fn new(keys: &KeyPair, issuer: &str) -> Self {
        let jwks = keys.jwk_set();
        let configuration = OpenIdConfiguration::for_issuer(issuer, &keys.jwk().alg);

        Self {
            jwks,
            configuration,
        }
    }

    /// Public key set in JWKS form.
    pub fn jwks(&self) -> &JwkSet {
        &self.jwks
    }

    /// OpenID discovery document.
    pub fn openid_configuration(&self) -> &OpenIdConfiguration {
        &self.configuration
    }
}
