use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use serde::Serialize;

use super::errors::KeyError;

/// Algorithm name published for every signing key.
pub const RS256: &str = "RS256";

/// Published set of verification keys (RFC 7517 `JWK Set`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Public RSA key in JWK form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub kid: String,
    pub alg: String,
    /// Modulus, base64url without padding
    pub n: String,
    /// Public exponent, base64url without padding
    pub e: String,
}

impl Jwk {
    /// Describe an RS256 signing key.
    pub fn rsa_signing(kid: impl Into<String>, n: String, e: String) -> Self {
        Self {
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            kid: kid.into(),
            alg: RS256.to_string(),
            n,
            e,
        }
    }

    /// Rebuild a verification key from the published components.
    ///
    /// # Errors
    /// * `MalformedPublicKey` - Modulus or exponent is not valid base64url
    pub fn decoding_key(&self) -> Result<DecodingKey, KeyError> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
            .map_err(|e| KeyError::MalformedPublicKey(e.to_string()))
    }

    fn is_rs256_signing_key(&self) -> bool {
        self.kty == "RSA" && self.alg == RS256 && self.key_use == "sig"
    }
}

impl JwkSet {
    /// Find the RS256 signing key with the given identifier.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys
            .iter()
            .find(|key| key.kid == kid && key.is_rs256_signing_key())
    }

    /// First RS256 signing key in the set.
    ///
    /// # Errors
    /// * `NoSigningKey` - Set has no usable key
    pub fn signing_key(&self) -> Result<&Jwk, KeyError> {
        self.keys
            .iter()
            .find(|key| key.is_rs256_signing_key())
            .ok_or(KeyError::NoSigningKey)
    }
}
