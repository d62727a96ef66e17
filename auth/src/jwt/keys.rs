use std::fmt;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use super::errors::KeyError;
use super::jwks::Jwk;
use super::jwks::JwkSet;

const SELF_TEST_MESSAGE: &[u8] = b"key-pair-self-test";

/// The process-wide signing key pair.
///
/// Loaded once at start-up and immutable afterwards. The private half is
/// only reachable through [`KeyPair::encoding_key`]; it is never serialized.
/// The `key_id` comes from configuration, not from the key content.
pub struct KeyPair {
    key_id: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    jwk: Jwk,
}

impl KeyPair {
    /// Load a key pair from PEM files.
    ///
    /// # Arguments
    /// * `private_key_path` - RSA private key (PKCS#8 or PKCS#1 PEM)
    /// * `public_key_path` - RSA public key (SPKI or PKCS#1 PEM)
    /// * `key_id` - Identifier embedded in issued tokens and in the JWKS
    ///
    /// # Errors
    /// * `Unreadable` - A file is missing or unreadable
    /// * `MalformedPrivateKey` / `MalformedPublicKey` - PEM could not be parsed
    /// * `Mismatch` - Public key does not correspond to private key
    /// * `EmptyKeyId` - Key identifier is empty
    pub fn load(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
        key_id: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let private_pem = read_pem(private_key_path.as_ref())?;
        let public_pem = read_pem(public_key_path.as_ref())?;

        tracing::info!(
            private_key_path = %private_key_path.as_ref().display(),
            public_key_path = %public_key_path.as_ref().display(),
            "Key material read"
        );

        Self::from_pem(&private_pem, &public_pem, key_id)
    }

    /// Build a key pair from PEM contents and run the sign/verify self-test.
    ///
    /// # Errors
    /// Same as [`KeyPair::load`], except `Unreadable`.
    pub fn from_pem(
        private_pem: &str,
        public_pem: &str,
        key_id: impl Into<String>,
    ) -> Result<Self, KeyError> {
        let key_id = key_id.into();
        if key_id.trim().is_empty() {
            return Err(KeyError::EmptyKeyId);
        }

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| KeyError::MalformedPrivateKey(e.to_string()))?;

        let public_key = RsaPublicKey::from_public_key_pem(public_pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(public_pem))
            .map_err(|e| KeyError::MalformedPublicKey(e.to_string()))?;

        let jwk = Jwk::rsa_signing(
            key_id.clone(),
            URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        );
        // Verification always goes through the published components, so the
        // self-test below also proves the JWKS matches the signing key.
        let decoding_key = jwk.decoding_key()?;

        self_test(&encoding_key, &decoding_key)?;

        Ok(Self {
            key_id,
            encoding_key,
            decoding_key,
            jwk,
        })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Private signing key, for the token issuer only.
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }

    /// Key set to publish at the JWKS endpoint.
    pub fn jwk_set(&self) -> JwkSet {
        JwkSet {
            keys: vec![self.jwk.clone()],
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_id", &self.key_id)
            .field("jwk", &self.jwk)
            .finish_non_exhaustive()
    }
}

fn read_pem(path: &Path) -> Result<String, KeyError> {
    fs::read_to_string(path).map_err(|e| KeyError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn self_test(encoding_key: &EncodingKey, decoding_key: &DecodingKey) -> Result<(), KeyError> {
    let signature = crypto::sign(SELF_TEST_MESSAGE, encoding_key, Algorithm::RS256)
        .map_err(|e| KeyError::MalformedPrivateKey(e.to_string()))?;

    match crypto::verify(&signature, SELF_TEST_MESSAGE, decoding_key, Algorithm::RS256) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(KeyError::Mismatch),
    }
}
