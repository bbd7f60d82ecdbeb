//! Signing key and secret generation.
//!
//! Every call draws fresh randomness from the operating system; nothing is
//! cached or reused between runs.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::{
    ADAPTER_SECRET, AUTH_SECRET, JWKS, JWT_PRIVATE_KEY, RSA_BITS, SECRET_BYTES,
};
use crate::core::env::quote;
use crate::error::{KeyError, Result};

/// Public half of the signing key, as published in a JWKS.
#[derive(Debug, Serialize)]
struct Jwk {
    #[serde(rename = "use")]
    usage: &'static str,
    kty: &'static str,
    n: String,
    e: String,
}

#[derive(Debug, Serialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

impl Jwk {
    fn signing(key: &RsaPublicKey) -> Self {
        Self {
            usage: "sig",
            kty: "RSA",
            n: URL_SAFE_NO_PAD.encode(key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(key.e().to_bytes_be()),
        }
    }
}

/// Freshly generated auth material.
pub struct GeneratedSecrets {
    jwt_private_key: Zeroizing<String>,
    jwks: String,
    auth_secret: Zeroizing<String>,
    adapter_secret: Zeroizing<String>,
}

impl GeneratedSecrets {
    /// Generate an RS256 keypair and two random secrets.
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if key generation or encoding fails.
    pub fn generate() -> Result<Self> {
        let mut rng = OsRng;

        let private_key = RsaPrivateKey::new(&mut rng, RSA_BITS).map_err(KeyError::from)?;
        let jwt_private_key = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(KeyError::from)?;

        let jwks = Jwks {
            keys: vec![Jwk::signing(&private_key.to_public_key())],
        };
        let jwks = serde_json::to_string(&jwks).map_err(KeyError::from)?;

        let auth_secret = Zeroizing::new(STANDARD.encode(&random_bytes(&mut rng)[..]));
        let adapter_secret = Zeroizing::new(hex::encode(&random_bytes(&mut rng)[..]));

        debug!(bits = RSA_BITS, "generated signing key and secrets");

        Ok(Self {
            jwt_private_key,
            jwks,
            auth_secret,
            adapter_secret,
        })
    }

    /// PKCS#8 PEM private key.
    pub fn jwt_private_key(&self) -> &str {
        &self.jwt_private_key
    }

    /// `{"keys":[{"use":"sig",...}]}`.
    pub fn jwks(&self) -> &str {
        &self.jwks
    }

    /// Base64 auth secret.
    pub fn auth_secret(&self) -> &str {
        &self.auth_secret
    }

    /// Hex adapter secret.
    pub fn adapter_secret(&self) -> &str {
        &self.adapter_secret
    }

    /// Raw `(name, value)` pairs in output order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (JWT_PRIVATE_KEY, self.jwt_private_key()),
            (JWKS, self.jwks()),
            (AUTH_SECRET, self.auth_secret()),
            (ADAPTER_SECRET, self.adapter_secret()),
        ]
    }

    /// Pairs with values JSON-quoted, ready for `KEY=value` lines.
    pub fn quoted_entries(&self) -> Vec<(&'static str, Zeroizing<String>)> {
        self.entries()
            .into_iter()
            .map(|(key, value)| (key, Zeroizing::new(quote(value))))
            .collect()
    }
}

impl std::fmt::Debug for GeneratedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedSecrets")
            .field("jwks", &self.jwks)
            .finish_non_exhaustive()
    }
}

fn random_bytes(rng: &mut OsRng) -> Zeroizing<[u8; SECRET_BYTES]> {
    let mut bytes = Zeroizing::new([0u8; SECRET_BYTES]);
    rng.fill_bytes(&mut bytes[..]);
    bytes
}
