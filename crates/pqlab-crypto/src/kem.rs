//! Key Encapsulation Mechanism (ML-KEM, FIPS 203)
//!
//! Thin byte-oriented wrappers over `pqcrypto-mlkem`. Lengths are checked
//! here so a mismatched parameter set surfaces as a typed error instead of
//! an opaque backend failure.

use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};
use serde::Serialize;

use crate::algorithm::{KeySizes, MlKemLevel};
use crate::{CryptoError, KeyPair, Result, SecretBytes};

/// Result of encapsulating against a public key
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Encapsulated {
    pub cipher_text: Vec<u8>,
    pub shared_secret: SecretBytes,
}

/// Binds `$m` to the backend module for `$level` and evaluates `$body`
macro_rules! with_mlkem {
    ($level:expr, $m:ident => $body:expr) => {
        match $level {
            MlKemLevel::MlKem512 => {
                use pqcrypto_mlkem::mlkem512 as $m;
                $body
            }
            MlKemLevel::MlKem768 => {
                use pqcrypto_mlkem::mlkem768 as $m;
                $body
            }
            MlKemLevel::MlKem1024 => {
                use pqcrypto_mlkem::mlkem1024 as $m;
                $body
            }
        }
    };
}

pub fn sizes(level: MlKemLevel) -> KeySizes {
    with_mlkem!(level, m => KeySizes {
        public_key: m::public_key_bytes(),
        secret_key: m::secret_key_bytes(),
        ciphertext: Some(m::ciphertext_bytes()),
        shared_secret: Some(m::shared_secret_bytes()),
        signature: None,
    })
}

/// Generate a new ML-KEM key pair
pub fn keygen(level: MlKemLevel) -> KeyPair {
    with_mlkem!(level, m => {
        let (pk, sk) = m::keypair();
        KeyPair {
            public_key: pk.as_bytes().to_vec(),
            secret_key: SecretBytes::from(sk.as_bytes()),
        }
    })
}

/// Encapsulate a fresh shared secret to `public_key`
pub fn encapsulate(level: MlKemLevel, public_key: &[u8]) -> Result<Encapsulated> {
    let expected = sizes(level).public_key;
    if public_key.len() != expected {
        return Err(CryptoError::InvalidPublicKey {
            expected,
            actual: public_key.len(),
        });
    }

    with_mlkem!(level, m => {
        let pk = m::PublicKey::from_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey {
            expected,
            actual: public_key.len(),
        })?;
        let (ss, ct) = m::encapsulate(&pk);
        Ok(Encapsulated {
            cipher_text: ct.as_bytes().to_vec(),
            shared_secret: SecretBytes::from(ss.as_bytes()),
        })
    })
}

/// Recover the shared secret from `cipher_text` with `secret_key`
pub fn decapsulate(level: MlKemLevel, cipher_text: &[u8], secret_key: &[u8]) -> Result<SecretBytes> {
    let sizes = sizes(level);
    if secret_key.len() != sizes.secret_key {
        return Err(CryptoError::InvalidSecretKey {
            expected: sizes.secret_key,
            actual: secret_key.len(),
        });
    }
    let expected_ct = sizes.ciphertext.unwrap_or_default();
    if cipher_text.len() != expected_ct {
        return Err(CryptoError::InvalidCiphertext {
            expected: expected_ct,
            actual: cipher_text.len(),
        });
    }

    with_mlkem!(level, m => {
        let sk = m::SecretKey::from_bytes(secret_key).map_err(|_| CryptoError::InvalidSecretKey {
            expected: sizes.secret_key,
            actual: secret_key.len(),
        })?;
        let ct = m::Ciphertext::from_bytes(cipher_text).map_err(|_| CryptoError::InvalidCiphertext {
            expected: expected_ct,
            actual: cipher_text.len(),
        })?;
        let ss = m::decapsulate(&ct, &sk);
        Ok(SecretBytes::from(ss.as_bytes()))
    })
}
