//! Digital signatures (ML-DSA, FIPS 204 and SLH-DSA, FIPS 205)
//!
//! Detached signatures over arbitrary byte messages. Both families share one
//! surface so drivers can treat them alike.

use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};

use crate::algorithm::{KeySizes, MlDsaLevel, SlhDsaParams, SlhHash, SlhStrength, SlhVariant};
use crate::{CryptoError, KeyPair, Result, SecretBytes};

/// A signature parameter set from either family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    MlDsa(MlDsaLevel),
    SlhDsa(SlhDsaParams),
}

/// Binds `$m` to the backend module for `$scheme` and evaluates `$body`
macro_rules! with_scheme {
    ($scheme:expr, $m:ident => $body:expr) => {{
        use SlhHash::*;
        use SlhStrength::*;
        use SlhVariant::*;
        match $scheme {
            SignatureScheme::MlDsa(MlDsaLevel::MlDsa44) => {
                use pqcrypto_mldsa::mldsa44 as $m;
                $body
            }
            SignatureScheme::MlDsa(MlDsaLevel::MlDsa65) => {
                use pqcrypto_mldsa::mldsa65 as $m;
                $body
            }
            SignatureScheme::MlDsa(MlDsaLevel::MlDsa87) => {
                use pqcrypto_mldsa::mldsa87 as $m;
                $body
            }
            SignatureScheme::SlhDsa(p) => match (p.hash, p.strength, p.variant) {
                (Sha2, L128, Small) => {
                    use pqcrypto_sphincsplus::sphincssha2128ssimple as $m;
                    $body
                }
                (Sha2, L128, Fast) => {
                    use pqcrypto_sphincsplus::sphincssha2128fsimple as $m;
                    $body
                }
                (Sha2, L192, Small) => {
                    use pqcrypto_sphincsplus::sphincssha2192ssimple as $m;
                    $body
                }
                (Sha2, L192, Fast) => {
                    use pqcrypto_sphincsplus::sphincssha2192fsimple as $m;
                    $body
                }
                (Sha2, L256, Small) => {
                    use pqcrypto_sphincsplus::sphincssha2256ssimple as $m;
                    $body
                }
                (Sha2, L256, Fast) => {
                    use pqcrypto_sphincsplus::sphincssha2256fsimple as $m;
                    $body
                }
                (Shake, L128, Small) => {
                    use pqcrypto_sphincsplus::sphincsshake128ssimple as $m;
                    $body
                }
                (Shake, L128, Fast) => {
                    use pqcrypto_sphincsplus::sphincsshake128fsimple as $m;
                    $body
                }
                (Shake, L192, Small) => {
                    use pqcrypto_sphincsplus::sphincsshake192ssimple as $m;
                    $body
                }
                (Shake, L192, Fast) => {
                    use pqcrypto_sphincsplus::sphincsshake192fsimple as $m;
                    $body
                }
                (Shake, L256, Small) => {
                    use pqcrypto_sphincsplus::sphincsshake256ssimple as $m;
                    $body
                }
                (Shake, L256, Fast) => {
                    use pqcrypto_sphincsplus::sphincsshake256fsimple as $m;
                    $body
                }
            },
        }
    }};
}

pub fn sizes(scheme: SignatureScheme) -> KeySizes {
    with_scheme!(scheme, m => KeySizes {
        public_key: m::public_key_bytes(),
        secret_key: m::secret_key_bytes(),
        ciphertext: None,
        shared_secret: None,
        signature: Some(m::signature_bytes()),
    })
}

/// Generate a new signing key pair
pub fn keygen(scheme: SignatureScheme) -> KeyPair {
    with_scheme!(scheme, m => {
        let (pk, sk) = m::keypair();
        KeyPair {
            public_key: pk.as_bytes().to_vec(),
            secret_key: SecretBytes::from(sk.as_bytes()),
        }
    })
}

/// Produce a detached signature over `message`
pub fn sign(scheme: SignatureScheme, secret_key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let expected = sizes(scheme).secret_key;
    if secret_key.len() != expected {
        return Err(CryptoError::InvalidSecretKey {
            expected,
            actual: secret_key.len(),
        });
    }

    with_scheme!(scheme, m => {
        let sk = m::SecretKey::from_bytes(secret_key).map_err(|_| CryptoError::InvalidSecretKey {
            expected,
            actual: secret_key.len(),
        })?;
        Ok(m::detached_sign(message, &sk).as_bytes().to_vec())
    })
}

/// Check a detached signature.
///
/// A malformed public key is an error. A signature that is the wrong length
/// or does not verify yields `Ok(false)`.
pub fn verify(
    scheme: SignatureScheme,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<bool> {
    let expected = sizes(scheme).public_key;
    if public_key.len() != expected {
        return Err(CryptoError::InvalidPublicKey {
            expected,
            actual: public_key.len(),
        });
    }

    with_scheme!(scheme, m => {
        let pk = m::PublicKey::from_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey {
            expected,
            actual: public_key.len(),
        })?;
        let sig = match m::DetachedSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(_) => {
                tracing::debug!(len = signature.len(), "signature has wrong length");
                return Ok(false);
            }
        };
        Ok(m::verify_detached_signature(&sig, message, &pk).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = b"This is a test message for ML-DSA";

    fn slh_fast() -> SignatureScheme {
        SignatureScheme::SlhDsa(SlhDsaParams::new(SlhHash::Shake, SlhStrength::L128, SlhVariant::Fast))
    }

    #[test]
    fn test_mldsa_sign_verify() {
        for level in MlDsaLevel::ALL {
            let scheme = SignatureScheme::MlDsa(level);
            let keys = keygen(scheme);
            let sig = sign(scheme, keys.secret_key.as_bytes(), MESSAGE).unwrap();
            assert_eq!(Some(sig.len()), sizes(scheme).signature);
            assert!(verify(scheme, &keys.public_key, MESSAGE, &sig).unwrap());
        }
    }

    #[test]
    fn test_tampered_message_rejected() {
        let scheme = SignatureScheme::MlDsa(MlDsaLevel::MlDsa44);
        let keys = keygen(scheme);
        let sig = sign(scheme, keys.secret_key.as_bytes(), MESSAGE).unwrap();
        assert!(!verify(scheme, &keys.public_key, b"another message", &sig).unwrap());
    }

    #[test]
    fn test_cross_level_signature_is_invalid() {
        let s44 = SignatureScheme::MlDsa(MlDsaLevel::MlDsa44);
        let s65 = SignatureScheme::MlDsa(MlDsaLevel::MlDsa65);
        let keys44 = keygen(s44);
        let keys65 = keygen(s65);
        let sig44 = sign(s44, keys44.secret_key.as_bytes(), MESSAGE).unwrap();

        assert!(!verify(s65, &keys65.public_key, MESSAGE, &sig44).unwrap());
    }

    #[test]
    fn test_wrong_public_key_length_is_error() {
        let scheme = SignatureScheme::MlDsa(MlDsaLevel::MlDsa87);
        let err = verify(scheme, &[1, 2, 3], MESSAGE, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidPublicKey { actual: 3, .. }));
    }

    #[test]
    fn test_slhdsa_sign_verify() {
        let scheme = slh_fast();
        let keys = keygen(scheme);
        let sig = sign(scheme, keys.secret_key.as_bytes(), MESSAGE).unwrap();
        assert!(verify(scheme, &keys.public_key, MESSAGE, &sig).unwrap());
        assert!(!verify(scheme, &keys.public_key, b"tampered", &sig).unwrap());
    }

    #[test]
    fn test_slhdsa_sizes() {
        let sizes = sizes(slh_fast());
        assert_eq!(sizes.public_key, 32);
        assert_eq!(sizes.secret_key, 64);
        assert_eq!(sizes.signature, Some(17088));
    }
}
