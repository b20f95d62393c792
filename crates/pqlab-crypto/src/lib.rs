//! pqlab Crypto - typed access to the NIST post-quantum standards
//!
//! This crate provides:
//! - ML-KEM (FIPS 203) key encapsulation
//! - ML-DSA (FIPS 204) lattice signatures
//! - SLH-DSA (FIPS 205) stateless hash-based signatures
//! - An AES-GCM demo cipher keyed from a KEM shared secret
//!
//! Every primitive is delegated to the `pqcrypto` crates. This layer only
//! picks the parameter set and moves bytes in and out.

pub mod algorithm;
pub mod cipher;
pub mod kem;
pub mod secret;
pub mod sign;

pub use algorithm::{Algorithm, Family, KeySizes, MlDsaLevel, MlKemLevel, SlhDsaParams};
pub use cipher::CipherError;
pub use kem::Encapsulated;
pub use secret::SecretBytes;
pub use sign::SignatureScheme;

/// A freshly generated key pair. The secret half is zeroized on drop.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key: Vec<u8>,
    pub secret_key: SecretBytes,
}

/// Errors that can occur when calling into the post-quantum backends
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Algorithm {0} not found")]
    UnknownAlgorithm(String),

    #[error("{algorithm} is not a {expected} algorithm")]
    WrongFamily {
        algorithm: String,
        expected: &'static str,
    },

    #[error("Invalid public key: expected {expected} bytes, got {actual}")]
    InvalidPublicKey { expected: usize, actual: usize },

    #[error("Invalid secret key: expected {expected} bytes, got {actual}")]
    InvalidSecretKey { expected: usize, actual: usize },

    #[error("Invalid ciphertext: expected {expected} bytes, got {actual}")]
    InvalidCiphertext { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, CryptoError>;
