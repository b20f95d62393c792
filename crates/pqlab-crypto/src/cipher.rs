//! AES-GCM demo cipher keyed from a KEM shared secret
//!
//! Shows what a shared secret is for once both sides hold it. The first 16
//! bytes become an AES-128 key and the next 16 bytes the GCM IV. Reusing
//! the IV across messages under one secret breaks GCM, so this is a
//! one-message toy, not a transport.

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    aes::Aes128,
    AesGcm, Nonce,
};
use thiserror::Error;
use zeroize::Zeroizing;

/// AES-128 key taken from the front of the shared secret
pub const KEY_SIZE: usize = 16;
/// 128-bit IV taken from the following bytes
pub const NONCE_SIZE: usize = 16;
/// GCM authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;

type Aes128Gcm16 = AesGcm<Aes128, U16>;

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed - invalid ciphertext or wrong key")]
    DecryptionFailed,

    #[error("Shared secret too short: need 32 bytes, got {0}")]
    SharedSecretTooShort(usize),
}

fn cipher_and_nonce(shared_secret: &[u8]) -> Result<(Aes128Gcm16, &[u8]), CipherError> {
    if shared_secret.len() < KEY_SIZE + NONCE_SIZE {
        return Err(CipherError::SharedSecretTooShort(shared_secret.len()));
    }
    let (key, rest) = shared_secret.split_at(KEY_SIZE);
    let cipher = Aes128Gcm16::new_from_slice(key)
        .map_err(|_| CipherError::SharedSecretTooShort(shared_secret.len()))?;
    Ok((cipher, &rest[..NONCE_SIZE]))
}

/// Encrypt plaintext under a key and IV drawn from `shared_secret`
///
/// Returns: ciphertext || tag
pub fn encrypt(shared_secret: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let (cipher, nonce_bytes) = cipher_and_nonce(shared_secret)?;
    let nonce = Nonce::<U16>::from_slice(nonce_bytes);

    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CipherError::EncryptionFailed)
}

/// Decrypt ciphertext produced by encrypt() with the same shared secret
pub fn decrypt(shared_secret: &[u8], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let (cipher, nonce_bytes) = cipher_and_nonce(shared_secret)?;
    if ciphertext.len() < TAG_SIZE {
        return Err(CipherError::DecryptionFailed);
    }
    let nonce = Nonce::<U16>::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CipherError::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(fill: u8) -> [u8; 32] {
        let mut s = [0u8; 32];
        for (i, b) in s.iter_mut().enumerate() {
            *b = fill.wrapping_add(i as u8);
        }
        s
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let ss = secret(7);
        let plaintext = b"Hello from the other side of ML-KEM";

        let ciphertext = encrypt(&ss, plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);

        let decrypted = decrypt(&ss, &ciphertext).unwrap();
        assert_eq!(decrypted.as_slice(), plaintext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let ss = secret(1);
        let mut ciphertext = encrypt(&ss, b"secret data").unwrap();

        if let Some(byte) = ciphertext.first_mut() {
            *byte ^= 0xFF;
        }

        assert!(matches!(decrypt(&ss, &ciphertext), Err(CipherError::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let ciphertext = encrypt(&secret(1), b"secret data").unwrap();
        assert!(decrypt(&secret(2), &ciphertext).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(matches!(
            encrypt(&[0u8; 16], b"x"),
            Err(CipherError::SharedSecretTooShort(16))
        ));
    }
}
