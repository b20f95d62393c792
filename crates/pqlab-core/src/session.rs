//! Interactive "try it" sessions
//!
//! A session holds the material produced so far (keys, ciphertext,
//! signatures) for one parameter set and keeps a timestamped log. Steps
//! whose inputs are missing do not fail; they log what is needed instead.
//! Backend errors are logged the same way. Changing the parameter set
//! discards everything.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use pqlab_crypto::{cipher, kem, sign, Algorithm, KeyPair, MlKemLevel, SecretBytes, SignatureScheme};
use serde::Serialize;

use crate::codec::{parse_bytes, to_hex};

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

#[derive(Debug, Default)]
struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "session");
        self.entries.push(LogEntry {
            at: Local::now(),
            message,
        });
    }

    fn reset(&mut self, first: String) {
        self.entries.clear();
        self.push(first);
    }
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "VALID"
    } else {
        "INVALID"
    }
}

/// ML-KEM walk-through: keygen, encapsulate, decapsulate, then use the
/// shared secret for the AES-GCM demo
#[derive(Debug)]
pub struct KemSession {
    level: MlKemLevel,
    key_pair: Option<KeyPair>,
    cipher_text: Option<Vec<u8>>,
    shared_secret: Option<SecretBytes>,
    decapsulated: Option<SecretBytes>,
    log: SessionLog,
}

impl KemSession {
    pub fn new(level: MlKemLevel) -> Self {
        let mut session = Self {
            level,
            key_pair: None,
            cipher_text: None,
            shared_secret: None,
            decapsulated: None,
            log: SessionLog::default(),
        };
        session.log.reset(format!("Security level set to {}", session.key()));
        session
    }

    fn key(&self) -> String {
        Algorithm::MlKem(self.level).key()
    }

    pub fn level(&self) -> MlKemLevel {
        self.level
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    pub fn cipher_text(&self) -> Option<&[u8]> {
        self.cipher_text.as_deref()
    }

    pub fn shared_secret(&self) -> Option<&SecretBytes> {
        self.shared_secret.as_ref()
    }

    pub fn decapsulated_secret(&self) -> Option<&SecretBytes> {
        self.decapsulated.as_ref()
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log.entries
    }

    /// Switch parameter set, dropping all material and the log
    pub fn set_level(&mut self, level: MlKemLevel) {
        self.level = level;
        self.key_pair = None;
        self.cipher_text = None;
        self.shared_secret = None;
        self.decapsulated = None;
        self.log.reset(format!("Security level changed to {}", self.key()));
    }

    pub fn generate_key_pair(&mut self) {
        let keys = kem::keygen(self.level);
        self.log.push(format!("Generated {} key pair", self.key()));
        self.log.push(format!("Public key length: {} bytes", keys.public_key.len()));
        self.log.push(format!("Secret key length: {} bytes", keys.secret_key.len()));
        self.key_pair = Some(keys);
        self.cipher_text = None;
        self.shared_secret = None;
        self.decapsulated = None;
    }

    pub fn encapsulate(&mut self) {
        let Some(keys) = &self.key_pair else {
            self.log.push("No key pair available. Generate keys first.");
            return;
        };

        match kem::encapsulate(self.level, &keys.public_key) {
            Ok(encapsulated) => {
                self.log.push("Encapsulation successful");
                self.log.push(format!(
                    "Ciphertext length: {} bytes",
                    encapsulated.cipher_text.len()
                ));
                self.log.push(format!(
                    "Shared secret length: {} bytes",
                    encapsulated.shared_secret.len()
                ));
                self.cipher_text = Some(encapsulated.cipher_text);
                self.shared_secret = Some(encapsulated.shared_secret);
                self.decapsulated = None;
            }
            Err(e) => self.log.push(format!("Encapsulation error: {}", e)),
        }
    }

    pub fn decapsulate(&mut self) {
        let (Some(keys), Some(cipher_text)) = (&self.key_pair, &self.cipher_text) else {
            self.log
                .push("Missing key pair or ciphertext. Generate keys and encapsulate first.");
            return;
        };

        match kem::decapsulate(self.level, cipher_text, keys.secret_key.as_bytes()) {
            Ok(recovered) => {
                self.log.push("Decapsulation successful");
                self.log.push(format!(
                    "Decapsulated secret length: {} bytes",
                    recovered.len()
                ));
                if let Some(original) = &self.shared_secret {
                    let matched = *original == recovered;
                    self.log.push(format!(
                        "Matches original shared secret: {}",
                        if matched { "YES" } else { "NO" }
                    ));
                }
                self.decapsulated = Some(recovered);
            }
            Err(e) => self.log.push(format!("Decapsulation error: {}", e)),
        }
    }

    /// Encrypt with the encapsulating side's secret. Returns the ciphertext as hex.
    pub fn encrypt_message(&mut self, plaintext: &str) -> Option<String> {
        let secret = match &self.shared_secret {
            Some(secret) if !plaintext.is_empty() => secret,
            _ => {
                self.log.push("Need shared secret and plaintext to encrypt");
                return None;
            }
        };

        self.log.push("Using first 16 bytes of shared secret as AES key");
        match cipher::encrypt(secret.as_bytes(), plaintext.as_bytes()) {
            Ok(encrypted) => {
                self.log.push("AES encryption successful");
                self.log.push(format!(
                    "Encrypted message length: {} bytes",
                    encrypted.len()
                ));
                Some(to_hex(&encrypted))
            }
            Err(e) => {
                self.log.push(format!("AES encryption error: {}", e));
                None
            }
        }
    }

    /// Decrypt hex or array input with the key owner's decapsulated secret,
    /// or the encapsulated one if decapsulation has not run yet
    pub fn decrypt_message(&mut self, input: &str) -> Option<String> {
        let secret = match self.decapsulated.as_ref().or(self.shared_secret.as_ref()) {
            Some(secret) if !input.trim().is_empty() => secret.clone(),
            _ => {
                self.log
                    .push("Need shared secret and encrypted message to decrypt");
                return None;
            }
        };

        let ciphertext = match parse_bytes(input) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.log.push(format!("AES decryption error: {}", e));
                return None;
            }
        };

        match cipher::decrypt(secret.as_bytes(), &ciphertext) {
            Ok(plaintext) => {
                self.log.push("AES decryption successful");
                Some(String::from_utf8_lossy(&plaintext).into_owned())
            }
            Err(e) => {
                self.log.push(format!("AES decryption failed: {}", e));
                None
            }
        }
    }
}

/// Signature walk-through for ML-DSA and SLH-DSA: keygen, sign and verify a
/// message or a file
#[derive(Debug)]
pub struct SignatureSession {
    scheme: SignatureScheme,
    key_pair: Option<KeyPair>,
    message: String,
    signature: Option<Vec<u8>>,
    verify_result: Option<bool>,
    file: Option<PathBuf>,
    file_signature: Option<Vec<u8>>,
    file_verify_result: Option<bool>,
    log: SessionLog,
}

impl SignatureSession {
    pub fn new(scheme: SignatureScheme) -> Self {
        let mut session = Self {
            scheme,
            key_pair: None,
            message: String::new(),
            signature: None,
            verify_result: None,
            file: None,
            file_signature: None,
            file_verify_result: None,
            log: SessionLog::default(),
        };
        session.log.reset(format!("Algorithm set to {}", session.key()));
        session.note_if_slow();
        session
    }

    fn key(&self) -> String {
        Algorithm::from(self.scheme).key()
    }

    fn note_if_slow(&mut self) {
        if Algorithm::from(self.scheme).is_slow() {
            self.log.push(
                "Note: SLH-DSA operations can take several seconds, especially at higher security levels",
            );
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn verify_result(&self) -> Option<bool> {
        self.verify_result
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn file_signature(&self) -> Option<&[u8]> {
        self.file_signature.as_deref()
    }

    pub fn file_verify_result(&self) -> Option<bool> {
        self.file_verify_result
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log.entries
    }

    /// Switch parameter set, dropping all material and the log
    pub fn set_scheme(&mut self, scheme: SignatureScheme) {
        self.scheme = scheme;
        self.key_pair = None;
        self.message.clear();
        self.signature = None;
        self.verify_result = None;
        self.file = None;
        self.file_signature = None;
        self.file_verify_result = None;
        self.log.reset(format!("Algorithm changed to {}", self.key()));
        self.note_if_slow();
    }

    pub fn generate_key_pair(&mut self) {
        let keys = sign::keygen(self.scheme);
        self.log.push(format!("Generated {} key pair", self.key()));
        self.log.push(format!("Public key length: {} bytes", keys.public_key.len()));
        self.log.push(format!("Secret key length: {} bytes", keys.secret_key.len()));
        self.key_pair = Some(keys);
        self.signature = None;
        self.verify_result = None;
        self.file_signature = None;
        self.file_verify_result = None;
    }

    /// Replace the message. An existing signature is kept so a changed
    /// message can be checked against it.
    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
        self.verify_result = None;
    }

    pub fn sign_message(&mut self) {
        let Some(keys) = &self.key_pair else {
            self.log.push("Need key pair and message to sign");
            return;
        };
        if self.message.is_empty() {
            self.log.push("Need key pair and message to sign");
            return;
        }

        match sign::sign(self.scheme, keys.secret_key.as_bytes(), self.message.as_bytes()) {
            Ok(signature) => {
                self.log.push("Message signed successfully");
                self.log.push(format!("Signature length: {} bytes", signature.len()));
                self.signature = Some(signature);
                self.verify_result = None;
            }
            Err(e) => self.log.push(format!("Signing error: {}", e)),
        }
    }

    pub fn verify_message(&mut self) {
        let (Some(keys), Some(signature)) = (&self.key_pair, &self.signature) else {
            self.log.push("Need key pair, message, and signature to verify");
            return;
        };
        if self.message.is_empty() {
            self.log.push("Need key pair, message, and signature to verify");
            return;
        }

        match sign::verify(self.scheme, &keys.public_key, self.message.as_bytes(), signature) {
            Ok(valid) => {
                self.log.push(format!(
                    "Signature verification result: {}",
                    verdict(valid)
                ));
                self.verify_result = Some(valid);
            }
            Err(e) => {
                self.log.push(format!("Verification error: {}", e));
                self.verify_result = Some(false);
            }
        }
    }

    pub fn select_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.log
                    .push(format!("File selected: {} ({} bytes)", name, meta.len()));
                self.file = Some(path.to_path_buf());
                self.file_signature = None;
                self.file_verify_result = None;
            }
            Ok(_) => self
                .log
                .push(format!("File error: {} is not a regular file", path.display())),
            Err(e) => self.log.push(format!("File error: {}", e)),
        }
    }

    pub fn sign_file(&mut self) {
        let (Some(keys), Some(path)) = (&self.key_pair, &self.file) else {
            self.log.push("Need key pair and file to sign");
            return;
        };

        let signed = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                sign::sign(self.scheme, keys.secret_key.as_bytes(), &data).map_err(|e| e.to_string())
            });
        match signed {
            Ok(signature) => {
                self.log.push("File signed successfully");
                self.log
                    .push(format!("File signature length: {} bytes", signature.len()));
                self.file_signature = Some(signature);
                self.file_verify_result = None;
            }
            Err(e) => self.log.push(format!("File signing error: {}", e)),
        }
    }

    pub fn verify_file(&mut self) {
        let (Some(keys), Some(path), Some(signature)) =
            (&self.key_pair, &self.file, &self.file_signature)
        else {
            self.log.push("Need key pair, file, and signature to verify");
            return;
        };

        let verified = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                sign::verify(self.scheme, &keys.public_key, &data, signature).map_err(|e| e.to_string())
            });
        match verified {
            Ok(valid) => {
                self.log.push(format!(
                    "File signature verification result: {}",
                    verdict(valid)
                ));
                self.file_verify_result = Some(valid);
            }
            Err(e) => {
                self.log.push(format!("File verification error: {}", e));
                self.file_verify_result = Some(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqlab_crypto::MlDsaLevel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn last(log: &[LogEntry]) -> &str {
        &log.last().expect("log is never empty").message
    }

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(contents).unwrap();
        tmp
    }

    #[test]
    fn test_kem_preconditions() {
        let mut session = KemSession::new(MlKemLevel::MlKem512);
        session.encapsulate();
        assert_eq!(last(session.log()), "No key pair available. Generate keys first.");
        session.decapsulate();
        assert_eq!(
            last(session.log()),
            "Missing key pair or ciphertext. Generate keys and encapsulate first."
        );
        assert!(session.encrypt_message("hi").is_none());
        assert_eq!(last(session.log()), "Need shared secret and plaintext to encrypt");
    }

    #[test]
    fn test_kem_walkthrough() {
        let mut session = KemSession::new(MlKemLevel::MlKem768);
        session.generate_key_pair();
        session.encapsulate();
        session.decapsulate();
        assert_eq!(last(session.log()), "Matches original shared secret: YES");
        assert_eq!(session.shared_secret(), session.decapsulated_secret());

        let hex = session.encrypt_message("attack at dawn").unwrap();
        assert_eq!(session.decrypt_message(&hex).as_deref(), Some("attack at dawn"));
        assert_eq!(last(session.log()), "AES decryption successful");
    }

    #[test]
    fn test_kem_decrypt_tampered() {
        let mut session = KemSession::new(MlKemLevel::MlKem512);
        session.generate_key_pair();
        session.encapsulate();
        let mut hex = session.encrypt_message("hello").unwrap();
        hex.replace_range(0..2, if hex.starts_with("00") { "ff" } else { "00" });

        assert!(session.decrypt_message(&hex).is_none());
        assert!(last(session.log()).starts_with("AES decryption failed"));

        assert!(session.decrypt_message("zz").is_none());
        assert!(last(session.log()).starts_with("AES decryption error"));
    }

    #[test]
    fn test_kem_level_change_resets() {
        let mut session = KemSession::new(MlKemLevel::MlKem512);
        session.generate_key_pair();
        session.set_level(MlKemLevel::MlKem1024);
        assert!(session.key_pair().is_none());
        assert_eq!(session.log().len(), 1);
        assert_eq!(last(session.log()), "Security level changed to ml_kem1024");
    }

    #[test]
    fn test_signature_preconditions() {
        let mut session = SignatureSession::new(SignatureScheme::MlDsa(MlDsaLevel::MlDsa44));
        session.sign_message();
        assert_eq!(last(session.log()), "Need key pair and message to sign");
        session.generate_key_pair();
        session.sign_message();
        assert_eq!(last(session.log()), "Need key pair and message to sign");
        session.verify_message();
        assert_eq!(last(session.log()), "Need key pair, message, and signature to verify");
        session.sign_file();
        assert_eq!(last(session.log()), "Need key pair and file to sign");
    }

    #[test]
    fn test_sign_then_tamper_message() {
        let mut session = SignatureSession::new(SignatureScheme::MlDsa(MlDsaLevel::MlDsa65));
        session.generate_key_pair();
        session.set_message("pay alice 10");
        session.sign_message();
        session.verify_message();
        assert_eq!(session.verify_result(), Some(true));

        session.set_message("pay alice 1000");
        assert_eq!(session.verify_result(), None);
        session.verify_message();
        assert_eq!(session.verify_result(), Some(false));
        assert_eq!(last(session.log()), "Signature verification result: INVALID");
    }

    #[test]
    fn test_file_signing() {
        let tmp = temp_file(b"file contents");
        let path = tmp.path();
        let mut session = SignatureSession::new(SignatureScheme::MlDsa(MlDsaLevel::MlDsa44));
        session.generate_key_pair();
        session.select_file(path);
        assert!(last(session.log()).ends_with("(13 bytes)"));
        session.sign_file();
        session.verify_file();
        assert_eq!(session.file_verify_result(), Some(true));

        std::fs::write(path, b"changed contents").unwrap();
        session.verify_file();
        assert_eq!(session.file_verify_result(), Some(false));
    }

    #[test]
    fn test_missing_file() {
        let mut session = SignatureSession::new(SignatureScheme::MlDsa(MlDsaLevel::MlDsa44));
        let dir = tempfile::tempdir().unwrap();
        session.select_file(dir.path().join("absent.bin"));
        assert!(last(session.log()).starts_with("File error"));
        assert!(session.file().is_none());
    }

    #[test]
    fn test_scheme_change_resets() {
        let mut session = SignatureSession::new(SignatureScheme::MlDsa(MlDsaLevel::MlDsa44));
        session.generate_key_pair();
        session.set_message("x");
        session.set_scheme(SignatureScheme::MlDsa(MlDsaLevel::MlDsa87));
        assert!(session.key_pair().is_none());
        assert_eq!(session.message(), "");
        assert_eq!(last(session.log()), "Algorithm changed to ml_dsa87");
    }
}
