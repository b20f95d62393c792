//! Checking a signature produced elsewhere
//!
//! The public key and signature arrive as text, either as a JSON-style byte
//! array or as hex, the same forms the result views print.

use pqlab_crypto::{sign, Algorithm, SignatureScheme};
use serde::Serialize;

use crate::codec::parse_bytes;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalVerification {
    pub success: bool,
    pub message: String,
}

impl ExternalVerification {
    fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

/// Verify `signature_text` over `data` with `public_key_text`. Never fails;
/// problems become an unsuccessful outcome with a message.
#[tracing::instrument(skip_all, fields(algorithm = %Algorithm::from(scheme), bytes = data.len()))]
pub fn verify_external(
    scheme: SignatureScheme,
    data: &[u8],
    public_key_text: &str,
    signature_text: &str,
) -> ExternalVerification {
    if public_key_text.trim().is_empty() || signature_text.trim().is_empty() {
        return ExternalVerification::new(false, "Please provide all required values.");
    }

    match check(scheme, data, public_key_text, signature_text) {
        Ok(true) => {
            tracing::info!("external signature valid");
            ExternalVerification::new(
                true,
                "Verification Successful ✓ The file is authentic and hasn't been tampered with.",
            )
        }
        Ok(false) => {
            tracing::info!("external signature invalid");
            ExternalVerification::new(
                false,
                "Verification Failed ✗ The file may have been tampered with or the wrong key was used.",
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "external verification failed");
            ExternalVerification::new(false, format!("Error: {}", e))
        }
    }
}

fn check(scheme: SignatureScheme, data: &[u8], public_key: &str, signature: &str) -> Result<bool> {
    let public_key = parse_bytes(public_key)?;
    let signature = parse_bytes(signature)?;
    Ok(sign::verify(scheme, &public_key, data, &signature)?)
}
