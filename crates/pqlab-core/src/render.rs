//! Plain-text rendering of operation results
//!
//! A summary block (sizes, timings, validity) always comes first. Byte
//! material follows as collapsed previews, or in full when expanded.

use std::fmt::Write as _;

use pqlab_crypto::Algorithm;

use crate::codec::{format_bytes, ByteFormat, DEFAULT_PREVIEW_LEN};
use crate::result::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub expanded: bool,
    pub format: ByteFormat,
    /// Elements shown in a collapsed preview
    pub limit: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            expanded: false,
            format: ByteFormat::Array,
            limit: DEFAULT_PREVIEW_LEN,
        }
    }
}

struct Writer {
    out: String,
    opts: RenderOptions,
}

impl Writer {
    fn heading(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = writeln!(self.out, "{}", "-".repeat(text.chars().count()));
    }

    fn field(&mut self, label: &str, value: impl std::fmt::Display) {
        let _ = writeln!(self.out, "  {:<20} {}", format!("{}:", label), value);
    }

    fn size(&mut self, label: &str, bytes: usize) {
        self.field(label, format!("{} bytes", bytes));
    }

    fn bytes(&mut self, label: &str, data: &[u8]) {
        let _ = writeln!(self.out, "\n  {} ({} bytes)", label, data.len());
        let body = format_bytes(data, self.opts.format, self.opts.expanded, self.opts.limit);
        let _ = writeln!(self.out, "    {}", body);
    }

    fn step(&mut self, n: usize, text: &str, time: &str) {
        let _ = writeln!(self.out, "  {}. {} ({})", n, text, time);
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "✓ Valid"
    } else {
        "✗ Invalid"
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "YES"
    } else {
        "NO"
    }
}

fn display_name(key: &str) -> String {
    key.parse::<Algorithm>()
        .map(|a| a.name())
        .unwrap_or_else(|_| key.to_string())
}

/// Render a result for the terminal
pub fn render(result: &OperationResult, opts: RenderOptions) -> String {
    let mut w = Writer {
        out: String::new(),
        opts,
    };
    w.heading(&format!(
        "{} · {}",
        display_name(result.algorithm()),
        result.operation()
    ));

    match result {
        OperationResult::KeyGeneration(r) => {
            w.size("Public Key Size", r.public_key_size);
            w.size("Secret Key Size", r.secret_key_size);
            w.field("Execution Time", &r.execution_time);
            w.bytes("Public Key", &r.public_key);
            w.bytes("Secret Key", r.secret_key.as_bytes());
        }

        OperationResult::Encapsulation(r) => {
            w.size("Cipher Text Size", r.cipher_text_size);
            w.size("Shared Secret Size", r.shared_secret_size);
            w.field("Execution Time", &r.execution_time);
            if opts.expanded {
                w.bytes("Public Key", &r.public_key);
            }
            w.bytes("Cipher Text", &r.cipher_text);
            w.bytes("Shared Secret", r.shared_secret.as_bytes());
        }

        OperationResult::Decapsulation(r) => {
            w.size("Shared Secret Size", r.alice_shared_secret.len());
            w.field("Secrets Match", yes_no(r.secrets_match));
            w.field("Execution Time", &r.execution_time);
            if opts.expanded {
                w.bytes("Secret Key", r.secret_key.as_bytes());
                w.bytes("Cipher Text", &r.cipher_text);
                w.bytes("Encapsulated Secret", r.shared_secret.as_bytes());
            }
            w.bytes("Decapsulated Secret", r.alice_shared_secret.as_bytes());
        }

        OperationResult::KemFlow(r) => {
            w.step(1, "[Alice] generates a key pair", &r.key_generation.execution_time);
            w.step(
                2,
                "[Bob] encapsulates a shared secret with Alice's public key",
                &r.encapsulation.execution_time,
            );
            w.step(
                3,
                "[Alice] decapsulates the ciphertext",
                &r.decapsulation.execution_time,
            );
            let _ = writeln!(w.out, "  4. Shared secrets match: {}", yes_no(r.secrets_match));
            w.blank();
            w.size("Public Key Size", r.key_generation.public_key_size);
            w.size("Secret Key Size", r.key_generation.secret_key_size);
            w.size("Cipher Text Size", r.encapsulation.cipher_text_size);
            w.size("Shared Secret Size", r.encapsulation.shared_secret_size);
            w.field("Total Time", &r.total_execution_time);
            w.bytes("Public Key", &r.public_key);
            if opts.expanded {
                w.bytes("Secret Key", r.secret_key.as_bytes());
            }
            w.bytes("Cipher Text", &r.cipher_text);
            w.bytes("Bob's Shared Secret", r.shared_secret.as_bytes());
            w.bytes("Alice's Shared Secret", r.alice_shared_secret.as_bytes());
        }

        OperationResult::Signing(r) => {
            w.field("Message", &r.message);
            w.size("Signature Size", r.signature_size);
            w.field("Execution Time", &r.execution_time);
            if opts.expanded {
                w.bytes("Public Key", &r.public_key);
            }
            w.bytes("Signature", &r.signature);
        }

        OperationResult::Verification(r) => {
            w.field("Result", verdict(r.is_valid));
            w.field("Message", &r.message);
            w.field("Execution Time", &r.execution_time);
            if opts.expanded {
                w.bytes("Public Key", &r.public_key);
                w.bytes("Signature", &r.signature);
            }
        }

        OperationResult::DsaFlow(r) => {
            w.step(1, "[Signer] generates a key pair", &r.key_generation.execution_time);
            w.step(2, "[Signer] signs the message", &r.signing.execution_time);
            w.step(
                3,
                "[Verifier] checks the signature with the public key",
                &r.verification.execution_time,
            );
            let _ = writeln!(w.out, "  4. Signature: {}", verdict(r.verification.is_valid));
            w.blank();
            w.field("Message", &r.message);
            w.size("Public Key Size", r.key_generation.public_key_size);
            w.size("Secret Key Size", r.key_generation.secret_key_size);
            w.size("Signature Size", r.signing.signature_size);
            w.field("Total Time", &r.total_execution_time);
            w.bytes("Public Key", &r.public_key);
            w.bytes("Signature", &r.signature);
        }
    }

    w.out
}
