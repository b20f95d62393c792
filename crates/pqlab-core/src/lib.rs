//! pqlab Core - operations, results and sessions
//!
//! This crate contains the logic shared by every pqlab frontend: running a
//! timed operation against a parameter set, shaping the result, rendering
//! it, and the stateful "try it" sessions.

pub mod codec;
pub mod config;
pub mod operation;
pub mod render;
pub mod result;
pub mod runner;
pub mod session;
pub mod timing;
pub mod verify;

pub use codec::{format_array, parse_bytes, to_hex, ByteFormat, ParseError};
pub use config::Config;
pub use operation::Operation;
pub use render::{render, RenderOptions};
pub use result::OperationResult;
pub use runner::execute;
pub use session::{KemSession, LogEntry, SignatureSession};
pub use verify::{verify_external, ExternalVerification};

use pqlab_crypto::{CipherError, CryptoError, Family};

/// Errors surfaced by pqlab operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("{operation} is not available for {family}")]
    UnsupportedOperation { operation: Operation, family: Family },

    #[error("Invalid config {path}: {message}")]
    Config { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
