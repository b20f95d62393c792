//! pqlab CLI - poke at the NIST post-quantum standards
//!
//! Usage:
//!   pqlab list                          - List every parameter set
//!   pqlab run <algorithm> <operation>   - Run and visualize one operation
//!   pqlab verify <algorithm> ...        - Check a detached signature over a file
//!   pqlab try kem | try sign <alg>      - Interactive step-by-step sessions

mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pqlab_core::codec::ByteFormat;
use pqlab_core::runner::execute_with;
use pqlab_core::{render, verify_external, Config, ExternalVerification, Operation};
use pqlab_crypto::{Algorithm, Family};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pqlab")]
#[command(author = "HeyBattle1")]
#[command(version)]
#[command(about = "Explore ML-KEM, ML-DSA and SLH-DSA from the terminal", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.pqlab/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every parameter set with its sizes
    List,

    /// Run one operation and show the result
    Run {
        /// Parameter set, e.g. ml_kem768 or slh_dsa_sha2_128f
        algorithm: String,

        /// Operation, e.g. keygen, encaps, kem-flow, sign, verify, dsa-flow
        operation: String,

        /// Message to sign (signature families only)
        #[arg(short, long)]
        message: Option<String>,

        /// Print full byte arrays instead of previews
        #[arg(long)]
        expand: bool,

        /// Print bytes as hex
        #[arg(long)]
        hex: bool,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify a detached signature over a file
    Verify {
        /// Signature parameter set the key belongs to
        algorithm: String,

        /// File that was signed
        #[arg(long)]
        file: PathBuf,

        /// Public key as hex or byte array, or @path to read it from a file
        #[arg(long)]
        public_key: String,

        /// Signature as hex or byte array, or @path to read it from a file
        #[arg(long)]
        signature: String,
    },

    /// Interactive step-by-step sessions
    Try {
        #[command(subcommand)]
        session: TrySession,
    },
}

#[derive(Subcommand)]
enum TrySession {
    /// Key encapsulation with an AES-GCM message demo
    Kem {
        /// Security level: 512, 768, 1024 or a full key like ml_kem768
        #[arg(long, default_value = "512")]
        level: String,
    },

    /// Sign and verify messages and files
    Sign {
        /// Parameter set, e.g. ml_dsa65 or slh_dsa_shake_128f
        #[arg(default_value = "ml_dsa44")]
        algorithm: String,
    },
}

fn log_filter(verbose: u8) -> tracing_subscriber::EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List => list(),

        Commands::Run {
            algorithm,
            operation,
            message,
            expand,
            hex,
            json,
        } => {
            let algorithm: Algorithm = algorithm.parse()?;
            let operation: Operation = operation.parse()?;

            if algorithm.is_slow() && config.slow_warning && !json {
                eprintln!(
                    "⏳ {} operations can take several seconds, especially at higher security levels...",
                    algorithm.name()
                );
            }

            let mut opts = config.render_options();
            opts.expanded |= expand;
            if hex {
                opts.format = ByteFormat::Hex;
            }

            tracing::info!(%algorithm, %operation, "running");
            let result = tokio::task::spawn_blocking(move || {
                execute_with(operation, algorithm, message.as_deref(), &config)
            })
            .await??;

            if json {
                println!("{}", result.to_json()?);
            } else {
                print!("{}", render(&result, opts));
            }
        }

        Commands::Verify {
            algorithm,
            file,
            public_key,
            signature,
        } => {
            let outcome = verify_file(&algorithm, &file, &public_key, &signature).await?;
            println!("{}", outcome.message);
            if !outcome.success {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Try { session } => {
            let opts = config.render_options();
            match session {
                TrySession::Kem { level } => {
                    let level = repl::parse_kem_level(&level)?;
                    tracing::info!(level = ?level, "starting KEM session");
                    tokio::task::spawn_blocking(move || repl::run(repl::KemRepl::new(level, opts)))
                        .await??;
                }
                TrySession::Sign { algorithm } => {
                    let scheme = algorithm.parse::<Algorithm>()?.signature_scheme()?;
                    tracing::info!(algorithm = %Algorithm::from(scheme), "starting signature session");
                    tokio::task::spawn_blocking(move || {
                        repl::run(repl::SignRepl::new(scheme, opts))
                    })
                    .await??;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn list() {
    for family in [Family::MlKem, Family::MlDsa, Family::SlhDsa] {
        println!("{} ({})", family, family.standard());
        for algorithm in Algorithm::of_family(family) {
            let sizes = algorithm.sizes();
            let output = match (sizes.ciphertext, sizes.signature) {
                (Some(ct), _) => format!("ct {:>5}", ct),
                (_, Some(sig)) => format!("sig {:>5}", sig),
                _ => String::new(),
            };
            println!(
                "  {:<20} {:<36} pk {:>5}  sk {:>5}  {}",
                algorithm.key(),
                algorithm.label(),
                sizes.public_key,
                sizes.secret_key,
                output
            );
        }
        println!();
    }
}

async fn verify_file(
    algorithm: &str,
    file: &Path,
    public_key: &str,
    signature: &str,
) -> anyhow::Result<ExternalVerification> {
    let scheme = algorithm.parse::<Algorithm>()?.signature_scheme()?;
    let data =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let public_key = read_arg(public_key)?;
    let signature = read_arg(signature)?;

    let outcome = tokio::task::spawn_blocking(move || {
        verify_external(scheme, &data, &public_key, &signature)
    })
    .await?;
    Ok(outcome)
}

/// Argument text, or the contents of a file when written as `@path`
fn read_arg(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read {}", path)),
        None => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqlab_core::to_hex;
    use pqlab_crypto::{sign, MlDsaLevel, SignatureScheme};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_arg_inline() {
        assert_eq!(read_arg("0a0b").unwrap(), "0a0b");
    }

    #[test]
    fn test_read_arg_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "[1, 2, 3]").unwrap();
        let arg = format!("@{}", tmp.path().display());
        assert_eq!(read_arg(&arg).unwrap(), "[1, 2, 3]");
    }

    fn signed_file(contents: &[u8]) -> (NamedTempFile, NamedTempFile, NamedTempFile) {
        let scheme = SignatureScheme::MlDsa(MlDsaLevel::MlDsa44);
        let keys = sign::keygen(scheme);
        let signature = sign::sign(scheme, keys.secret_key.as_bytes(), contents).unwrap();

        let mut data = NamedTempFile::new().unwrap();
        data.write_all(contents).unwrap();
        let mut pk = NamedTempFile::new().unwrap();
        write!(pk, "{}", to_hex(&keys.public_key)).unwrap();
        let mut sig = NamedTempFile::new().unwrap();
        write!(sig, "{}", to_hex(&signature)).unwrap();
        (data, pk, sig)
    }

    #[tokio::test]
    async fn test_verify_file_with_key_files() {
        let (data, pk, sig) = signed_file(b"release notes");
        let outcome = verify_file(
            "ml_dsa44",
            data.path(),
            &format!("@{}", pk.path().display()),
            &format!("@{}", sig.path().display()),
        )
        .await
        .unwrap();
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_verify_file_tampered_is_unsuccessful() {
        let (data, pk, sig) = signed_file(b"release notes");
        std::fs::write(data.path(), b"release notes!").unwrap();
        let outcome = verify_file(
            "ml_dsa44",
            data.path(),
            &format!("@{}", pk.path().display()),
            &format!("@{}", sig.path().display()),
        )
        .await
        .unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Verification Failed"));
    }

    #[tokio::test]
    async fn test_verify_file_rejects_kem_algorithm() {
        let (data, pk, sig) = signed_file(b"x");
        let pk = format!("@{}", pk.path().display());
        let sig = format!("@{}", sig.path().display());
        assert!(verify_file("ml_kem512", data.path(), &pk, &sig).await.is_err());
    }

    #[test]
    fn test_read_arg_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let arg = format!("@{}", dir.path().join("absent.key").display());
        assert!(read_arg(&arg).is_err());
    }
}
