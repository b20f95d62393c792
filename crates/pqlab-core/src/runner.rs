//! Runs one operation against one parameter set
//!
//! Each operation sets up whatever it needs (keys, a ciphertext, a
//! signature) untimed, then times only the step it is named after. The
//! flows time every step and the whole run.

use std::time::Instant;

use pqlab_crypto::{kem, sign, Algorithm, MlKemLevel, SignatureScheme};

use crate::config::Config;
use crate::operation::Operation;
use crate::result::*;
use crate::timing::{format_elapsed, timed};
use crate::{CoreError, Result};

/// Run with the built-in default messages
pub fn execute(
    operation: Operation,
    algorithm: Algorithm,
    message: Option<&str>,
) -> Result<OperationResult> {
    execute_with(operation, algorithm, message, &Config::default())
}

#[tracing::instrument(skip_all, fields(algorithm = %algorithm, operation = %operation))]
pub fn execute_with(
    operation: Operation,
    algorithm: Algorithm,
    message: Option<&str>,
    config: &Config,
) -> Result<OperationResult> {
    let family = algorithm.family();
    if !operation.supports(family) {
        return Err(CoreError::UnsupportedOperation { operation, family });
    }
    if algorithm.is_slow() {
        tracing::warn!("{} operations can take several seconds", algorithm.name());
    }

    let key = algorithm.key();
    let result = match algorithm {
        Algorithm::MlKem(level) => run_kem(operation, level, key)?,
        Algorithm::MlDsa(_) | Algorithm::SlhDsa(_) => {
            let scheme = algorithm.signature_scheme()?;
            let message = match message {
                Some(m) if !m.is_empty() => m.to_string(),
                _ => config.default_message(family).to_string(),
            };
            run_signature(operation, scheme, key, message)?
        }
    };

    tracing::info!(time = result.execution_time(), "{} complete", operation);
    Ok(result)
}

fn run_kem(operation: Operation, level: MlKemLevel, algorithm: String) -> Result<OperationResult> {
    let result = match operation {
        Operation::KeyGeneration => {
            let t = timed(|| kem::keygen(level));
            let execution_time = t.execution_time();
            let keys = t.value;
            OperationResult::KeyGeneration(KeyGenerationResult {
                algorithm,
                public_key_size: keys.public_key.len(),
                secret_key_size: keys.secret_key.len(),
                public_key: keys.public_key,
                secret_key: keys.secret_key,
                execution_time,
            })
        }

        Operation::Encapsulation => {
            let alice = kem::keygen(level);
            let t = timed(|| kem::encapsulate(level, &alice.public_key)).transpose()?;
            let execution_time = t.execution_time();
            let encapsulated = t.value;
            OperationResult::Encapsulation(EncapsulationResult {
                algorithm,
                public_key: alice.public_key,
                cipher_text_size: encapsulated.cipher_text.len(),
                shared_secret_size: encapsulated.shared_secret.len(),
                cipher_text: encapsulated.cipher_text,
                shared_secret: encapsulated.shared_secret,
                execution_time,
            })
        }

        Operation::Decapsulation => {
            let alice = kem::keygen(level);
            let bob = kem::encapsulate(level, &alice.public_key)?;
            let t = timed(|| kem::decapsulate(level, &bob.cipher_text, alice.secret_key.as_bytes()))
                .transpose()?;
            let execution_time = t.execution_time();
            let recovered = t.value;
            OperationResult::Decapsulation(DecapsulationResult {
                algorithm,
                secret_key: alice.secret_key,
                cipher_text: bob.cipher_text,
                secrets_match: recovered == bob.shared_secret,
                shared_secret: bob.shared_secret,
                alice_shared_secret: recovered,
                execution_time,
            })
        }

        Operation::KemFlow => {
            let start = Instant::now();
            let keygen = timed(|| kem::keygen(level));
            let encaps = timed(|| kem::encapsulate(level, &keygen.value.public_key)).transpose()?;
            let decaps = timed(|| {
                kem::decapsulate(
                    level,
                    &encaps.value.cipher_text,
                    keygen.value.secret_key.as_bytes(),
                )
            })
            .transpose()?;
            let total_execution_time = format_elapsed(start.elapsed());

            let secrets_match = decaps.value == encaps.value.shared_secret;
            OperationResult::KemFlow(KemFlowResult {
                algorithm,
                key_generation: KeyGenerationStep {
                    public_key_size: keygen.value.public_key.len(),
                    secret_key_size: keygen.value.secret_key.len(),
                    execution_time: keygen.execution_time(),
                },
                encapsulation: EncapsulationStep {
                    cipher_text_size: encaps.value.cipher_text.len(),
                    shared_secret_size: encaps.value.shared_secret.len(),
                    execution_time: encaps.execution_time(),
                },
                decapsulation: DecapsulationStep {
                    secrets_match,
                    execution_time: decaps.execution_time(),
                },
                public_key: keygen.value.public_key.clone(),
                secret_key: keygen.value.secret_key.clone(),
                cipher_text: encaps.value.cipher_text.clone(),
                shared_secret: encaps.value.shared_secret.clone(),
                alice_shared_secret: decaps.value,
                secrets_match,
                total_execution_time,
            })
        }

        other => {
            return Err(CoreError::UnsupportedOperation {
                operation: other,
                family: pqlab_crypto::Family::MlKem,
            })
        }
    };
    Ok(result)
}

fn run_signature(
    operation: Operation,
    scheme: SignatureScheme,
    algorithm: String,
    message: String,
) -> Result<OperationResult> {
    let result = match operation {
        Operation::KeyGeneration => {
            let t = timed(|| sign::keygen(scheme));
            let execution_time = t.execution_time();
            let keys = t.value;
            OperationResult::KeyGeneration(KeyGenerationResult {
                algorithm,
                public_key_size: keys.public_key.len(),
                secret_key_size: keys.secret_key.len(),
                public_key: keys.public_key,
                secret_key: keys.secret_key,
                execution_time,
            })
        }

        Operation::Sign => {
            let keys = sign::keygen(scheme);
            let t = timed(|| sign::sign(scheme, keys.secret_key.as_bytes(), message.as_bytes()))
                .transpose()?;
            let execution_time = t.execution_time();
            let signature = t.value;
            OperationResult::Signing(SigningResult {
                algorithm,
                message,
                public_key: keys.public_key,
                signature_size: signature.len(),
                signature,
                execution_time,
            })
        }

        Operation::Verify => {
            let keys = sign::keygen(scheme);
            let signature = sign::sign(scheme, keys.secret_key.as_bytes(), message.as_bytes())?;
            let t = timed(|| sign::verify(scheme, &keys.public_key, message.as_bytes(), &signature))
                .transpose()?;
            let execution_time = t.execution_time();
            OperationResult::Verification(VerificationResult {
                algorithm,
                message,
                public_key: keys.public_key,
                signature,
                is_valid: t.value,
                execution_time,
            })
        }

        Operation::DsaFlow => {
            let start = Instant::now();
            let keygen = timed(|| sign::keygen(scheme));
            let signing = timed(|| {
                sign::sign(scheme, keygen.value.secret_key.as_bytes(), message.as_bytes())
            })
            .transpose()?;
            let verification = timed(|| {
                sign::verify(scheme, &keygen.value.public_key, message.as_bytes(), &signing.value)
            })
            .transpose()?;
            let total_execution_time = format_elapsed(start.elapsed());

            OperationResult::DsaFlow(DsaFlowResult {
                algorithm,
                message,
                key_generation: KeyGenerationStep {
                    public_key_size: keygen.value.public_key.len(),
                    secret_key_size: keygen.value.secret_key.len(),
                    execution_time: keygen.execution_time(),
                },
                signing: SigningStep {
                    signature_size: signing.value.len(),
                    execution_time: signing.execution_time(),
                },
                verification: VerificationStep {
                    is_valid: verification.value,
                    execution_time: verification.execution_time(),
                },
                public_key: keygen.value.public_key.clone(),
                signature: signing.value.clone(),
                total_execution_time,
            })
        }

        other => {
            return Err(CoreError::UnsupportedOperation {
                operation: other,
                family: Algorithm::from(scheme).family(),
            })
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqlab_crypto::{Family, MlDsaLevel, SlhDsaParams};

    fn mlkem() -> Algorithm {
        Algorithm::MlKem(MlKemLevel::MlKem768)
    }

    fn mldsa() -> Algorithm {
        Algorithm::MlDsa(MlDsaLevel::MlDsa44)
    }

    #[test]
    fn test_kem_keygen_sizes() {
        let result = execute(Operation::KeyGeneration, mlkem(), None).unwrap();
        match result {
            OperationResult::KeyGeneration(r) => {
                assert_eq!(r.algorithm, "ml_kem768");
                assert_eq!(r.public_key_size, 1184);
                assert_eq!(r.public_key.len(), r.public_key_size);
                assert!(r.execution_time.ends_with("ms"));
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_decapsulation_secrets_match() {
        match execute(Operation::Decapsulation, mlkem(), None).unwrap() {
            OperationResult::Decapsulation(r) => {
                assert!(r.secrets_match);
                assert_eq!(r.shared_secret, r.alice_shared_secret);
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_kem_flow() {
        match execute(Operation::KemFlow, mlkem(), None).unwrap() {
            OperationResult::KemFlow(r) => {
                assert!(r.secrets_match);
                assert!(r.decapsulation.secrets_match);
                assert_eq!(r.encapsulation.cipher_text_size, 1088);
                assert_eq!(r.encapsulation.shared_secret_size, 32);
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_sign_uses_default_message() {
        match execute(Operation::Sign, mldsa(), Some("")).unwrap() {
            OperationResult::Signing(r) => {
                assert_eq!(r.message, "This is a default test message for ML-DSA signature.");
                assert_eq!(r.signature.len(), r.signature_size);
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_verify_is_valid() {
        match execute(Operation::Verify, mldsa(), Some("hello lattice")).unwrap() {
            OperationResult::Verification(r) => {
                assert!(r.is_valid);
                assert_eq!(r.message, "hello lattice");
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_dsa_flow_with_slhdsa() {
        let slh = Algorithm::SlhDsa(SlhDsaParams::new(
            pqlab_crypto::algorithm::SlhHash::Sha2,
            pqlab_crypto::algorithm::SlhStrength::L128,
            pqlab_crypto::algorithm::SlhVariant::Fast,
        ));
        match execute(Operation::DsaFlow, slh, None).unwrap() {
            OperationResult::DsaFlow(r) => {
                assert!(r.verification.is_valid);
                assert_eq!(r.message, "This is a default test message for SLH-DSA signature.");
                assert_eq!(r.signing.signature_size, r.signature.len());
            }
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }

    #[test]
    fn test_unsupported_operation() {
        let err = execute(Operation::Encapsulation, mldsa(), None).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedOperation { operation: Operation::Encapsulation, family: Family::MlDsa }
        ));
        assert_eq!(err.to_string(), "Encapsulation is not available for ML-DSA");
    }

    #[test]
    fn test_custom_default_message() {
        let mut config = Config::default();
        config.default_messages.ml_dsa = "configured".to_string();
        match execute_with(Operation::Sign, mldsa(), None, &config).unwrap() {
            OperationResult::Signing(r) => assert_eq!(r.message, "configured"),
            other => panic!("unexpected result: {:?}", other.operation()),
        }
    }
}
