//! Typed operation results
//!
//! One variant per result shape. JSON output keeps the camelCase field
//! names (`publicKey`, `cipherText`, `isValid`, ...) and tags each result
//! with its `operation`.

use pqlab_crypto::SecretBytes;
use serde::Serialize;

use crate::operation::Operation;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum OperationResult {
    KeyGeneration(KeyGenerationResult),
    Encapsulation(EncapsulationResult),
    Decapsulation(DecapsulationResult),
    KemFlow(KemFlowResult),
    Signing(SigningResult),
    Verification(VerificationResult),
    DsaFlow(DsaFlowResult),
}

impl OperationResult {
    pub fn operation(&self) -> Operation {
        match self {
            OperationResult::KeyGeneration(_) => Operation::KeyGeneration,
            OperationResult::Encapsulation(_) => Operation::Encapsulation,
            OperationResult::Decapsulation(_) => Operation::Decapsulation,
            OperationResult::KemFlow(_) => Operation::KemFlow,
            OperationResult::Signing(_) => Operation::Sign,
            OperationResult::Verification(_) => Operation::Verify,
            OperationResult::DsaFlow(_) => Operation::DsaFlow,
        }
    }

    pub fn algorithm(&self) -> &str {
        match self {
            OperationResult::KeyGeneration(r) => &r.algorithm,
            OperationResult::Encapsulation(r) => &r.algorithm,
            OperationResult::Decapsulation(r) => &r.algorithm,
            OperationResult::KemFlow(r) => &r.algorithm,
            OperationResult::Signing(r) => &r.algorithm,
            OperationResult::Verification(r) => &r.algorithm,
            OperationResult::DsaFlow(r) => &r.algorithm,
        }
    }

    /// Time of the single timed step, or the whole flow
    pub fn execution_time(&self) -> &str {
        match self {
            OperationResult::KeyGeneration(r) => &r.execution_time,
            OperationResult::Encapsulation(r) => &r.execution_time,
            OperationResult::Decapsulation(r) => &r.execution_time,
            OperationResult::KemFlow(r) => &r.total_execution_time,
            OperationResult::Signing(r) => &r.execution_time,
            OperationResult::Verification(r) => &r.execution_time,
            OperationResult::DsaFlow(r) => &r.total_execution_time,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGenerationResult {
    pub algorithm: String,
    pub public_key: Vec<u8>,
    pub secret_key: SecretBytes,
    pub public_key_size: usize,
    pub secret_key_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncapsulationResult {
    pub algorithm: String,
    pub public_key: Vec<u8>,
    pub cipher_text: Vec<u8>,
    pub shared_secret: SecretBytes,
    pub cipher_text_size: usize,
    pub shared_secret_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecapsulationResult {
    pub algorithm: String,
    pub secret_key: SecretBytes,
    pub cipher_text: Vec<u8>,
    /// Secret produced by the encapsulating side
    pub shared_secret: SecretBytes,
    /// Secret recovered by the key owner
    pub alice_shared_secret: SecretBytes,
    pub secrets_match: bool,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGenerationStep {
    pub public_key_size: usize,
    pub secret_key_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncapsulationStep {
    pub cipher_text_size: usize,
    pub shared_secret_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecapsulationStep {
    pub secrets_match: bool,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KemFlowResult {
    pub algorithm: String,
    pub public_key: Vec<u8>,
    pub secret_key: SecretBytes,
    pub cipher_text: Vec<u8>,
    pub shared_secret: SecretBytes,
    pub alice_shared_secret: SecretBytes,
    pub secrets_match: bool,
    pub key_generation: KeyGenerationStep,
    pub encapsulation: EncapsulationStep,
    pub decapsulation: DecapsulationStep,
    pub total_execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningResult {
    pub algorithm: String,
    pub message: String,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub signature_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub algorithm: String,
    pub message: String,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub is_valid: bool,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningStep {
    pub signature_size: usize,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStep {
    pub is_valid: bool,
    pub execution_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DsaFlowResult {
    pub algorithm: String,
    pub message: String,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub key_generation: KeyGenerationStep,
    pub signing: SigningStep,
    pub verification: VerificationStep,
    pub total_execution_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verification() -> OperationResult {
        OperationResult::Verification(VerificationResult {
            algorithm: "ml_dsa44".to_string(),
            message: "hello".to_string(),
            public_key: vec![1, 2],
            signature: vec![3],
            is_valid: true,
            execution_time: "0.50ms".to_string(),
        })
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&verification().to_json().unwrap()).unwrap();
        assert_eq!(json["operation"], "verification");
        assert_eq!(json["isValid"], true);
        assert_eq!(json["publicKey"], serde_json::json!([1, 2]));
        assert_eq!(json["executionTime"], "0.50ms");
    }

    #[test]
    fn test_accessors() {
        let result = verification();
        assert_eq!(result.operation(), Operation::Verify);
        assert_eq!(result.algorithm(), "ml_dsa44");
        assert_eq!(result.execution_time(), "0.50ms");
    }

    #[test]
    fn test_secret_material_serializes_as_array() {
        let result = OperationResult::KeyGeneration(KeyGenerationResult {
            algorithm: "ml_kem512".to_string(),
            public_key: vec![7],
            secret_key: SecretBytes::new(vec![8, 9]),
            public_key_size: 1,
            secret_key_size: 2,
            execution_time: "1.00ms".to_string(),
        });
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["operation"], "keyGeneration");
        assert_eq!(json["secretKey"], serde_json::json!([8, 9]));
        assert_eq!(json["secretKeySize"], 2);
    }
}
