//! Operations a user can run against a parameter set

use std::fmt;
use std::str::FromStr;

use pqlab_crypto::Family;
use serde::Serialize;

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    KeyGeneration,
    Encapsulation,
    Decapsulation,
    KemFlow,
    Sign,
    Verify,
    DsaFlow,
}

impl Operation {
    pub const KEM: [Operation; 4] = [
        Operation::KeyGeneration,
        Operation::Encapsulation,
        Operation::Decapsulation,
        Operation::KemFlow,
    ];

    pub const SIGNATURE: [Operation; 4] = [
        Operation::KeyGeneration,
        Operation::Sign,
        Operation::Verify,
        Operation::DsaFlow,
    ];

    pub fn for_family(family: Family) -> &'static [Operation] {
        if family.is_kem() {
            &Self::KEM
        } else {
            &Self::SIGNATURE
        }
    }

    pub fn supports(&self, family: Family) -> bool {
        Self::for_family(family).contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::KeyGeneration => "Key Generation",
            Operation::Encapsulation => "Encapsulation",
            Operation::Decapsulation => "Decapsulation",
            Operation::KemFlow => "Complete KEM Flow",
            Operation::Sign => "Sign Message",
            Operation::Verify => "Verify Signature",
            Operation::DsaFlow => "Complete DSA Flow",
        }
    }

    /// Short command-line key
    pub fn key(&self) -> &'static str {
        match self {
            Operation::KeyGeneration => "keygen",
            Operation::Encapsulation => "encaps",
            Operation::Decapsulation => "decaps",
            Operation::KemFlow => "kem-flow",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::DsaFlow => "dsa-flow",
        }
    }

    pub fn is_flow(&self) -> bool {
        matches!(self, Operation::KemFlow | Operation::DsaFlow)
    }

    pub fn needs_message(&self) -> bool {
        matches!(self, Operation::Sign | Operation::Verify | Operation::DsaFlow)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        let op = match wanted.as_str() {
            "keygen" | "key-generation" | "key generation" => Operation::KeyGeneration,
            "encaps" | "encapsulate" | "encapsulation" => Operation::Encapsulation,
            "decaps" | "decapsulate" | "decapsulation" => Operation::Decapsulation,
            "kem-flow" | "flow-kem" | "complete kem flow" => Operation::KemFlow,
            "sign" | "sign message" => Operation::Sign,
            "verify" | "verify signature" => Operation::Verify,
            "dsa-flow" | "flow-dsa" | "complete dsa flow" => Operation::DsaFlow,
            _ => return Err(CoreError::UnknownOperation(s.trim().to_string())),
        };
        Ok(op)
    }
}
