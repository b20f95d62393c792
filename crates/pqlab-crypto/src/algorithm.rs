//! Algorithm registry
//!
//! Names every parameter set pqlab can drive, with the string keys used on
//! the command line (`ml_kem768`, `ml_dsa44`, `slh_dsa_shake_192f`, ...).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::sign::SignatureScheme;
use crate::{kem, sign, CryptoError, Result};

/// The three standardized families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Family {
    MlKem,
    MlDsa,
    SlhDsa,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::MlKem => "ML-KEM",
            Family::MlDsa => "ML-DSA",
            Family::SlhDsa => "SLH-DSA",
        }
    }

    pub fn standard(&self) -> &'static str {
        match self {
            Family::MlKem => "FIPS 203",
            Family::MlDsa => "FIPS 204",
            Family::SlhDsa => "FIPS 205",
        }
    }

    pub fn is_kem(&self) -> bool {
        matches!(self, Family::MlKem)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MlKemLevel {
    MlKem512,
    MlKem768,
    MlKem1024,
}

impl MlKemLevel {
    pub const ALL: [MlKemLevel; 3] = [Self::MlKem512, Self::MlKem768, Self::MlKem1024];

    pub fn parameter(&self) -> u16 {
        match self {
            Self::MlKem512 => 512,
            Self::MlKem768 => 768,
            Self::MlKem1024 => 1024,
        }
    }

    pub fn security_bits(&self) -> u16 {
        match self {
            Self::MlKem512 => 128,
            Self::MlKem768 => 192,
            Self::MlKem1024 => 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MlDsaLevel {
    MlDsa44,
    MlDsa65,
    MlDsa87,
}

impl MlDsaLevel {
    pub const ALL: [MlDsaLevel; 3] = [Self::MlDsa44, Self::MlDsa65, Self::MlDsa87];

    pub fn parameter(&self) -> u16 {
        match self {
            Self::MlDsa44 => 44,
            Self::MlDsa65 => 65,
            Self::MlDsa87 => 87,
        }
    }

    pub fn security_bits(&self) -> u16 {
        match self {
            Self::MlDsa44 => 128,
            Self::MlDsa65 => 192,
            Self::MlDsa87 => 256,
        }
    }
}

/// Hash function underlying an SLH-DSA parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlhHash {
    Sha2,
    Shake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlhStrength {
    L128,
    L192,
    L256,
}

/// `s` trades signing speed for smaller signatures, `f` the reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlhVariant {
    Small,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlhDsaParams {
    pub hash: SlhHash,
    pub strength: SlhStrength,
    pub variant: SlhVariant,
}

impl SlhDsaParams {
    pub const fn new(hash: SlhHash, strength: SlhStrength, variant: SlhVariant) -> Self {
        Self { hash, strength, variant }
    }

    pub fn all() -> Vec<SlhDsaParams> {
        let mut params = Vec::with_capacity(12);
        for hash in [SlhHash::Sha2, SlhHash::Shake] {
            for strength in [SlhStrength::L128, SlhStrength::L192, SlhStrength::L256] {
                for variant in [SlhVariant::Small, SlhVariant::Fast] {
                    params.push(Self::new(hash, strength, variant));
                }
            }
        }
        params
    }

    pub fn security_bits(&self) -> u16 {
        match self.strength {
            SlhStrength::L128 => 128,
            SlhStrength::L192 => 192,
            SlhStrength::L256 => 256,
        }
    }

    fn hash_name(&self) -> &'static str {
        match self.hash {
            SlhHash::Sha2 => "sha2",
            SlhHash::Shake => "shake",
        }
    }

    fn variant_suffix(&self) -> char {
        match self.variant {
            SlhVariant::Small => 's',
            SlhVariant::Fast => 'f',
        }
    }
}

/// Byte sizes reported by the backend for one parameter set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySizes {
    pub public_key: usize,
    pub secret_key: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<usize>,
}

/// Any parameter set of any family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    MlKem(MlKemLevel),
    MlDsa(MlDsaLevel),
    SlhDsa(SlhDsaParams),
}

impl Algorithm {
    /// Every parameter set, ML-KEM first, then ML-DSA, then SLH-DSA
    pub fn all() -> Vec<Algorithm> {
        MlKemLevel::ALL
            .into_iter()
            .map(Algorithm::MlKem)
            .chain(MlDsaLevel::ALL.into_iter().map(Algorithm::MlDsa))
            .chain(SlhDsaParams::all().into_iter().map(Algorithm::SlhDsa))
            .collect()
    }

    pub fn of_family(family: Family) -> Vec<Algorithm> {
        Self::all().into_iter().filter(|a| a.family() == family).collect()
    }

    pub fn family(&self) -> Family {
        match self {
            Algorithm::MlKem(_) => Family::MlKem,
            Algorithm::MlDsa(_) => Family::MlDsa,
            Algorithm::SlhDsa(_) => Family::SlhDsa,
        }
    }

    /// Command-line key, e.g. `ml_kem768` or `slh_dsa_sha2_128s`
    pub fn key(&self) -> String {
        match self {
            Algorithm::MlKem(level) => format!("ml_kem{}", level.parameter()),
            Algorithm::MlDsa(level) => format!("ml_dsa{}", level.parameter()),
            Algorithm::SlhDsa(p) => format!(
                "slh_dsa_{}_{}{}",
                p.hash_name(),
                p.security_bits(),
                p.variant_suffix()
            ),
        }
    }

    /// Display name, e.g. `ML-KEM-768` or `SLH-DSA-SHAKE-192f`
    pub fn name(&self) -> String {
        match self {
            Algorithm::MlKem(level) => format!("ML-KEM-{}", level.parameter()),
            Algorithm::MlDsa(level) => format!("ML-DSA-{}", level.parameter()),
            Algorithm::SlhDsa(p) => format!(
                "SLH-DSA-{}-{}{}",
                p.hash_name().to_uppercase(),
                p.security_bits(),
                p.variant_suffix()
            ),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Algorithm::SlhDsa(p) => {
                let tradeoff = match p.variant {
                    SlhVariant::Small => "Small",
                    SlhVariant::Fast => "Fast",
                };
                format!("{} ({}, {}-bit)", self.name(), tradeoff, p.security_bits())
            }
            _ => format!("{} ({}-bit security)", self.name(), self.security_bits()),
        }
    }

    pub fn security_bits(&self) -> u16 {
        match self {
            Algorithm::MlKem(level) => level.security_bits(),
            Algorithm::MlDsa(level) => level.security_bits(),
            Algorithm::SlhDsa(p) => p.security_bits(),
        }
    }

    /// Hash-based signing takes seconds at the higher levels
    pub fn is_slow(&self) -> bool {
        matches!(self, Algorithm::SlhDsa(_))
    }

    pub fn sizes(&self) -> KeySizes {
        match self {
            Algorithm::MlKem(level) => kem::sizes(*level),
            Algorithm::MlDsa(level) => sign::sizes(SignatureScheme::MlDsa(*level)),
            Algorithm::SlhDsa(p) => sign::sizes(SignatureScheme::SlhDsa(*p)),
        }
    }

    pub fn kem_level(&self) -> Result<MlKemLevel> {
        match self {
            Algorithm::MlKem(level) => Ok(*level),
            _ => Err(CryptoError::WrongFamily {
                algorithm: self.key(),
                expected: "key encapsulation",
            }),
        }
    }

    pub fn signature_scheme(&self) -> Result<SignatureScheme> {
        match self {
            Algorithm::MlDsa(level) => Ok(SignatureScheme::MlDsa(*level)),
            Algorithm::SlhDsa(p) => Ok(SignatureScheme::SlhDsa(*p)),
            Algorithm::MlKem(_) => Err(CryptoError::WrongFamily {
                algorithm: self.key(),
                expected: "signature",
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn normalize(key: &str) -> String {
    key.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::all()
            .into_iter()
            .find(|a| normalize(&a.key()) == wanted)
            .ok_or_else(|| CryptoError::UnknownAlgorithm(s.trim().to_string()))
    }
}

impl From<SignatureScheme> for Algorithm {
    fn from(scheme: SignatureScheme) -> Self {
        match scheme {
            SignatureScheme::MlDsa(level) => Algorithm::MlDsa(level),
            SignatureScheme::SlhDsa(p) => Algorithm::SlhDsa(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_counts() {
        assert_eq!(Algorithm::of_family(Family::MlKem).len(), 3);
        assert_eq!(Algorithm::of_family(Family::MlDsa).len(), 3);
        assert_eq!(Algorithm::of_family(Family::SlhDsa).len(), 12);
    }

    #[test]
    fn test_keys_round_trip_through_from_str() {
        for algorithm in Algorithm::all() {
            let parsed: Algorithm = algorithm.key().parse().unwrap();
            assert_eq!(parsed, algorithm);
        }
    }

    #[test]
    fn test_from_str_is_lenient() {
        let expected = Algorithm::MlKem(MlKemLevel::MlKem768);
        assert_eq!("ML-KEM-768".parse::<Algorithm>().unwrap(), expected);
        assert_eq!("mlkem768".parse::<Algorithm>().unwrap(), expected);

        let slh = Algorithm::SlhDsa(SlhDsaParams::new(
            SlhHash::Shake,
            SlhStrength::L192,
            SlhVariant::Fast,
        ));
        assert_eq!("SLH-DSA-SHAKE-192f".parse::<Algorithm>().unwrap(), slh);
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = "ml_kem999".parse::<Algorithm>().unwrap_err();
        assert_eq!(err.to_string(), "Algorithm ml_kem999 not found");
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Algorithm::MlKem(MlKemLevel::MlKem512).label(),
            "ML-KEM-512 (128-bit security)"
        );
        let slh = Algorithm::SlhDsa(SlhDsaParams::new(
            SlhHash::Sha2,
            SlhStrength::L128,
            SlhVariant::Fast,
        ));
        assert_eq!(slh.key(), "slh_dsa_sha2_128f");
        assert_eq!(slh.label(), "SLH-DSA-SHA2-128f (Fast, 128-bit)");
    }

    #[test]
    fn test_family_mismatch() {
        let kem = Algorithm::MlKem(MlKemLevel::MlKem1024);
        assert!(kem.signature_scheme().is_err());
        assert!(Algorithm::MlDsa(MlDsaLevel::MlDsa65).kem_level().is_err());
    }

    #[test]
    fn test_kem_sizes() {
        let sizes = Algorithm::MlKem(MlKemLevel::MlKem768).sizes();
        assert_eq!(sizes.public_key, 1184);
        assert_eq!(sizes.secret_key, 2400);
        assert_eq!(sizes.ciphertext, Some(1088));
        assert_eq!(sizes.shared_secret, Some(32));
        assert_eq!(sizes.signature, None);
    }
}
