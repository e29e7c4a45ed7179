// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::builder::{build_bfv_params, build_bfv_params_arc};
use crate::constants::{insecure_2048, secure_8192, MODULI, PLAINTEXT_MODULUS};
use fhe::bfv::BfvParameters;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error as ThisError;

/// The preset used when nothing is configured
pub const DEFAULT_PRESET: CounterPreset = CounterPreset::SecureCounter8192;

/// BFV presets for the encrypted counter.
///
/// Both presets share the plaintext modulus 2^32 and differ only in ring dimension. Ciphertexts
/// produced under one preset cannot be decoded under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CounterPreset {
    /// Degree 2048 - DO NOT USE IN PRODUCTION
    ///
    /// Fast key generation and small ciphertexts for tests and local development.
    #[serde(rename = "insecure-counter-2048")]
    InsecureCounter2048,
    /// Degree 8192 - PRODUCTION READY
    #[default]
    #[serde(rename = "secure-counter-8192")]
    SecureCounter8192,
}

/// Metadata describing a preset
#[derive(Debug, Clone, Copy)]
pub struct PresetMetadata {
    /// Canonical name used in configuration files
    pub name: &'static str,
    /// Degree of the polynomial ring R_q = Z_q[X]/(X^d + 1)
    pub degree: usize,
    /// Approximate classical security in bits
    pub security_bits: usize,
    /// Whether the preset may be used outside of development
    pub production_ready: bool,
}

#[derive(ThisError, Debug)]
pub enum PresetError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
    #[error("Failed to build BFV parameters: {0}")]
    Build(String),
}

/// A complete BFV parameter set definition
#[derive(Debug, Clone, Copy)]
pub struct BfvParamSet {
    /// LWE dimension, a power of 2
    pub degree: usize,
    /// Plaintext modulus t. Fixed at 2^32 for the counter.
    pub plaintext_modulus: u64,
    /// NTT-friendly ciphertext moduli q_i
    pub moduli: &'static [u64],
}

impl BfvParamSet {
    pub fn build(self) -> Result<BfvParameters, PresetError> {
        build_bfv_params(self.degree, self.plaintext_modulus, self.moduli)
    }

    pub fn build_arc(self) -> Result<Arc<BfvParameters>, PresetError> {
        build_bfv_params_arc(self.degree, self.plaintext_modulus, self.moduli)
    }
}

impl CounterPreset {
    pub const ALL: [CounterPreset; 2] = [
        CounterPreset::InsecureCounter2048,
        CounterPreset::SecureCounter8192,
    ];

    pub fn from_name(name: &str) -> Result<Self, PresetError> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "insecure-counter-2048" => Ok(Self::InsecureCounter2048),
            "secure-counter-8192" => Ok(Self::SecureCounter8192),
            _ => Err(PresetError::UnknownPreset(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CounterPreset::InsecureCounter2048 => "insecure-counter-2048",
            CounterPreset::SecureCounter8192 => "secure-counter-8192",
        }
    }

    pub fn list() -> Vec<&'static str> {
        Self::ALL.iter().map(CounterPreset::name).collect()
    }

    pub fn metadata(&self) -> PresetMetadata {
        match self {
            CounterPreset::InsecureCounter2048 => PresetMetadata {
                name: self.name(),
                degree: insecure_2048::DEGREE,
                security_bits: insecure_2048::SECURITY_BITS,
                production_ready: false,
            },
            CounterPreset::SecureCounter8192 => PresetMetadata {
                name: self.name(),
                degree: secure_8192::DEGREE,
                security_bits: secure_8192::SECURITY_BITS,
                production_ready: true,
            },
        }
    }

    pub fn param_set(&self) -> BfvParamSet {
        (*self).into()
    }

    pub fn build_arc(&self) -> Result<Arc<BfvParameters>, PresetError> {
        self.param_set().build_arc()
    }
}

impl From<CounterPreset> for BfvParamSet {
    fn from(value: CounterPreset) -> Self {
        BfvParamSet {
            degree: value.metadata().degree,
            plaintext_modulus: PLAINTEXT_MODULUS,
            moduli: MODULI,
        }
    }
}

impl FromStr for CounterPreset {
    type Err = PresetError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for CounterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
