// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use fhc_events::RejectionKind;
use fhc_fhe::{ArithmeticError, CodecError};
use thiserror::Error as ThisError;

/// Why a submission was refused. None of these leave a trace in the counter state.
#[derive(ThisError, Debug)]
pub enum CounterError {
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(#[from] CodecError),
    #[error("Input proof does not attest this ciphertext for this caller and instance")]
    InvalidProof,
    #[error("Homomorphic arithmetic failed: {0}")]
    ArithmeticFailure(#[from] ArithmeticError),
    #[error("Could not commit counter state: {0:#}")]
    Storage(anyhow::Error),
}

impl CounterError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            CounterError::MalformedCiphertext(_) => RejectionKind::MalformedCiphertext,
            CounterError::InvalidProof => RejectionKind::InvalidProof,
            CounterError::ArithmeticFailure(_) => RejectionKind::ArithmeticFailure,
            CounterError::Storage(_) => RejectionKind::Storage,
        }
    }
}
