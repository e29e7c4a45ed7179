// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use derivative::Derivative;
use fhc_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Length of an ECDSA signature (r ‖ s ‖ v)
pub const SIGNATURE_LEN: usize = 65;
/// A proof carries at most this many signatures
pub const MAX_SIGNATURES: usize = u8::MAX as usize;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ProofFormatError {
    #[error("Proof is empty")]
    Empty,
    #[error("Proof declares {declared} signatures but carries {actual} bytes of signature data")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("Signature must be {SIGNATURE_LEN} bytes, got {0}")]
    SignatureLength(usize),
    #[error("Proof cannot carry more than {MAX_SIGNATURES} signatures")]
    TooManySignatures,
}

/// Set of input verifier signatures over a ciphertext's context digest.
///
/// Wire format: `[n: u8][n × 65 byte signature]`.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct InputProof {
    #[derivative(Debug = "ignore")]
    signatures: Vec<ArcBytes>,
}

impl InputProof {
    pub fn new(signatures: Vec<ArcBytes>) -> Result<Self, ProofFormatError> {
        if signatures.len() > MAX_SIGNATURES {
            return Err(ProofFormatError::TooManySignatures);
        }
        if let Some(bad) = signatures.iter().find(|s| s.size_bytes() != SIGNATURE_LEN) {
            return Err(ProofFormatError::SignatureLength(bad.size_bytes()));
        }
        Ok(Self { signatures })
    }

    pub fn signatures(&self) -> &[ArcBytes] {
        &self.signatures
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(1 + self.signatures.len() * SIGNATURE_LEN);
        // new() caps the count at u8::MAX
        bytes.push(self.signatures.len() as u8);
        for sig in &self.signatures {
            bytes.extend_from_slice(sig);
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProofFormatError> {
        let (count, rest) = bytes.split_first().ok_or(ProofFormatError::Empty)?;
        let declared = usize::from(*count);
        if rest.len() != declared * SIGNATURE_LEN {
            return Err(ProofFormatError::LengthMismatch {
                declared,
                actual: rest.len(),
            });
        }
        Ok(Self {
            signatures: rest
                .chunks_exact(SIGNATURE_LEN)
                .map(ArcBytes::from_bytes)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signature_list() {
        let mut bytes = vec![2u8];
        bytes.extend([7u8; SIGNATURE_LEN]);
        bytes.extend([9u8; SIGNATURE_LEN]);
        let proof = InputProof::from_bytes(&bytes).unwrap();
        assert_eq!(proof.signatures().len(), 2);
        assert_eq!(&proof.signatures()[1][..], &[9u8; SIGNATURE_LEN][..]);
        assert_eq!(proof.to_bytes(), bytes);
    }

    #[test]
    fn rejects_bad_lengths() {
        assert_eq!(InputProof::from_bytes(&[]), Err(ProofFormatError::Empty));
        assert_eq!(
            InputProof::from_bytes(&[1, 0, 0]),
            Err(ProofFormatError::LengthMismatch {
                declared: 1,
                actual: 2
            })
        );
        let mut trailing = vec![0u8];
        trailing.push(1);
        assert!(InputProof::from_bytes(&trailing).is_err());
        assert_eq!(
            InputProof::new(vec![ArcBytes::from_bytes(&[1, 2, 3])]),
            Err(ProofFormatError::SignatureLength(3))
        );
    }

    #[test]
    fn empty_signature_list_is_well_formed() {
        let proof = InputProof::from_bytes(&[0]).unwrap();
        assert!(proof.signatures().is_empty());
    }
}
