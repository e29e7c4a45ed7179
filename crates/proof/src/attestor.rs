// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{InputProof, ProofContext};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use anyhow::{anyhow, Result};
use fhc_fhe::{CiphertextHandle, EncryptedU32};
use fhc_utils::ArcBytes;

/// Signing side of the input verifier committee.
///
/// Each wrapped key signs the context digest as an EIP-191 personal message. Used by dev tooling
/// and tests; a production verifier only signs after checking the encryption proof itself.
pub struct InputAttestor {
    signers: Vec<PrivateKeySigner>,
}

impl InputAttestor {
    pub fn new(signers: Vec<PrivateKeySigner>) -> Self {
        Self { signers }
    }

    pub fn attest(&self, ciphertext: &EncryptedU32, context: &ProofContext) -> Result<InputProof> {
        self.attest_handle(&ciphertext.handle(), context)
    }

    pub fn attest_handle(
        &self,
        handle: &CiphertextHandle,
        context: &ProofContext,
    ) -> Result<InputProof> {
        let digest = context.digest(handle);
        let signatures = self
            .signers
            .iter()
            .map(|signer| {
                signer
                    .sign_message_sync(&digest)
                    .map(|sig| ArcBytes::from_bytes(&sig.as_bytes()))
                    .map_err(|e| anyhow!("Failed to sign input attestation: {e}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(InputProof::new(signatures)?)
    }
}
