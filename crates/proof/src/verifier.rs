// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{InputProof, ProofContext};
use alloy::primitives::{Address, Signature};
use fhc_fhe::EncryptedU32;
use std::collections::BTreeSet;
use thiserror::Error as ThisError;
use tracing::debug;

/// Decides whether an external ciphertext was honestly constructed for a given context.
///
/// Implementations never fail: anything malformed or mismatched is simply `false`.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, ciphertext: &EncryptedU32, proof: &[u8], context: &ProofContext) -> bool;
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum VerifierConfigError {
    #[error("At least one input verifier must be configured")]
    NoSigners,
    #[error("Threshold must be between 1 and {signers}, got {threshold}")]
    Threshold { threshold: usize, signers: usize },
}

/// Accepts a ciphertext once `threshold` distinct trusted input verifiers have signed its context
/// digest.
#[derive(Clone, Debug)]
pub struct SignedInputVerifier {
    signers: BTreeSet<Address>,
    threshold: usize,
}

impl SignedInputVerifier {
    pub fn new(
        signers: impl IntoIterator<Item = Address>,
        threshold: usize,
    ) -> Result<Self, VerifierConfigError> {
        let signers: BTreeSet<Address> = signers.into_iter().collect();
        if signers.is_empty() {
            return Err(VerifierConfigError::NoSigners);
        }
        if threshold == 0 || threshold > signers.len() {
            return Err(VerifierConfigError::Threshold {
                threshold,
                signers: signers.len(),
            });
        }
        Ok(Self { signers, threshold })
    }

    fn count_trusted(&self, proof: &InputProof, digest: &[u8; 32]) -> usize {
        let mut seen = BTreeSet::new();
        for raw in proof.signatures() {
            let Ok(sig) = Signature::try_from(&raw[..]) else {
                debug!("skipping unparseable signature");
                continue;
            };
            let Ok(signer) = sig.recover_address_from_msg(digest) else {
                debug!("skipping unrecoverable signature");
                continue;
            };
            if self.signers.contains(&signer) {
                seen.insert(signer);
            } else {
                debug!(%signer, "signature from untrusted signer");
            }
        }
        seen.len()
    }
}

impl ProofVerifier for SignedInputVerifier {
    fn verify(&self, ciphertext: &EncryptedU32, proof: &[u8], context: &ProofContext) -> bool {
        let proof = match InputProof::from_bytes(proof) {
            Ok(proof) => proof,
            Err(e) => {
                debug!("malformed input proof: {e}");
                return false;
            }
        };

        let digest = context.digest(&ciphertext.handle());
        let trusted = self.count_trusted(&proof, &digest);
        debug!(
            handle = %ciphertext.handle(),
            principal = %context.principal,
            trusted,
            threshold = self.threshold,
            "checked input proof"
        );
        trusted >= self.threshold
    }
}

impl<T: ProofVerifier + ?Sized> ProofVerifier for std::sync::Arc<T> {
    fn verify(&self, ciphertext: &EncryptedU32, proof: &[u8], context: &ProofContext) -> bool {
        (**self).verify(ciphertext, proof, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{context, encrypted, signer};
    use crate::InputAttestor;
    use fhc_events::InstanceId;
    use fhc_utils::ArcBytes;

    #[test]
    fn rejects_bad_configuration() {
        assert_eq!(
            SignedInputVerifier::new(vec![], 1).unwrap_err(),
            VerifierConfigError::NoSigners
        );
        assert!(SignedInputVerifier::new(vec![signer(1).address()], 0).is_err());
        assert!(SignedInputVerifier::new(vec![signer(1).address()], 2).is_err());
        // duplicates collapse before the threshold check
        assert!(
            SignedInputVerifier::new(vec![signer(1).address(), signer(1).address()], 2).is_err()
        );
    }

    #[test]
    fn accepts_proof_for_exact_context() {
        let verifier = SignedInputVerifier::new(vec![signer(1).address()], 1).unwrap();
        let attestor = InputAttestor::new(vec![signer(1)]);
        let ct = encrypted();
        let ctx = context();
        let proof = attestor.attest(&ct, &ctx).unwrap().to_bytes();
        assert!(verifier.verify(&ct, &proof, &ctx));
    }

    #[test]
    fn rejects_replay_across_principal_and_instance() {
        let verifier = SignedInputVerifier::new(vec![signer(1).address()], 1).unwrap();
        let attestor = InputAttestor::new(vec![signer(1)]);
        let ct = encrypted();
        let ctx = context();
        let proof = attestor.attest(&ct, &ctx).unwrap().to_bytes();

        let other_principal = ProofContext::new(Address::repeat_byte(0xbb), ctx.instance);
        let other_instance = ProofContext::new(
            ctx.principal,
            InstanceId::new(ctx.instance.chain_id(), Address::repeat_byte(0xcc)),
        );
        let other_chain = ProofContext::new(
            ctx.principal,
            InstanceId::new(ctx.instance.chain_id() + 1, ctx.instance.address()),
        );
        assert!(!verifier.verify(&ct, &proof, &other_principal));
        assert!(!verifier.verify(&ct, &proof, &other_instance));
        assert!(!verifier.verify(&ct, &proof, &other_chain));
        assert!(!verifier.verify(&encrypted(), &proof, &ctx));
    }

    #[test]
    fn rejects_untrusted_and_malformed_proofs() {
        let verifier = SignedInputVerifier::new(vec![signer(1).address()], 1).unwrap();
        let ct = encrypted();
        let ctx = context();

        let untrusted = InputAttestor::new(vec![signer(2)])
            .attest(&ct, &ctx)
            .unwrap()
            .to_bytes();
        assert!(!verifier.verify(&ct, &untrusted, &ctx));

        assert!(!verifier.verify(&ct, &[], &ctx));
        assert!(!verifier.verify(&ct, &[0], &ctx));
        assert!(!verifier.verify(&ct, &[1, 2, 3], &ctx));

        let junk = InputProof::new(vec![ArcBytes::from_bytes(&[0xffu8; 65])])
            .unwrap()
            .to_bytes();
        assert!(!verifier.verify(&ct, &junk, &ctx));
    }

    #[test]
    fn threshold_counts_distinct_signers() {
        let verifier =
            SignedInputVerifier::new(vec![signer(1).address(), signer(2).address()], 2).unwrap();
        let ct = encrypted();
        let ctx = context();

        let one = InputAttestor::new(vec![signer(1)]).attest(&ct, &ctx).unwrap();
        let doubled = InputProof::new(
            one.signatures()
                .iter()
                .chain(one.signatures())
                .cloned()
                .collect(),
        )
        .unwrap();
        assert!(!verifier.verify(&ct, &doubled.to_bytes(), &ctx));

        let both = InputAttestor::new(vec![signer(1), signer(2)])
            .attest(&ct, &ctx)
            .unwrap();
        assert!(verifier.verify(&ct, &both.to_bytes(), &ctx));
    }
}
