// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, Address, U256};
use alloy::sol_types::SolValue;
use fhc_events::InstanceId;
use fhc_fhe::CiphertextHandle;
use serde::{Deserialize, Serialize};

/// Who is submitting and where. Proofs are only valid for the exact context they were made for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofContext {
    pub principal: Address,
    pub instance: InstanceId,
}

impl ProofContext {
    pub fn new(principal: Address, instance: InstanceId) -> Self {
        Self {
            principal,
            instance,
        }
    }

    /// Compute the digest an input verifier signs for the given ciphertext.
    ///
    /// `keccak256(abi.encodePacked(handle, principal, instanceAddress, chainId))`
    pub fn digest(&self, handle: &CiphertextHandle) -> [u8; 32] {
        let encoded = (
            handle.as_b256(),
            self.principal,
            self.instance.address(),
            U256::from(self.instance.chain_id()),
        )
            .abi_encode_packed();

        keccak256(&encoded).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ProofContext {
        ProofContext::new(
            Address::repeat_byte(0x11),
            InstanceId::new(31337, Address::repeat_byte(0x22)),
        )
    }

    #[test]
    fn digest_binds_every_field() {
        let handle = CiphertextHandle::of(b"ciphertext");
        let base = context().digest(&handle);

        let other_principal = ProofContext {
            principal: Address::repeat_byte(0x33),
            ..context()
        };
        let other_address = ProofContext {
            instance: InstanceId::new(31337, Address::repeat_byte(0x44)),
            ..context()
        };
        let other_chain = ProofContext {
            instance: InstanceId::new(1, Address::repeat_byte(0x22)),
            ..context()
        };

        assert_eq!(base, context().digest(&handle));
        assert_ne!(base, context().digest(&CiphertextHandle::of(b"other")));
        assert_ne!(base, other_principal.digest(&handle));
        assert_ne!(base, other_address.digest(&handle));
        assert_ne!(base, other_chain.digest(&handle));
    }

    #[test]
    fn digest_matches_packed_layout() {
        let handle = CiphertextHandle::of(b"ciphertext");
        let ctx = context();
        let mut packed = Vec::with_capacity(32 + 20 + 20 + 32);
        packed.extend_from_slice(handle.as_bytes());
        packed.extend_from_slice(ctx.principal.as_slice());
        packed.extend_from_slice(ctx.instance.address().as_slice());
        packed.extend_from_slice(&U256::from(31337u64).to_be_bytes::<32>());
        assert_eq!(ctx.digest(&handle), <[u8; 32]>::from(keccak256(&packed)));
    }
}
