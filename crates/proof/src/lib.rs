// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Admission proofs for external ciphertexts.
//!
//! Correct-encryption proofs are checked off-chain by a committee of input verifiers. Each
//! verifier that accepts a ciphertext signs an attestation binding the ciphertext handle to the
//! submitting principal and the target counter instance. The engine only checks those
//! signatures, so a proof cannot be replayed by another principal or against another instance.

mod attestor;
mod context;
mod input_proof;
mod verifier;

pub use attestor::*;
pub use context::*;
pub use input_proof::*;
pub use verifier::*;
