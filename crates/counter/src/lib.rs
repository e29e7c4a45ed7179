// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The encrypted counter engine.
//!
//! [`EncryptedCounter`] owns the single live ciphertext of one counter instance and drives every
//! submission through decode, proof verification, homomorphic arithmetic and grant-on-write.
//! [`CounterActor`] serializes access to it and publishes the outcome on the event bus.

mod actor;
mod counter;
mod error;
mod repo;

pub use actor::*;
pub use counter::*;
pub use error::*;
pub use repo::*;
