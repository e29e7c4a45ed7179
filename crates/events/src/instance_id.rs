// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Identity of a deployed counter: the chain it lives on and its address there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    chain_id: u64,
    address: Address,
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

impl InstanceId {
    pub fn new(chain_id: u64, address: Address) -> Self {
        Self { chain_id, address }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Address of the counter. The engine acts under this principal.
    pub fn address(&self) -> Address {
        self.address
    }
}
