// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identity of a ciphertext: keccak256 over its canonical wire encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CiphertextHandle(B256);

impl CiphertextHandle {
    pub fn of(canonical_bytes: &[u8]) -> Self {
        Self(keccak256(canonical_bytes))
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self.0)
    }
}

impl FromStr for CiphertextHandle {
    type Err = alloy_primitives::hex::FromHexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(B256::from_str(s)?))
    }
}
