// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::InstanceId;
use actix::Message;
use alloy_primitives::Address;
use derivative::Derivative;
use fhc_fhe::CiphertextHandle;
use fhc_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The counter slot was created as an encryption of zero.
#[derive(Derivative, Message, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
#[rtype(result = "()")]
pub struct CounterInitialized {
    pub instance: InstanceId,
    pub handle: CiphertextHandle,
    #[derivative(Debug(format_with = "fhc_utils::formatters::hexf"))]
    pub ciphertext: ArcBytes,
    pub deployer: Address,
}

impl Display for CounterInitialized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance: {}, handle: {}, deployer: {}",
            self.instance, self.handle, self.deployer
        )
    }
}
