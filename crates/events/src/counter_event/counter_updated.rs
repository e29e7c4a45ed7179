// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::InstanceId;
use actix::Message;
use alloy_primitives::Address;
use derivative::Derivative;
use fhc_fhe::{CiphertextHandle, OpKind};
use fhc_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A submission was admitted and the counter now holds a new ciphertext.
#[derive(Derivative, Message, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
#[rtype(result = "()")]
pub struct CounterUpdated {
    pub instance: InstanceId,
    pub version: u64,
    pub op: OpKind,
    pub handle: CiphertextHandle,
    #[derivative(Debug(format_with = "fhc_utils::formatters::hexf"))]
    pub ciphertext: ArcBytes,
    pub caller: Address,
}

impl Display for CounterUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance: {}, version: {}, op: {}, handle: {}, caller: {}",
            self.instance, self.version, self.op, self.handle, self.caller
        )
    }
}
