// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::InstanceId;
use actix::Message;
use alloy_primitives::Address;
use fhc_fhe::CiphertextHandle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct AccessGranted {
    pub instance: InstanceId,
    pub handle: CiphertextHandle,
    pub principal: Address,
}

impl Display for AccessGranted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance: {}, handle: {}, principal: {}",
            self.instance, self.handle, self.principal
        )
    }
}
