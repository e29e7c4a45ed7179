// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::InstanceId;
use actix::Message;
use alloy_primitives::Address;
use fhc_fhe::OpKind;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use strum::IntoStaticStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
pub enum RejectionKind {
    MalformedCiphertext,
    InvalidProof,
    ArithmeticFailure,
    Storage,
}

impl Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

/// A submission was refused. The counter state is unchanged.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SubmissionRejected {
    pub instance: InstanceId,
    pub caller: Address,
    pub op: OpKind,
    pub reason: RejectionKind,
}

impl Display for SubmissionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "instance: {}, caller: {}, op: {}, reason: {}",
            self.instance, self.caller, self.op, self.reason
        )
    }
}
