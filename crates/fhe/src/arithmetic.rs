// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextCodec, EncryptedU32};
use fhe::bfv::Ciphertext;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
};
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    Add,
    Subtract,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Add => write!(f, "add"),
            OpKind::Subtract => write!(f, "subtract"),
        }
    }
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Operands were encrypted under different parameters")]
    ParameterMismatch,
    #[error("Operand levels differ: {current} and {operand}")]
    LevelMismatch { current: usize, operand: usize },
    #[error("Operand polynomial counts differ: {current} and {operand}")]
    ShapeMismatch { current: usize, operand: usize },
    #[error("Ciphertext library fault: {0}")]
    Library(String),
}

/// Applies homomorphic addition and subtraction to encrypted u32 values.
///
/// With a plaintext modulus of 2^32 the results wrap exactly like `u32::wrapping_add` and
/// `u32::wrapping_sub`. No overflow is detected or corrected.
#[derive(Clone, Debug)]
pub struct HomomorphicUnit {
    codec: CiphertextCodec,
}

impl HomomorphicUnit {
    pub fn new(codec: CiphertextCodec) -> Self {
        Self { codec }
    }

    pub fn combine(
        &self,
        op: OpKind,
        current: &EncryptedU32,
        operand: &EncryptedU32,
    ) -> Result<EncryptedU32, ArithmeticError> {
        let params = self.codec.params();
        if current.params() != params || operand.params() != params {
            return Err(ArithmeticError::ParameterMismatch);
        }

        let (a, b) = (current.ciphertext(), operand.ciphertext());
        if a.level != b.level {
            return Err(ArithmeticError::LevelMismatch {
                current: a.level,
                operand: b.level,
            });
        }
        if a.c.len() != b.c.len() {
            return Err(ArithmeticError::ShapeMismatch {
                current: a.c.len(),
                operand: b.c.len(),
            });
        }

        let result: Ciphertext = catch_unwind(AssertUnwindSafe(|| match op {
            OpKind::Add => a + b,
            OpKind::Subtract => a - b,
        }))
        .map_err(|panic| ArithmeticError::Library(panic_message(panic)))?;

        Ok(self.codec.wrap(result))
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
