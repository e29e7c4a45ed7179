// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::IntoKey;
use thiserror::Error as ThisError;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Insert(Vec<u8>, Vec<u8>);

impl Insert {
    pub fn new<K: IntoKey>(key: K, value: Vec<u8>) -> Self {
        Self(key.into_key(), value)
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }

    pub fn value(&self) -> &[u8] {
        &self.1
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Remove(Vec<u8>);

impl Remove {
    pub fn new<K: IntoKey>(key: K) -> Self {
        Self(key.into_key())
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }
}

/// Precondition on a key: the stored value must equal `value` (`None` meaning absent) when the
/// batch is applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expect(Vec<u8>, Option<Vec<u8>>);

impl Expect {
    pub fn new<K: IntoKey>(key: K, value: Option<Vec<u8>>) -> Self {
        Self(key.into_key(), value)
    }

    pub fn key(&self) -> &[u8] {
        &self.0
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.1.as_deref()
    }

    pub(crate) fn holds(&self, found: Option<&[u8]>) -> bool {
        found == self.value()
    }
}

/// Returned by [`crate::KeyValStore::apply`] when an [`Expect`] in the batch did not hold.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("Value at {key} changed since it was read")]
pub struct StaleValue {
    pub key: String,
}

impl StaleValue {
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }
}

/// A single op. Stores apply slices of these atomically, checking every `Expect` before any
/// mutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataOp {
    Insert(Insert),
    Remove(Remove),
    Expect(Expect),
}

impl From<Insert> for DataOp {
    fn from(value: Insert) -> Self {
        DataOp::Insert(value)
    }
}

impl From<Remove> for DataOp {
    fn from(value: Remove) -> Self {
        DataOp::Remove(value)
    }
}

impl From<Expect> for DataOp {
    fn from(value: Expect) -> Self {
        DataOp::Expect(value)
    }
}
