// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DataOp, Insert, Remove};
use anyhow::Result;

/// Backend for [`crate::DataStore`].
///
/// `apply` must be all-or-nothing: either every op in the slice is durable or none is. Every
/// [`crate::Expect`] is checked under the same write lock as the mutations; if one fails the
/// batch is dropped and a [`crate::StaleValue`] error is returned.
pub trait KeyValStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    fn apply(&self, ops: &[DataOp]) -> Result<()>;

    fn insert(&self, msg: Insert) -> Result<()> {
        self.apply(&[msg.into()])
    }

    fn remove(&self, msg: Remove) -> Result<()> {
        self.apply(&[msg.into()])
    }
}
