// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::sled_utils::get_or_open_db_tree;
use crate::{DataOp, KeyValStore, StaleValue};
use anyhow::{Context, Result};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionResult};
use sled::Tree;
use std::path::Path;
use tracing::info;

/// Sled backed store. Batches run as one sled transaction and are flushed before returning.
pub struct SledStore {
    db: Tree,
}

impl SledStore {
    pub fn new(path: &Path, tree: &str) -> Result<Self> {
        info!("Starting SledStore with {:?}", path);
        let db = get_or_open_db_tree(path, tree)?;
        Ok(Self { db })
    }
}

impl KeyValStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let res = self
            .db
            .get(key)
            .with_context(|| format!("Failed to fetch {}", String::from_utf8_lossy(key)))?;
        Ok(res.map(|v| v.to_vec()))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.db
            .scan_prefix(prefix)
            .map(|entry| {
                let (k, v) = entry.context("Failed to scan db")?;
                Ok((k.to_vec(), v.to_vec()))
            })
            .collect()
    }

    fn apply(&self, ops: &[DataOp]) -> Result<()> {
        let outcome: TransactionResult<(), StaleValue> = self.db.transaction(|tx| {
            for op in ops {
                if let DataOp::Expect(expect) = op {
                    if !expect.holds(tx.get(expect.key())?.as_deref()) {
                        return Err(ConflictableTransactionError::Abort(StaleValue::new(
                            expect.key(),
                        )));
                    }
                }
            }
            for op in ops {
                match op {
                    DataOp::Insert(insert) => {
                        tx.insert(insert.key(), insert.value())?;
                    }
                    DataOp::Remove(remove) => {
                        tx.remove(remove.key())?;
                    }
                    DataOp::Expect(_) => {}
                }
            }
            Ok(())
        });

        match outcome {
            Ok(()) => {}
            Err(TransactionError::Abort(stale)) => return Err(stale.into()),
            Err(TransactionError::Storage(err)) => {
                return Err(err).context("Could not apply batch to db");
            }
        }
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }
}
