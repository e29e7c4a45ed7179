// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DataOp, KeyValStore, StaleValue};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock};

type Db = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory backend. With `capture` on, every applied op is appended to a log that tests can
/// inspect.
pub struct InMemStore {
    db: RwLock<Db>,
    log: Mutex<Vec<DataOp>>,
    capture: bool,
}

impl InMemStore {
    pub fn new(capture: bool) -> Self {
        Self {
            db: RwLock::new(BTreeMap::new()),
            log: Mutex::new(vec![]),
            capture,
        }
    }

    pub fn get_log(&self) -> Result<Vec<DataOp>> {
        let log = self.log.lock().map_err(|_| anyhow!("InMemStore log poisoned"))?;
        Ok(log.clone())
    }

    pub fn get_dump(&self) -> Result<Vec<u8>> {
        let db = self.db.read().map_err(|_| anyhow!("InMemStore poisoned"))?;
        bincode::serialize(&*db).context("Error serializing BTreeMap")
    }

    pub fn from_dump(db: Vec<u8>, capture: bool) -> Result<Self> {
        let db: Db = bincode::deserialize(&db).context("Error deserializing BTreeMap")?;
        Ok(Self {
            db: RwLock::new(db),
            log: Mutex::new(vec![]),
            capture,
        })
    }
}

impl Default for InMemStore {
    fn default() -> Self {
        Self::new(false)
    }
}

impl KeyValStore for InMemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let db = self.db.read().map_err(|_| anyhow!("InMemStore poisoned"))?;
        Ok(db.get(key).cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let db = self.db.read().map_err(|_| anyhow!("InMemStore poisoned"))?;
        Ok(db
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn apply(&self, ops: &[DataOp]) -> Result<()> {
        // Expectations and mutations run under one write lock.
        let mut db = self.db.write().map_err(|_| anyhow!("InMemStore poisoned"))?;
        for op in ops {
            if let DataOp::Expect(expect) = op {
                if !expect.holds(db.get(expect.key()).map(Vec::as_slice)) {
                    return Err(StaleValue::new(expect.key()).into());
                }
            }
        }
        for op in ops {
            match op {
                DataOp::Insert(insert) => {
                    db.insert(insert.key().to_vec(), insert.value().to_vec());
                }
                DataOp::Remove(remove) => {
                    db.remove(remove.key());
                }
                DataOp::Expect(_) => {}
            }
        }
        if self.capture {
            let mut log = self.log.lock().map_err(|_| anyhow!("InMemStore log poisoned"))?;
            log.extend_from_slice(ops);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Expect, Insert, Remove};

    #[test]
    fn scan_prefix_is_bounded_and_ordered() -> Result<()> {
        let store = InMemStore::new(false);
        store.insert(Insert::new("//acl/b", vec![2]))?;
        store.insert(Insert::new("//acl/a", vec![1]))?;
        store.insert(Insert::new("//acm", vec![3]))?;
        store.insert(Insert::new("//ac", vec![4]))?;

        let found = store.scan_prefix(b"//acl/")?;
        assert_eq!(
            found,
            vec![
                (b"//acl/a".to_vec(), vec![1]),
                (b"//acl/b".to_vec(), vec![2])
            ]
        );
        Ok(())
    }

    #[test]
    fn capture_records_applied_ops() -> Result<()> {
        let store = InMemStore::new(true);
        store.apply(&[
            Insert::new("a", vec![1]).into(),
            Insert::new("b", vec![2]).into(),
        ])?;
        store.remove(Remove::new("a"))?;

        assert_eq!(store.get(b"a")?, None);
        assert_eq!(store.get(b"b")?, Some(vec![2]));
        assert_eq!(store.get_log()?.len(), 3);
        Ok(())
    }

    #[test]
    fn failed_expectation_drops_the_whole_batch() -> Result<()> {
        let store = InMemStore::new(true);
        store.insert(Insert::new("slot", vec![1]))?;

        let err = store
            .apply(&[
                Insert::new("grant", vec![1]).into(),
                Insert::new("slot", vec![3]).into(),
                Expect::new("slot", Some(vec![2])).into(),
            ])
            .unwrap_err();
        assert_eq!(err.downcast_ref::<StaleValue>(), Some(&StaleValue::new(b"slot")));
        assert_eq!(store.get(b"slot")?, Some(vec![1]));
        assert_eq!(store.get(b"grant")?, None);
        assert_eq!(store.get_log()?.len(), 1);

        store.apply(&[
            Expect::new("slot", Some(vec![1])).into(),
            Expect::new("fresh", None).into(),
            Insert::new("slot", vec![3]).into(),
        ])?;
        assert_eq!(store.get(b"slot")?, Some(vec![3]));
        Ok(())
    }

    #[test]
    fn dump_restores_contents() -> Result<()> {
        let store = InMemStore::new(false);
        store.insert(Insert::new("key", vec![9, 9]))?;
        let restored = InMemStore::from_dump(store.get_dump()?, false)?;
        assert_eq!(restored.get(b"key")?, Some(vec![9, 9]));
        Ok(())
    }
}
