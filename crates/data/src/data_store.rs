// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DataOp, Expect, InMemStore, Insert, IntoKey, KeyValStore, Remove, SledStore};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Writes collected from any number of scopes, committed as one unit by [`DataStore::commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<DataOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Scoped handle over a key/value backend.
/// DataStore is scopable and cheap to clone.
#[derive(Clone)]
pub struct DataStore {
    scope: Vec<u8>,
    store: Arc<dyn KeyValStore>,
}

impl fmt::Debug for DataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataStore")
            .field("scope", &String::from_utf8_lossy(&self.scope))
            .finish()
    }
}

impl DataStore {
    pub fn new(store: Arc<dyn KeyValStore>) -> Self {
        Self {
            scope: vec![],
            store,
        }
    }

    pub fn in_mem() -> Self {
        Self::new(Arc::new(InMemStore::new(false)))
    }

    /// Read data at the scope location
    pub fn read<T>(&self) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(bytes) = self.store.get(&self.scope)? else {
            return Ok(None);
        };

        let value = bincode::deserialize(&bytes)
            .with_context(|| format!("Could not deserialize value at {}", self.get_scope()))?;
        Ok(Some(value))
    }

    /// Writes data to the scope location immediately
    pub fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        let mut batch = WriteBatch::new();
        self.stage_write(&mut batch, value)?;
        self.commit(batch)
    }

    /// Adds a write of `value` at the scope location to `batch` without touching the backend
    pub fn stage_write<T: Serialize>(&self, batch: &mut WriteBatch, value: &T) -> Result<()> {
        let serialized = bincode::serialize(value)
            .with_context(|| anyhow!("Could not serialize value passed to {}", self.get_scope()))?;
        batch.ops.push(Insert::new(&self.scope[..], serialized).into());
        Ok(())
    }

    /// Makes `batch` conditional on the scope location still holding `value` (or nothing, for
    /// `None`) when it is committed
    pub fn stage_expect<T: Serialize>(
        &self,
        batch: &mut WriteBatch,
        value: Option<&T>,
    ) -> Result<()> {
        let serialized = value.map(bincode::serialize).transpose().with_context(|| {
            anyhow!("Could not serialize expected value at {}", self.get_scope())
        })?;
        batch.ops.push(Expect::new(&self.scope[..], serialized).into());
        Ok(())
    }

    /// Removes data from the scope location
    pub fn clear(&self) -> Result<()> {
        self.store.remove(Remove::new(&self.scope[..]))
    }

    /// Applies every staged write atomically
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        self.store.apply(&batch.ops)
    }

    /// Direct children of the scope: returns the key segment after the scope and the decoded value
    /// for every entry below it.
    pub fn children<T>(&self) -> Result<Vec<(String, T)>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut prefix = self.scope.clone();
        if !prefix.ends_with(b"/") {
            prefix.push(b'/');
        }
        self.store
            .scan_prefix(&prefix)?
            .into_iter()
            .map(|(key, bytes)| {
                let tail = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
                let value = bincode::deserialize(&bytes)
                    .with_context(|| format!("Could not deserialize value at {}", tail))?;
                Ok((tail, value))
            })
            .collect()
    }

    /// Get the scope as a string
    pub fn get_scope(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.scope)
    }

    /// Changes the scope for the data store.
    /// Note that if the scope does not start with a slash one is appended.
    /// ```
    /// use fhc_data::DataStore;
    ///
    /// let store = DataStore::in_mem();
    /// assert_eq!(store.base("//foo")
    ///   .scope("bar")
    ///   .scope("/baz")
    ///   .get_scope(), "//foo/bar/baz");
    /// ```
    pub fn scope<K: IntoKey>(&self, key: K) -> Self {
        let mut scope = self.scope.clone();
        let encoded_key = key.into_key();
        if !encoded_key.starts_with(b"/") {
            scope.push(b'/');
        }
        scope.extend(encoded_key);
        Self {
            store: self.store.clone(),
            scope,
        }
    }

    /// Same backend, absolute scope
    pub fn base<K: IntoKey>(&self, key: K) -> Self {
        Self {
            store: self.store.clone(),
            scope: key.into_key(),
        }
    }
}

impl From<Arc<InMemStore>> for DataStore {
    fn from(store: Arc<InMemStore>) -> Self {
        Self::new(store)
    }
}

impl From<Arc<SledStore>> for DataStore {
    fn from(store: Arc<SledStore>) -> Self {
        Self::new(store)
    }
}
