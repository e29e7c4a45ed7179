// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DataStore, WriteBatch};
use anyhow::Result;
use std::{marker::PhantomData, ops::Deref};

/// Typed view of a single [`DataStore`] location
pub struct Repository<S> {
    store: DataStore,
    _p: PhantomData<S>,
}

impl<S> Repository<S> {
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            _p: PhantomData,
        }
    }
}

impl<S> Deref for Repository<S> {
    type Target = DataStore;
    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl<S> From<Repository<S>> for DataStore {
    fn from(value: Repository<S>) -> Self {
        value.store
    }
}

/// Clone without phantom data
impl<S> Clone for Repository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _p: PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: for<'de> serde::Deserialize<'de> + serde::Serialize,
{
    pub fn read(&self) -> Result<Option<T>> {
        self.store.read()
    }

    pub fn write(&self, value: &T) -> Result<()> {
        self.store.write(value)
    }

    pub fn stage(&self, batch: &mut WriteBatch, value: &T) -> Result<()> {
        self.store.stage_write(batch, value)
    }

    pub fn stage_expect(&self, batch: &mut WriteBatch, value: Option<&T>) -> Result<()> {
        self.store.stage_expect(batch, value)
    }
}

/// Root handle that crate specific factories hang their repositories off
#[derive(Clone, Debug)]
pub struct Repositories {
    pub store: DataStore,
}

impl Repositories {
    pub fn new(store: DataStore) -> Self {
        Repositories { store }
    }
}

impl From<DataStore> for Repositories {
    fn from(value: DataStore) -> Self {
        Repositories { store: value }
    }
}

impl From<&DataStore> for Repositories {
    fn from(value: &DataStore) -> Self {
        Repositories {
            store: value.clone(),
        }
    }
}
