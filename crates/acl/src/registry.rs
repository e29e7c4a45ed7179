// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use anyhow::{Context, Result};
use fhc_data::{DataStore, WriteBatch};
use fhc_fhe::CiphertextHandle;
use std::{collections::BTreeSet, str::FromStr};
use tracing::{debug, warn};

const GRANTED: bool = true;

/// Append-only set of (ciphertext handle, principal) decryption grants for one counter instance.
///
/// Grants are never revoked and outlive the ciphertext being current. Each grant is a marker
/// stored at `{base}/{handle}/{principal}` so writing the same grant twice lands on the same key.
#[derive(Clone, Debug)]
pub struct AccessControlRegistry {
    store: DataStore,
}

impl AccessControlRegistry {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn grant_location(&self, handle: &CiphertextHandle, principal: &Address) -> DataStore {
        self.store
            .scope(handle.to_string())
            .scope(principal.to_string())
    }

    /// Record that `principal` may request decryption of `handle`. Commits immediately.
    pub fn grant(&self, handle: &CiphertextHandle, principal: &Address) -> Result<()> {
        let mut batch = WriteBatch::new();
        self.stage_grant(&mut batch, handle, principal)?;
        self.store
            .commit(batch)
            .with_context(|| format!("Could not grant {principal} on {handle}"))
    }

    /// Add the grant to `batch` so it commits together with other writes.
    pub fn stage_grant(
        &self,
        batch: &mut WriteBatch,
        handle: &CiphertextHandle,
        principal: &Address,
    ) -> Result<()> {
        debug!(%handle, %principal, "staging grant");
        self.grant_location(handle, principal)
            .stage_write(batch, &GRANTED)
    }

    pub fn is_granted(&self, handle: &CiphertextHandle, principal: &Address) -> Result<bool> {
        Ok(self
            .grant_location(handle, principal)
            .read::<bool>()?
            .unwrap_or(false))
    }

    /// Every principal granted on `handle`, sorted
    pub fn grantees(&self, handle: &CiphertextHandle) -> Result<Vec<Address>> {
        let mut principals = BTreeSet::new();
        for (key, granted) in self.store.scope(handle.to_string()).children::<bool>()? {
            if !granted {
                continue;
            }
            match Address::from_str(&key) {
                Ok(principal) => {
                    principals.insert(principal);
                }
                Err(err) => warn!(%handle, key = %key, "skipping unparseable grant key: {err}"),
            }
        }
        Ok(principals.into_iter().collect())
    }
}
