// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use fhc_events::InstanceId;

/// Root keys for everything persisted per counter instance
pub struct StoreKeys;

impl StoreKeys {
    /// The single ciphertext slot lives under `{counter}/current`
    pub fn counter(instance: &InstanceId) -> String {
        format!(
            "//counter/{}/{}",
            instance.chain_id(),
            instance.address()
        )
    }

    /// Grants live under `{acl}/{handle}/{principal}`
    pub fn acl(instance: &InstanceId) -> String {
        format!("//acl/{}/{}", instance.chain_id(), instance.address())
    }
}
