// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use fhc_config::StoreKeys;
use fhc_data::{Repositories, Repository};
use fhc_events::InstanceId;
use fhc_utils::ArcBytes;

pub trait CounterRepositoryFactory {
    /// The single CounterState slot of an instance, holding the canonical ciphertext bytes
    fn counter(&self, instance: &InstanceId) -> Repository<ArcBytes>;
}

impl CounterRepositoryFactory for Repositories {
    fn counter(&self, instance: &InstanceId) -> Repository<ArcBytes> {
        Repository::new(self.store.base(StoreKeys::counter(instance)).scope("current"))
    }
}
