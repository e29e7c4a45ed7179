// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::AccessControlRegistry;
use fhc_config::StoreKeys;
use fhc_data::Repositories;
use fhc_events::InstanceId;

pub trait AclRepositoryFactory {
    fn acl(&self, instance: &InstanceId) -> AccessControlRegistry;
}

impl AclRepositoryFactory for Repositories {
    fn acl(&self, instance: &InstanceId) -> AccessControlRegistry {
        AccessControlRegistry::new(self.store.base(StoreKeys::acl(instance)))
    }
}
