// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod access_granted;
mod counter_initialized;
mod counter_updated;
mod submission_rejected;

pub use access_granted::*;
pub use counter_initialized::*;
pub use counter_updated::*;
pub use submission_rejected::*;

use crate::{Event, EventId, InstanceId};
use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoStaticStr;

/// Macro to help define From traits for CounterEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for CounterEventData {
                fn from(data: $variant) -> Self {
                    CounterEventData::$variant(data)
                }
            }

            impl From<$variant> for CounterEvent {
                fn from(data: $variant) -> Self {
                    CounterEvent::new(data.into())
                }
            }
        )*
    };
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr)]
pub enum CounterEventData {
    CounterInitialized(CounterInitialized),
    CounterUpdated(CounterUpdated),
    AccessGranted(AccessGranted),
    SubmissionRejected(SubmissionRejected),
}

impl CounterEventData {
    pub fn instance(&self) -> InstanceId {
        match self {
            CounterEventData::CounterInitialized(data) => data.instance,
            CounterEventData::CounterUpdated(data) => data.instance,
            CounterEventData::AccessGranted(data) => data.instance,
            CounterEventData::SubmissionRejected(data) => data.instance,
        }
    }
}

impl fmt::Display for CounterEventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterEventData::CounterInitialized(data) => fmt::Display::fmt(data, f),
            CounterEventData::CounterUpdated(data) => fmt::Display::fmt(data, f),
            CounterEventData::AccessGranted(data) => fmt::Display::fmt(data, f),
            CounterEventData::SubmissionRejected(data) => fmt::Display::fmt(data, f),
        }
    }
}

/// Everything the counter publishes on its event channel
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct CounterEvent {
    id: EventId,
    data: CounterEventData,
}

impl CounterEvent {
    pub fn new(data: CounterEventData) -> Self {
        Self {
            id: EventId::hash(&data),
            data,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl Event for CounterEvent {
    type Id = EventId;
    type Data = CounterEventData;

    fn event_type(&self) -> String {
        let name: &'static str = (&self.data).into();
        name.to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.id.clone()
    }

    fn get_data(&self) -> &Self::Data {
        &self.data
    }
}

impl fmt::Display for CounterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.event_type(), self.data)
    }
}

impl_from_event!(
    CounterInitialized,
    CounterUpdated,
    AccessGranted,
    SubmissionRejected
);
