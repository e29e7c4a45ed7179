// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use std::fmt::Display;
use std::hash::Hash;

/// Trait that must be implemented by events used with EventBus
pub trait Event:
    Message<Result = ()> + Clone + Display + Send + Sync + Unpin + Sized + 'static
{
    type Id: Hash + Eq + Clone + Unpin + Send + Sync + Display;

    /// Payload for the Event
    type Data;

    fn event_type(&self) -> String;
    fn event_id(&self) -> Self::Id;
    fn get_data(&self) -> &Self::Data;
}
