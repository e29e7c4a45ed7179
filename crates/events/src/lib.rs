// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod counter_event;
mod event_id;
mod eventbus;
mod instance_id;
mod traits;

pub use counter_event::*;
pub use event_id::*;
pub use eventbus::*;
pub use instance_id::*;
pub use traits::*;
