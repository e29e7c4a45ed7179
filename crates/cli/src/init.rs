// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use crate::submit::settle;
use actix::Actor;
use alloy::primitives::Address;
use anyhow::Result;
use fhc_counter::CounterActor;
use fhc_events::{CounterEvent, EventBus};
use fhc_logger::SimpleLogger;
use fhc_utils::to_hex;
use serde_json::json;

pub async fn execute(ctx: &CounterContext, deployer: Address) -> Result<()> {
    let (counter, initialized) = ctx.open_or_initialize(deployer)?;
    let Some(event) = initialized else {
        println!(
            "Counter {} is already initialized at {}",
            counter.instance(),
            counter.current_handle()
        );
        return Ok(());
    };

    let output = json!({
        "instance": event.instance.to_string(),
        "handle": event.handle.to_string(),
        "deployer": event.deployer.to_string(),
        "ciphertext": to_hex(&event.ciphertext),
    });

    let bus = EventBus::<CounterEvent>::new().start();
    SimpleLogger::<CounterEvent>::attach("fhc", bus.clone());
    let history = EventBus::history(&bus);
    let grantees = counter.grantees(&event.handle)?.len();
    CounterActor::attach(counter, &bus, Some(event));
    settle(&history, 1 + grantees).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
