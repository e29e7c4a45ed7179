// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::cli::SubmitArgs;
use crate::context::CounterContext;
use actix::{Actor, Addr};
use anyhow::Result;
use fhc_counter::{CounterActor, CounterError, Decrement, Increment, SubmitReceipt};
use fhc_events::{CounterEvent, EventBus, HistoryCollector, TakeEvents};
use fhc_fhe::OpKind;
use fhc_logger::SimpleLogger;
use fhc_utils::{parse_hex, to_hex, ArcBytes};
use serde_json::json;

/// Wait until `count` events went through the bus so the logger has seen them
pub async fn settle(history: &Addr<HistoryCollector<CounterEvent>>, count: usize) -> Result<()> {
    history.send(TakeEvents::new(count)).await?;
    Ok(())
}

pub async fn execute(ctx: &CounterContext, op: OpKind, args: SubmitArgs) -> Result<()> {
    let ciphertext = ArcBytes::from_bytes(&parse_hex(&args.ciphertext)?);
    let proof = ArcBytes::from_bytes(&parse_hex(&args.proof)?);
    let caller = args.caller;

    let bus = EventBus::<CounterEvent>::new().start();
    SimpleLogger::<CounterEvent>::attach("fhc", bus.clone());
    let history = EventBus::history(&bus);
    let addr = CounterActor::attach(ctx.open()?, &bus, None);

    let result: Result<SubmitReceipt, CounterError> = match op {
        OpKind::Add => {
            addr.send(Increment {
                ciphertext,
                proof,
                caller,
            })
            .await?
        }
        OpKind::Subtract => {
            addr.send(Decrement {
                ciphertext,
                proof,
                caller,
            })
            .await?
        }
    };

    match result {
        Ok(receipt) => {
            settle(&history, 1 + receipt.grantees.len()).await?;
            let output = json!({
                "instance": receipt.instance.to_string(),
                "op": receipt.op.to_string(),
                "version": receipt.version,
                "handle": receipt.handle.to_string(),
                "grantees": receipt.grantees.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
                "ciphertext": to_hex(&receipt.ciphertext),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            settle(&history, 1).await?;
            Err(err.into())
        }
    }
}
