// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use anyhow::Result;
use fhc_utils::to_hex;
use serde_json::json;

pub fn execute(ctx: &CounterContext) -> Result<()> {
    let counter = ctx.open()?;
    let output = json!({
        "instance": counter.instance().to_string(),
        "handle": counter.current_handle().to_string(),
        "ciphertext": to_hex(&counter.read_current()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
