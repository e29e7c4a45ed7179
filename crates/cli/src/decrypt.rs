// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use anyhow::{Context, Result};
use fhc_bfv_client::decrypt_u32;
use fhc_utils::parse_hex;
use std::{fs, path::Path};
use zeroize::Zeroizing;

pub fn execute(ctx: &CounterContext, secret_key: &Path, ciphertext: Option<&str>) -> Result<()> {
    let sk = Zeroizing::new(
        fs::read(secret_key)
            .with_context(|| format!("Could not read secret key at {:?}", secret_key))?,
    );
    let ciphertext = match ciphertext {
        Some(hex) => parse_hex(hex)?,
        None => ctx.open()?.read_current().extract_bytes(),
    };
    let value = decrypt_u32(&sk, &ciphertext, ctx.params())?;
    println!("{value}");
    Ok(())
}
