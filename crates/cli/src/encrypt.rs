// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use fhc_bfv_client::encrypt_u32;
use fhc_fhe::CiphertextCodec;
use fhc_proof::{InputAttestor, ProofContext};
use fhc_utils::to_hex;
use serde_json::json;
use std::str::FromStr;
use tracing::warn;
use zeroize::Zeroizing;

pub fn execute(
    ctx: &CounterContext,
    value: u32,
    caller: Address,
    attestor_key: Zeroizing<String>,
) -> Result<()> {
    let signer = PrivateKeySigner::from_str(&attestor_key).context("Invalid attestor key")?;
    let attestor_address = signer.address();
    if !ctx
        .config()
        .input_verifiers()
        .signers
        .contains(&attestor_address)
    {
        warn!(%attestor_address, "attestor is not a configured input verifier");
    }

    let raw = encrypt_u32(value, &ctx.public_key()?, ctx.params())?;
    let encrypted = CiphertextCodec::new(ctx.params().clone()).decode(&raw)?;
    let proof = InputAttestor::new(vec![signer])
        .attest(&encrypted, &ProofContext::new(caller, ctx.config().instance()))?;

    let output = json!({
        "handle": encrypted.handle().to_string(),
        "caller": caller.to_string(),
        "ciphertext": to_hex(&raw),
        "proof": to_hex(&proof.to_bytes()),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
