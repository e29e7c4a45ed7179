// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::context::CounterContext;
use alloy::primitives::Address;
use anyhow::Result;
use fhc_acl::AclRepositoryFactory;
use fhc_fhe::CiphertextHandle;

pub fn list(ctx: &CounterContext, handle: &CiphertextHandle) -> Result<()> {
    let acl = ctx.repositories().acl(&ctx.config().instance());
    for principal in acl.grantees(handle)? {
        println!("{principal}");
    }
    Ok(())
}

pub fn is_granted(
    ctx: &CounterContext,
    handle: &CiphertextHandle,
    principal: &Address,
) -> Result<()> {
    let acl = ctx.repositories().acl(&ctx.config().instance());
    println!("{}", acl.is_granted(handle, principal)?);
    Ok(())
}
