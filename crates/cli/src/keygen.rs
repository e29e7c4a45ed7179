// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use fhc_bfv_client::generate_keys;
use fhc_fhe::CounterPreset;
use std::{fs, path::Path};
use tracing::warn;

pub const SECRET_KEY_FILE: &str = "sk.bin";
pub const PUBLIC_KEY_FILE: &str = "pk.bin";

pub fn execute(out: &Path, preset: CounterPreset) -> Result<()> {
    if !preset.metadata().production_ready {
        warn!("{preset} is insecure and only meant for testing");
    }
    let params = preset.build_arc()?;
    let keys = generate_keys(&params)?;

    fs::create_dir_all(out).with_context(|| format!("Could not create {:?}", out))?;
    let sk_path = out.join(SECRET_KEY_FILE);
    let pk_path = out.join(PUBLIC_KEY_FILE);
    fs::write(&sk_path, &*keys.secret_key)
        .with_context(|| format!("Could not write secret key to {:?}", sk_path))?;
    fs::write(&pk_path, &keys.public_key)
        .with_context(|| format!("Could not write public key to {:?}", pk_path))?;

    println!("Generated {} keys", preset);
    println!("  secret key: {}", sk_path.display());
    println!("  public key: {}", pk_path.display());
    Ok(())
}
