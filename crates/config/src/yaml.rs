// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Read a yaml file and substitute `$VAR` / `${VAR}` from the environment
pub fn load_yaml_with_env(file_path: &Path) -> Result<String> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    Ok(shellexpand::env(&content)?.to_string())
}
