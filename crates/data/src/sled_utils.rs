// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use sled::{Db, Tree};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;

// Global static cache
static SLED_CACHE: Lazy<Mutex<HashMap<String, Db>>> = Lazy::new(|| Mutex::new(HashMap::new()));

// Stable cache key for a path that may not exist yet.
fn canonical_key(path: &Path) -> String {
    if path.exists() {
        return path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .to_string_lossy()
            .into_owned();
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let base: PathBuf = parent
        .canonicalize()
        .unwrap_or_else(|_| parent.to_path_buf());
    let tail = path.file_name().map(|s| s.to_owned()).unwrap_or_default();
    base.join(tail).to_string_lossy().into_owned()
}

// Only one sled connection may be open per db file per process.
fn get_or_open_db(path: &Path) -> Result<Db> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Could not create database directory '{}'", path.display()))?;
    let key = canonical_key(path);
    let mut cache = SLED_CACHE
        .lock()
        .map_err(|_| anyhow!("sled connection cache poisoned"))?;
    if let Some(db) = cache.get(&key) {
        return Ok(db.clone());
    }
    let db = sled::open(path)
        .with_context(|| format!("Could not open database at path '{}'", path.display()))?;
    cache.insert(key, db.clone());
    if !db.was_recovered() {
        info!("created db at: {:?}", &path);
    } else {
        info!("recovered db at: {:?}", &path);
    }

    Ok(db)
}

pub(crate) fn get_or_open_db_tree(path: &Path, tree: &str) -> Result<Tree> {
    let db = get_or_open_db(path)?;
    db.open_tree(tree)
        .with_context(|| format!("Could not open tree '{tree}'"))
}
