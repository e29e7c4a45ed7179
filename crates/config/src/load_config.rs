// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk up from `path` looking for `filename`
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    path.ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// Decide which config file to load.
///
/// An explicit file wins (relative to `cwd` if not absolute), then the nearest file named
/// `default_filename` above `cwd`, then the OS config dir.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> PathBuf {
    match cli_file {
        Some(file) if file.is_absolute() => file.to_path_buf(),
        Some(file) => clean(cwd.join(file)),
        None => find_in_parent(cwd, default_filename)
            .unwrap_or_else(|| clean(default_config_dir.join(default_filename))),
    }
}
