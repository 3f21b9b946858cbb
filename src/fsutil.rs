//! # Filesystem existence probes.
//!
//! All probes use [`std::fs::symlink_metadata`]: symbolic links are not
//! followed, so a link is reported as existing but neither a directory nor a
//! regular file. A path that cannot be inspected counts as absent.

use std::fs;
use std::path::Path;

/// Returns `true` if anything exists at `path` (including a dangling symlink).
pub fn path_exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns `true` if `path` is a directory.
pub fn dir_exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

/// Returns `true` if `path` is a regular file.
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_file())
}
