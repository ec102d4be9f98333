//! Cross-platform filesystem metadata helpers for the CLI.
//!
//! On Unix the permission bits come from the file itself. Elsewhere there is no
//! POSIX mode to read, so every file gets the default `644`.

use std::fs::Metadata;
use std::time::UNIX_EPOCH;

#[cfg(unix)]
/// Octal permission string (e.g. `"755"`) from the file's POSIX mode bits.
pub fn mode_string(meta: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:o}", meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
/// Non-Unix platforms: POSIX permission bits are not available.
pub fn mode_string(_meta: &Metadata) -> String {
    crate::record::DEFAULT_MODE.to_string()
}

/// Modification time in seconds since the epoch, or 0 when unavailable.
pub fn mtime_secs(meta: &Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}
