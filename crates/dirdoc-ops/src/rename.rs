//! Rename (move) operation.

use std::fs;
use std::io;
use std::path::Path;

use crate::copy;
use crate::paths::{already_exists, exists, remove_entry, same_entry};

/// Rename `source` to `destination`.
///
/// An occupied destination is replaced only when `overwrite` is set. A
/// destination that is the same filesystem object as the source (a case-only
/// rename on a case-insensitive volume) is never treated as a conflict.
pub(crate) fn rename(source: &Path, destination: &Path, overwrite: bool) -> io::Result<()> {
    if source == destination {
        return Ok(());
    }

    if exists(destination) && !same_entry(source, destination) {
        if !overwrite {
            return Err(already_exists(destination));
        }
        remove_entry(destination)?;
    }

    match fs::rename(source, destination) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => move_across_devices(source, destination),
        result => result,
    }
}

/// Fall back to copy + delete for cross-filesystem moves.
fn move_across_devices(source: &Path, destination: &Path) -> io::Result<()> {
    copy::copy(source, destination, false, false)?;
    remove_entry(source)
}
