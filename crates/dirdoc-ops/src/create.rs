//! File and directory creation.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Create an empty file, failing if anything exists at `path`.
pub(crate) fn create_file(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(drop)
}

/// Create a single directory, failing if anything exists at `path`.
pub(crate) fn create_directory(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}
