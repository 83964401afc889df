//! Core types and traits for dirdoc.
//!
//! This crate provides the fundamental data structures shared by the
//! cache, operations and engine crates: directory entries and their
//! ordering, the error taxonomy, platform capabilities, file name
//! validation and configuration.

mod compare;
mod config;
mod entry;
mod error;
mod platform;
mod validate;

pub use compare::{compare_entries, sort_entries};
pub use config::{Config, ConfigBuilder, ConfigError};
pub use entry::{EntryKind, FileEntry, FileStats};
pub use error::{DirdocError, ErrorKind, Result};
pub use platform::Platform;
pub use validate::{NameError, NameValidator, MAX_NAME_LEN};
