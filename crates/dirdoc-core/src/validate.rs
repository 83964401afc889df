//! File name validation.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::Platform;

/// Longest accepted file name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

const WINDOWS_INVALID_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\0'];
const UNIX_INVALID_CHARS: &[char] = &['\\', '/', '\0'];

static WINDOWS_DEVICE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(con|prn|aux|clock\$|nul|lpt[0-9]|com[0-9])(\..*)?$")
        .expect("device name pattern is valid")
});

/// Why a name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("There are only whitespace characters in the name")]
    Blank,
    #[error("The name contains invalid characters")]
    InvalidCharacters,
    #[error("Invalid file name on Windows")]
    ReservedDeviceName,
    #[error("Reserved file name")]
    Reserved,
    #[error("The name cannot end with a \".\" on Windows")]
    TrailingDot,
    #[error("The name cannot end with a whitespace on Windows")]
    TrailingWhitespace,
    #[error("The name is too long (max {MAX_NAME_LEN} bytes)")]
    TooLong,
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Leading or trailing whitespace detected in file or folder name")]
    SurroundingWhitespace,
}

/// Checks candidate names against platform rules and a set of names that
/// already exist in the target directory.
#[derive(Debug, Clone)]
pub struct NameValidator {
    platform: Platform,
    existing: HashSet<String>,
}

impl NameValidator {
    /// Create a validator for the given platform and existing names.
    pub fn new<I, S>(platform: Platform, existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let existing = existing
            .into_iter()
            .map(|name| platform.normalize_name(name.as_ref()))
            .collect();
        Self { platform, existing }
    }

    /// The platform rules in effect.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Validate a single name.
    pub fn validate(&self, name: &str) -> Result<(), NameError> {
        if name.trim().is_empty() {
            return Err(NameError::Blank);
        }

        let invalid = if self.platform.windows_names {
            WINDOWS_INVALID_CHARS
        } else {
            UNIX_INVALID_CHARS
        };
        if name.contains(invalid) {
            return Err(NameError::InvalidCharacters);
        }

        if self.platform.windows_names && WINDOWS_DEVICE_NAME.is_match(name) {
            return Err(NameError::ReservedDeviceName);
        }

        if name == "." || name == ".." {
            return Err(NameError::Reserved);
        }

        if self.platform.windows_names {
            if name.ends_with('.') {
                return Err(NameError::TrailingDot);
            }
            if name.len() != name.trim_end().len() {
                return Err(NameError::TrailingWhitespace);
            }
        }

        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong);
        }

        if self.existing.contains(&self.platform.normalize_name(name)) {
            return Err(NameError::AlreadyExists(name.to_string()));
        }

        if name.trim() != name {
            return Err(NameError::SurroundingWhitespace);
        }

        Ok(())
    }
}
