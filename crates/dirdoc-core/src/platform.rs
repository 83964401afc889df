//! Platform capabilities that change validation and copy behavior.

use serde::{Deserialize, Serialize};

/// Capabilities of the platform dirdoc runs on.
///
/// Built once at startup with [`Platform::current`] and passed to the
/// validator and the executor; tests construct explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Recursive merge copy of directory trees is available.
    pub merge_copy: bool,

    /// Windows file name rules apply (reserved characters, device names,
    /// no trailing dot or space).
    pub windows_names: bool,

    /// File names compare case-insensitively.
    pub case_insensitive_names: bool,
}

impl Platform {
    /// Capabilities of the host platform.
    pub fn current() -> Self {
        let windows = cfg!(windows);
        Self {
            merge_copy: !windows,
            windows_names: windows,
            case_insensitive_names: windows || cfg!(target_os = "macos"),
        }
    }

    /// Unix-like rules with case-sensitive names.
    pub fn posix() -> Self {
        Self {
            merge_copy: true,
            windows_names: false,
            case_insensitive_names: false,
        }
    }

    /// Windows rules.
    pub fn windows() -> Self {
        Self {
            merge_copy: false,
            windows_names: true,
            case_insensitive_names: true,
        }
    }

    /// Normalize a name for uniqueness comparisons.
    pub fn normalize_name(&self, name: &str) -> String {
        if self.case_insensitive_names {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}
