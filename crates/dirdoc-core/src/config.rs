//! User configuration.

use std::io;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Platform;

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct Config {
    /// Delete moves entries to the trash instead of unlinking them.
    #[builder(default = "true")]
    pub use_trash: bool,

    /// Parent directory for batch workspaces (None = system temp dir).
    #[builder(default)]
    pub batch_root: Option<PathBuf>,

    /// Offer "merge folders" when pasting copies over existing directories.
    #[builder(default = "true")]
    pub merge_copy: bool,

    /// Render dot files. Display only; never changes the cached listing.
    #[builder(default = "true")]
    pub show_hidden: bool,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[builder(default = "default_log_filter()")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(root)) = &self.batch_root {
            if root.as_os_str().is_empty() {
                return Err("Batch root cannot be empty".to_string());
            }
        }
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err("Log filter cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Create a new config builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Location of the user configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dirdoc").join("config.toml"))
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Platform capabilities with user opt-outs applied.
    pub fn platform(&self, base: Platform) -> Platform {
        Platform {
            merge_copy: base.merge_copy && self.merge_copy,
            ..base
        }
    }

    /// Directory under which batch workspaces are created.
    pub fn batch_root(&self) -> PathBuf {
        self.batch_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_trash: true,
            batch_root: None,
            merge_copy: true,
            show_hidden: true,
            log_filter: default_log_filter(),
        }
    }
}
