//! Store configuration via `schooldesk.toml`
//!
//! On first open, a default `schooldesk.toml` is created in the store root.
//! To change settings, edit the file and reopen the store.

use schooldesk_core::{Error, Result};
use schooldesk_storage::WriteOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name placed in the store root.
pub const CONFIG_FILE_NAME: &str = schooldesk_storage::CONFIG_FILE;

/// Store configuration loaded from `schooldesk.toml`.
///
/// # Example
///
/// ```toml
/// # Write files through a temp file + rename (default: false)
/// atomic_writes = false
///
/// # Pretty-print JSON files (default: true)
/// pretty = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Write every file via write-fsync-rename instead of overwriting in place.
    ///
    /// Off by default: plain overwrites are the reference behavior, and a
    /// crash mid-write can leave a truncated file that later reads as empty.
    #[serde(default)]
    pub atomic_writes: bool,
    /// Pretty-print JSON with two-space indentation.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            atomic_writes: false,
            pretty: default_pretty(),
        }
    }
}

impl StoreConfig {
    /// File write options derived from this config.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            atomic: self.atomic_writes,
            pretty: self.pretty,
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# schooldesk local store configuration
#
# Write files through a uniquely named temp file and rename it over the
# target. Off by default: files are overwritten in place, and a crash
# mid-write can leave a truncated file that reads back as empty.
atomic_writes = false

# Pretty-print JSON files with two-space indentation.
pretty = true
"#
    }

    /// Load config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
