//! Store directory layout
//!
//! ```text
//! <root>/
//!   schooldesk.toml       store configuration
//!   _local_index.json     games index: id -> metadata
//!   <id>.html             one payload file per game
//!   _generic.json         { "assistants": {..}, "homework": {..} }
//!   _hidden.json          [ "id", .. ]
//! ```

use std::path::{Path, PathBuf};

/// Games index file name
pub const GAMES_INDEX_FILE: &str = "_local_index.json";
/// Shared map file name (assistants and homework)
pub const SHARED_MAP_FILE: &str = "_generic.json";
/// Hidden-id set file name
pub const HIDDEN_FILE: &str = "_hidden.json";
/// Configuration file name
pub const CONFIG_FILE: &str = "schooldesk.toml";
/// Extension of game payload files
pub const PAYLOAD_EXTENSION: &str = "html";

/// Resolves every file the store touches under one root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if it does not exist
    pub fn ensure_root(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }

    /// `<root>/_local_index.json`
    pub fn games_index(&self) -> PathBuf {
        self.root.join(GAMES_INDEX_FILE)
    }

    /// `<root>/_generic.json`
    pub fn shared_map(&self) -> PathBuf {
        self.root.join(SHARED_MAP_FILE)
    }

    /// `<root>/_hidden.json`
    pub fn hidden(&self) -> PathBuf {
        self.root.join(HIDDEN_FILE)
    }

    /// `<root>/schooldesk.toml`
    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `<root>/<id>.html`
    ///
    /// The id must already have passed `validate_id`.
    pub fn payload(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, PAYLOAD_EXTENSION))
    }
}
