//! Store struct and open logic
//!
//! The `Store` is the process-wide handle to one store root. It is created
//! explicitly with `Store::open()` and passed (as `Arc<Store>`) to whatever
//! needs persistence; there is no global instance.
//!
//! ## Collections
//!
//! | Collection   | Strategy      | Files                                 |
//! |--------------|---------------|---------------------------------------|
//! | `games`      | BlobIndexed   | `_local_index.json`, `<id>.html`      |
//! | `assistants` | SharedMap     | `_generic.json` (`assistants` section) |
//! | `homework`   | SharedMap     | `_generic.json` (`homework` section)   |
//!
//! The hidden-id set lives in `_hidden.json`.

pub mod config;

pub use config::{StoreConfig, CONFIG_FILE_NAME};

use crate::collection::Collection;
use crate::primitives::{BlobIndexed, DocumentStorage, HiddenSet, SharedMap, StoreFiles};
use schooldesk_core::{CollectionKind, Result};
use schooldesk_storage::StorePaths;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Document counts reported by `Store::stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Documents in `games`
    pub games: usize,
    /// Documents in `assistants`
    pub assistants: usize,
    /// Documents in `homework`
    pub homework: usize,
    /// Ids in the hidden set
    pub hidden: usize,
}

/// Filesystem-backed document store
///
/// # Example
///
/// ```text
/// use schooldesk_engine::Store;
///
/// let store = Store::open("lib/Games")?;
/// let snap = store.collection("games")?.doc("pong")?.get();
/// if snap.exists() {
///     println!("{:?}", snap.data());
/// }
/// ```
pub struct Store {
    paths: StorePaths,
    config: StoreConfig,
    games: BlobIndexed,
    assistants: SharedMap,
    homework: SharedMap,
    hidden: HiddenSet,
}

impl Store {
    /// Open (or create) the store rooted at `path`
    ///
    /// Creates the root directory and a default `schooldesk.toml` if they
    /// are missing, then loads the config.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be created or the config cannot be parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let paths = StorePaths::new(path.as_ref());
        paths.ensure_root()?;

        let config_path = paths.config();
        StoreConfig::write_default_if_missing(&config_path)?;
        let cfg = StoreConfig::from_file(&config_path)?;

        Ok(Arc::new(Self::build(paths, cfg)))
    }

    /// Open the store with an explicit configuration
    ///
    /// The supplied config is written to `schooldesk.toml` so later
    /// `Store::open()` calls pick up the same settings.
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: StoreConfig) -> Result<Arc<Self>> {
        let paths = StorePaths::new(path.as_ref());
        paths.ensure_root()?;
        cfg.write_to_file(&paths.config())?;

        Ok(Arc::new(Self::build(paths, cfg)))
    }

    fn build(paths: StorePaths, config: StoreConfig) -> Self {
        info!(
            target: "schooldesk::store",
            root = %paths.root().display(),
            atomic_writes = config.atomic_writes,
            "Opened local document store"
        );

        let files = Arc::new(StoreFiles::new(paths.clone(), config.write_options()));
        Self {
            games: BlobIndexed::new(files.clone()),
            assistants: SharedMap::new(files.clone(), CollectionKind::Assistants),
            homework: SharedMap::new(files.clone(), CollectionKind::Homework),
            hidden: HiddenSet::new(files),
            paths,
            config,
        }
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Collection by name
    ///
    /// # Errors
    ///
    /// `UnsupportedCollection` for any name other than `games`,
    /// `assistants` or `homework`.
    pub fn collection(&self, name: &str) -> Result<Collection<'_>> {
        let kind: CollectionKind = name.parse()?;
        Ok(self.collection_kind(kind))
    }

    /// Collection by kind
    pub fn collection_kind(&self, kind: CollectionKind) -> Collection<'_> {
        Collection::new(kind, self.storage(kind))
    }

    /// The `games` collection
    pub fn games(&self) -> Collection<'_> {
        self.collection_kind(CollectionKind::Games)
    }

    /// The `assistants` collection
    pub fn assistants(&self) -> Collection<'_> {
        self.collection_kind(CollectionKind::Assistants)
    }

    /// The `homework` collection
    pub fn homework(&self) -> Collection<'_> {
        self.collection_kind(CollectionKind::Homework)
    }

    /// Hidden-id set
    pub fn hidden(&self) -> &HiddenSet {
        &self.hidden
    }

    /// Document counts per collection plus hidden ids
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            games: self.games.count(),
            assistants: self.assistants.count(),
            homework: self.homework.count(),
            hidden: self.hidden.ids().len(),
        }
    }

    fn storage(&self, kind: CollectionKind) -> &dyn DocumentStorage {
        match kind {
            CollectionKind::Games => &self.games,
            CollectionKind::Assistants => &self.assistants,
            CollectionKind::Homework => &self.homework,
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.paths.root())
            .field("config", &self.config)
            .finish()
    }
}
