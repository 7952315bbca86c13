//! Card index: which cubes contain a given card.
//!
//! The compiler only depends on the [`CardIndex`] trait. This module also
//! provides [`InMemoryCardIndex`] and [`CardIndexStore`], which persists an
//! in-memory index as JSON at an XDG data path
//! (`~/.local/share/cubefilter/card_index.json` on Linux).
//!
//! The store offers synchronous `load()`/`save()` and
//! asynchronous `load_async()`/`save_async()` variants.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::future::Future;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default card index filename.
const CARD_INDEX_FILENAME: &str = "card_index.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "cubefilter";

/// Errors that can occur while reading or writing the card index.
#[derive(Debug, Error)]
pub enum CardIndexError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read card index '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write card index '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for card index operations.
pub type Result<T> = std::result::Result<T, CardIndexError>;

/// Source of "which cubes contain this card" answers.
///
/// A card that is not indexed is not an error: implementations return an
/// empty set. Errors are reserved for failures of the index itself.
pub trait CardIndex {
    /// Returns the ids of every cube containing `card_name`.
    fn find_cubes_containing_card(
        &self,
        card_name: &str,
    ) -> impl Future<Output = Result<BTreeSet<String>>> + Send;
}

/// Normalizes a card name for indexing: trimmed and lowercased.
pub fn normalize_card_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A card index held in memory.
///
/// Card names are matched case-insensitively.
///
/// # Example
///
/// ```
/// use cube_filter::card_index::InMemoryCardIndex;
///
/// let mut index = InMemoryCardIndex::new();
/// index.insert("Murder", "123");
/// index.insert("murder", "456");
///
/// let cubes = index.cubes_for("MURDER").unwrap();
/// assert_eq!(cubes.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryCardIndex {
    #[serde(default)]
    cards: BTreeMap<String, BTreeSet<String>>,
}

impl InMemoryCardIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a card and the cubes containing it.
    pub fn with_card<I, S>(mut self, card_name: &str, cube_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for cube_id in cube_ids {
            self.insert(card_name, cube_id);
        }
        self
    }

    /// Records that `cube_id` contains `card_name`.
    ///
    /// Returns false if the pair was already present.
    pub fn insert(&mut self, card_name: &str, cube_id: impl Into<String>) -> bool {
        self.cards
            .entry(normalize_card_name(card_name))
            .or_default()
            .insert(cube_id.into())
    }

    /// Removes one cube from a card's entry. Drops the card when its last
    /// cube is removed.
    ///
    /// Returns false if the pair was not present.
    pub fn remove(&mut self, card_name: &str, cube_id: &str) -> bool {
        let key = normalize_card_name(card_name);
        let Some(cubes) = self.cards.get_mut(&key) else {
            return false;
        };
        let removed = cubes.remove(cube_id);
        if cubes.is_empty() {
            self.cards.remove(&key);
        }
        removed
    }

    /// Removes a card entirely, returning the cubes it was recorded in.
    pub fn remove_card(&mut self, card_name: &str) -> Option<BTreeSet<String>> {
        self.cards.remove(&normalize_card_name(card_name))
    }

    /// Returns the cubes recorded for a card, if any.
    pub fn cubes_for(&self, card_name: &str) -> Option<&BTreeSet<String>> {
        self.cards.get(&normalize_card_name(card_name))
    }

    /// Iterates over `(card name, cube ids)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.cards.iter().map(|(name, cubes)| (name.as_str(), cubes))
    }

    /// Returns the number of indexed cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if no cards are indexed.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Re-keys entries by normalized name, merging duplicates and dropping
    /// empty entries. Needed after deserializing a hand-edited file.
    fn normalize(&mut self) {
        let cards = std::mem::take(&mut self.cards);
        for (name, cubes) in cards {
            if cubes.is_empty() {
                continue;
            }
            self.cards
                .entry(normalize_card_name(&name))
                .or_default()
                .extend(cubes);
        }
    }
}

impl CardIndex for InMemoryCardIndex {
    async fn find_cubes_containing_card(&self, card_name: &str) -> Result<BTreeSet<String>> {
        Ok(self.cubes_for(card_name).cloned().unwrap_or_default())
    }
}

/// Persistent storage for the card index.
///
/// The index is written as pretty-printed JSON:
///
/// ```json
/// { "cards": { "murder": ["123", "456"] } }
/// ```
///
/// # Example
///
/// ```no_run
/// use cube_filter::card_index::CardIndexStore;
///
/// let store = CardIndexStore::new()?;
/// let mut index = store.load_or_default()?;
/// index.insert("Murder", "5d2cb3f44153591614458e5d");
/// store.save(&index)?;
/// # Ok::<(), cube_filter::card_index::CardIndexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CardIndexStore {
    path: PathBuf,
}

impl CardIndexStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `CardIndexError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    /// Creates a store with a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default path for the card index file.
    ///
    /// # Errors
    ///
    /// Returns `CardIndexError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(CardIndexError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(CARD_INDEX_FILENAME))
    }

    /// Returns the path to the card index file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns true if the card index file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the index from disk.
    ///
    /// # Errors
    ///
    /// - Returns `CardIndexError::ReadError` if the file cannot be read
    ///   (including when it does not exist).
    /// - Returns `CardIndexError::Json` if the file contains invalid JSON.
    pub fn load(&self) -> Result<InMemoryCardIndex> {
        let contents = fs::read_to_string(&self.path).map_err(|e| CardIndexError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        self.parse(&contents)
    }

    /// Loads the index from disk, returning an empty index if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`load()`](Self::load), except that a missing file is not an error.
    pub fn load_or_default(&self) -> Result<InMemoryCardIndex> {
        match self.load() {
            Ok(index) => Ok(index),
            Err(CardIndexError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                log::debug!("no card index at {}, using empty index", self.path.display());
                Ok(InMemoryCardIndex::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the index to disk atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// - Returns `CardIndexError::CreateDirError` if the directory cannot be created.
    /// - Returns `CardIndexError::WriteError` if the file cannot be written.
    pub fn save(&self, index: &InMemoryCardIndex) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CardIndexError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(index)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| CardIndexError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| CardIndexError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        log::debug!(
            "saved card index with {} cards to {}",
            index.len(),
            self.path.display()
        );
        Ok(())
    }

    // =========================================================================
    // Async I/O Methods
    // =========================================================================

    /// Loads the index from disk asynchronously.
    ///
    /// # Errors
    ///
    /// Same as [`load()`](Self::load).
    pub async fn load_async(&self) -> Result<InMemoryCardIndex> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CardIndexError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
        self.parse(&contents)
    }

    /// Loads the index asynchronously, returning an empty index if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Same as [`load_or_default()`](Self::load_or_default).
    pub async fn load_or_default_async(&self) -> Result<InMemoryCardIndex> {
        match self.load_async().await {
            Ok(index) => Ok(index),
            Err(CardIndexError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                log::debug!("no card index at {}, using empty index", self.path.display());
                Ok(InMemoryCardIndex::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the index to disk asynchronously using atomic write.
    ///
    /// # Errors
    ///
    /// Same as [`save()`](Self::save).
    pub async fn save_async(&self, index: &InMemoryCardIndex) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CardIndexError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(index)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| CardIndexError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| CardIndexError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        log::debug!(
            "saved card index with {} cards to {}",
            index.len(),
            self.path.display()
        );
        Ok(())
    }

    fn parse(&self, contents: &str) -> Result<InMemoryCardIndex> {
        let mut index: InMemoryCardIndex = serde_json::from_str(contents)?;
        index.normalize();
        log::debug!(
            "loaded card index with {} cards from {}",
            index.len(),
            self.path.display()
        );
        Ok(index)
    }
}

/// Reads the index file on every lookup, so only `card:` clauses touch disk.
impl CardIndex for CardIndexStore {
    async fn find_cubes_containing_card(&self, card_name: &str) -> Result<BTreeSet<String>> {
        let index = self.load_or_default_async().await?;
        index.find_cubes_containing_card(card_name).await
    }
}
