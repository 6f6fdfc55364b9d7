//! Persistent card record cache keyed by normalized card name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use deckscope_core::CardRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// On-disk format version.
pub const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default = "cache_version")]
    version: u32,
    #[serde(default)]
    cards: BTreeMap<String, CardRecord>,
}

fn cache_version() -> u32 {
    CACHE_VERSION
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            cards: BTreeMap::new(),
        }
    }
}

/// Card records remembered across runs, error records included.
///
/// Every [`set`](Self::set) rewrites the whole file while holding the lock,
/// so concurrent writers never interleave. Write failures are logged and
/// leave the in-memory state authoritative.
#[derive(Debug)]
pub struct CardCache {
    path: Option<PathBuf>,
    data: Mutex<CacheFile>,
}

impl CardCache {
    /// Loads the cache from `path`. A missing or unreadable file yields an
    /// empty cache.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|error| {
                warn!(path = %path.display(), %error, "card cache is corrupt, starting empty");
                CacheFile::default()
            }),
            Err(_) => CacheFile::default(),
        };
        debug!(path = %path.display(), cards = data.cards.len(), "card cache loaded");
        Self {
            path: Some(path),
            data: Mutex::new(data),
        }
    }

    /// A cache that never touches the filesystem.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(CacheFile::default()),
        }
    }

    /// Cache key for a card name: trimmed and lower-cased.
    #[must_use]
    pub fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, CacheFile> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<CardRecord> {
        self.lock().cards.get(&Self::key(name)).cloned()
    }

    /// Stores `record` and persists the whole cache.
    pub fn set(&self, name: &str, record: CardRecord) {
        let mut data = self.lock();
        data.cards.insert(Self::key(name), record);
        if let Err(error) = self.persist(&data) {
            warn!(%error, "failed to persist card cache");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().cards.is_empty()
    }

    /// Number of cached lookup failures.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.lock().cards.values().filter(|r| r.is_error()).count()
    }

    /// Drops every entry and persists the empty cache.
    pub fn clear(&self) -> Result<()> {
        let mut data = self.lock();
        data.cards.clear();
        self.persist(&data)
    }

    /// Drops cached lookup failures so they are fetched again; returns how
    /// many were removed.
    pub fn purge_errors(&self) -> Result<usize> {
        let mut data = self.lock();
        let before = data.cards.len();
        data.cards.retain(|_, record| !record.is_error());
        let removed = before - data.cards.len();
        self.persist(&data)?;
        Ok(removed)
    }

    fn persist(&self, data: &CacheFile) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec(data)?)?;
        Ok(())
    }
}
