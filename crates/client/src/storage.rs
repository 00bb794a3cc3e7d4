//! Durable client-local storage.
//!
//! The browser storefront kept two things in `localStorage`: the bearer
//! token and the recent-search list. This is the same idea as a versioned
//! JSON file with atomic writes (write-to-temp + rename), shared across all
//! components of one client via `Arc`.
//!
//! Reads come from the in-memory copy loaded at open; every mutating call
//! writes through synchronously. There is no transactional guarantee beyond
//! the atomicity of the rename.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of retained recent searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk envelope. Versioned for future migrations.
#[derive(Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,
    #[serde(default)]
    auth_token: Option<String>,
    #[serde(default)]
    recent_searches: Vec<String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            auth_token: None,
            recent_searches: Vec::new(),
        }
    }
}

impl std::fmt::Debug for StorageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageData")
            .field("version", &self.version)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("recent_searches", &self.recent_searches)
            .finish()
    }
}

/// File-backed client-local storage.
#[derive(Debug)]
pub struct LocalStorage {
    file_path: PathBuf,
    data: Mutex<StorageData>,
}

impl LocalStorage {
    /// Open storage at `path`, loading existing data if the file exists.
    ///
    /// A missing or corrupt file rehydrates as empty defaults: this is
    /// convenience state, not a system of record, so losing it must never
    /// take the client down.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file_path = path.into();
        let data = match std::fs::read_to_string(&file_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, path = %file_path.display(), "corrupt client state, starting empty");
                StorageData::default()
            }),
            Err(_) => StorageData::default(),
        };

        Self {
            file_path,
            data: Mutex::new(data),
        }
    }

    // =========================================================================
    // Auth token
    // =========================================================================

    /// The persisted bearer token, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<SecretString> {
        self.lock().auth_token.clone().map(SecretString::from)
    }

    /// Persist a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn set_auth_token(&self, token: impl Into<String>) -> Result<(), StorageError> {
        let mut data = self.lock();
        data.auth_token = Some(token.into());
        Self::save(&self.file_path, &data)
    }

    /// Remove the persisted bearer token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn clear_auth_token(&self) -> Result<(), StorageError> {
        let mut data = self.lock();
        data.auth_token = None;
        Self::save(&self.file_path, &data)
    }

    // =========================================================================
    // Recent searches
    // =========================================================================

    /// Current recent-search list, most-recent-first.
    #[must_use]
    pub fn recent_searches(&self) -> Vec<String> {
        self.lock().recent_searches.clone()
    }

    /// Record a submitted query at the front of the recent-search list.
    ///
    /// Deduplicates an existing equal entry and truncates to
    /// [`MAX_RECENT_SEARCHES`]. Blank queries are ignored. Returns the
    /// updated list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn push_recent_search(&self, query: &str) -> Result<Vec<String>, StorageError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.recent_searches());
        }

        let mut data = self.lock();
        data.recent_searches.retain(|existing| existing != query);
        data.recent_searches.insert(0, query.to_string());
        data.recent_searches.truncate(MAX_RECENT_SEARCHES);
        Self::save(&self.file_path, &data)?;
        Ok(data.recent_searches.clone())
    }

    /// Drop the whole recent-search list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn clear_recent_searches(&self) -> Result<(), StorageError> {
        let mut data = self.lock();
        data.recent_searches.clear();
        Self::save(&self.file_path, &data)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> std::sync::MutexGuard<'_, StorageData> {
        self.data.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Atomic write: serialize to a sibling temp file, then rename over the
    /// target so a crash mid-write never leaves a torn file.
    fn save(path: &Path, data: &StorageData) -> Result<(), StorageError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(data)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serialized)?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
