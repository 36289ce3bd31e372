//! Durable tier of the page cache.
//!
//! Pages are kept as individual JSON files so that a single write never
//! rewrites the rest of the archive.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//!   article-cache/             # namespace
//!     files/                   # object store
//!       3f2a9c01b7de.json      # one entry per cache key
//!       9e01c4d2aa50.json
//! ```
//!
//! File names are the first 12 hex characters of the SHA-256 of the key;
//! the key itself is stored inside the file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{Error, Page, Result};

/// Namespace directory holding the cache.
pub const NAMESPACE: &str = "article-cache";
/// Object store directory inside the namespace.
pub const OBJECT_STORE: &str = "files";

/// A page as persisted in the durable tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPage {
    /// Cache key (resolved page URL).
    pub key: String,
    /// When the entry was written.
    pub stored_at: DateTime<Utc>,
    /// Decoded page content.
    pub page: Page,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredPageRef<'a> {
    key: &'a str,
    stored_at: DateTime<Utc>,
    page: &'a Page,
}

/// Directory-backed key/value store for pages.
///
/// ## Thread Safety
///
/// Writes for the same key are last-write-wins. Operations are not
/// coordinated across processes.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store under `root`. Nothing is touched on disk until the first write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of this store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `<root>/article-cache/files`.
    fn files_dir(&self) -> PathBuf {
        self.root.join(NAMESPACE).join(OBJECT_STORE)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.files_dir().join(format!("{}.json", entry_name(key)))
    }

    /// Write a page under `key`, replacing any previous entry.
    ///
    /// Uses atomic write (temp file + rename) so a crash never leaves a
    /// half-written entry behind.
    pub fn put(&self, key: &str, page: &Page) -> Result<()> {
        let files_dir = self.files_dir();
        fs::create_dir_all(&files_dir)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {e}")))?;

        let entry = StoredPageRef {
            key,
            stored_at: Utc::now(),
            page,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| Error::Storage(format!("Failed to serialize page {key}: {e}")))?;

        let path = self.entry_path(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| Error::Storage(format!("Failed to write temp cache file: {e}")))?;

        // Handle Windows: remove target before rename
        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| Error::Storage(format!("Failed to remove cache entry: {e}")))?;
        }

        fs::rename(&tmp_path, &path)
            .map_err(|e| Error::Storage(format!("Failed to commit cache entry: {e}")))?;

        debug!("Stored page {} in durable cache", key);
        Ok(())
    }

    /// Read the entry stored under `key`.
    ///
    /// An entry file holding a different key (a file name collision) counts as absent.
    pub fn get(&self, key: &str) -> Result<Option<StoredPage>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let stored = read_entry(&path)?;
        if stored.key != key {
            debug!("Cache file {} holds {}, not {}", path.display(), stored.key, key);
            return Ok(None);
        }
        Ok(Some(stored))
    }

    /// Read every entry in the store.
    ///
    /// Entries that cannot be read or decoded are skipped with a warning so
    /// that one damaged file does not hide the rest of the cache.
    pub fn load_all(&self) -> Result<Vec<StoredPage>> {
        let files_dir = self.files_dir();
        if !files_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&files_dir)
            .map_err(|e| Error::Storage(format!("Failed to read cache directory: {e}")))?;

        let mut pages = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::Storage(format!("Failed to read directory entry: {e}")))?;
            let path = entry.path();

            // Skip non-JSON files and temp files
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match read_entry(&path) {
                Ok(stored) => pages.push(stored),
                Err(e) => warn!("Skipping cache entry {}: {}", path.display(), e),
            }
        }

        Ok(pages)
    }

    /// Number of entries without decoding them.
    pub fn len(&self) -> Result<usize> {
        let files_dir = self.files_dir();
        if !files_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&files_dir)
            .map_err(|e| Error::Storage(format!("Failed to read cache directory: {e}")))?;

        let count = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext == "json")
            })
            .count();

        Ok(count)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<()> {
        let files_dir = self.files_dir();
        if files_dir.exists() {
            fs::remove_dir_all(&files_dir)
                .map_err(|e| Error::Storage(format!("Failed to clear cache directory: {e}")))?;
            debug!("Cleared durable cache at {}", files_dir.display());
        }
        Ok(())
    }
}

fn read_entry(path: &Path) -> Result<StoredPage> {
    let json = fs::read_to_string(path)
        .map_err(|e| Error::Storage(format!("Failed to read cache file: {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Storage(format!("Failed to parse cache file: {e}")))
}

fn entry_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest.iter().take(6).fold(String::new(), |mut acc, b| {
        // write! to String is infallible
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
