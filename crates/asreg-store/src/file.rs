//! JSON file-backed ledger state.
//!
//! The whole state lives in one JSON object mapping ledger keys to values.
//! Values that are valid UTF-8 are stored as plain strings; anything else is
//! stored as `{"hex": "..."}`. Every commit rewrites the file through a
//! temporary file in the same directory and an atomic rename.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryKvStore;
use crate::traits::KvBackend;
use crate::transaction::WriteSet;

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Text(String),
    Binary { hex: String },
}

impl StoredValue {
    fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::Text(text.to_string()),
            Err(_) => Self::Binary {
                hex: hex::encode(bytes),
            },
        }
    }

    fn into_bytes(self) -> StoreResult<Vec<u8>> {
        match self {
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Binary { hex } => {
                hex::decode(hex).map_err(|e| StoreError::Serialization(e.to_string()))
            }
        }
    }
}

/// Ledger state persisted to a single JSON file.
///
/// Commits are serialised: the file image written by one `apply` always
/// contains every earlier commit.
pub struct FileKvStore {
    path: PathBuf,
    state: InMemoryKvStore,
    commit: Mutex<()>,
}

impl FileKvStore {
    /// Open the state file at `path`, starting empty if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read(&path)?;
            decode_state(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "state file absent, starting empty");
            BTreeMap::new()
        };
        Ok(Self {
            path,
            state: InMemoryKvStore::from_entries(entries),
            commit: Mutex::new(()),
        })
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A copy of the full committed state.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        self.state.snapshot()
    }

    fn persist(&self, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let encoded = encode_state(entries)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl KvBackend for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.state.get(key)
    }

    fn apply(&self, writes: &WriteSet) -> StoreResult<()> {
        let _commit = self.commit.lock().map_err(|_| StoreError::LockPoisoned)?;
        // Persist the post-commit image first so a failed write leaves both
        // the file and the in-memory view untouched.
        let staged = InMemoryKvStore::from_entries(self.state.snapshot()?);
        staged.apply(writes)?;
        self.persist(&staged.snapshot()?)?;
        self.state.apply(writes)
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.state.keys_with_prefix(prefix)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        self.state.contains(key)
    }
}

impl std::fmt::Debug for FileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKvStore")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish()
    }
}

fn encode_state(entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<Vec<u8>> {
    let stored: BTreeMap<&str, StoredValue> = entries
        .iter()
        .map(|(k, v)| (k.as_str(), StoredValue::from_bytes(v)))
        .collect();
    serde_json::to_vec_pretty(&stored).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_state(raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    let stored: BTreeMap<String, StoredValue> =
        serde_json::from_slice(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
    stored
        .into_iter()
        .map(|(k, v)| Ok((k, v.into_bytes()?)))
        .collect()
}
