//! # Draft Persistence
//!
//! Remembers the editor text across sessions. The store is a tiny key/value
//! contract; runpad only ever uses one key ([`DRAFT_KEY`]).
//!
//! `FileDraftStore` keeps a JSON object in `~/.runpad/drafts.json`:
//!
//! ```text
//! {
//!   "code": { "value": "print(1)", "saved_at": "2026-10-16T09:12:44Z" }
//! }
//! ```
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Key the draft text is stored under.
pub const DRAFT_KEY: &str = "code";

/// Shown on first launch, before anything has been submitted.
pub const DEFAULT_DRAFT: &str = r#"# Python program to display the Fibonacci sequence

def recur_fibo(n):
   if n <= 1:
       return n
   else:
       return(recur_fibo(n-1) + recur_fibo(n-2))

nterms = 30

# check if the number of terms is valid
if nterms <= 0:
   print("Plese enter a positive integer")
else:
   print("Fibonacci sequence:")
   for i in range(nterms):
       print(recur_fibo(i))"#;

pub trait DraftStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Returns the stored draft, or [`DEFAULT_DRAFT`] when nothing was saved yet.
pub fn load_initial_draft(store: &dyn DraftStore) -> String {
    match store.get(DRAFT_KEY) {
        Some(text) => {
            debug!("Restored draft ({} bytes)", text.len());
            text
        }
        None => {
            info!("No saved draft, using the default program");
            DEFAULT_DRAFT.to_string()
        }
    }
}

// ============================================================================
// File store
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone)]
struct DraftEntry {
    value: String,
    saved_at: DateTime<Utc>,
}

pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns `~/.runpad/drafts.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".runpad").join("drafts.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the entry for `key` was last written.
    pub fn saved_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.read_entries().remove(key).map(|e| e.saved_at)
    }

    fn read_entries(&self) -> HashMap<String, DraftEntry> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                warn!("Failed to read drafts from {}: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("Ignoring corrupt draft file {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

impl DraftStore for FileDraftStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key).map(|e| e.value)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut entries = self.read_entries();
        entries.insert(
            key.to_string(),
            DraftEntry {
                value: value.to_string(),
                saved_at: Utc::now(),
            },
        );
        atomic_write_json(&self.path, &entries)?;
        debug!("Draft '{}' saved to {}", key, self.path.display());
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, for tests and `--run` without a home directory.
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
