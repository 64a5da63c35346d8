//! # Session Persistence
//!
//! Remember which files were open across restarts, in
//! `~/.scribe/session.json`:
//!
//! ```json
//! {
//!   "entries": [
//!     { "path": "/home/me/proj/main.rs", "cursor": { "line": 12, "column": 4 } }
//!   ],
//!   "active_index": 0,
//!   "saved_at": 1760000000
//! }
//! ```
//!
//! Untitled buffers are never persisted. Reading fails soft: a missing or
//! corrupt file is an empty snapshot. Writes use atomic rename (write
//! `.tmp`, then `rename()`) so a crash mid-write leaves the old file intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::buffer::{BufferId, Cursor};
use crate::core::language::LanguageTable;
use crate::core::store::BufferStore;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub cursor: Cursor,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub entries: Vec<SessionEntry>,
    /// Position of the active tab within `entries`.
    #[serde(default)]
    pub active_index: Option<usize>,
    /// Unix timestamp of the write.
    #[serde(default)]
    pub saved_at: i64,
}

impl SessionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Project the store onto a snapshot. Only buffers with a path are kept.
pub fn snapshot(store: &BufferStore) -> SessionSnapshot {
    let active = store.active_id();
    let mut active_index = None;
    let mut entries = Vec::new();
    for buffer in store.buffers() {
        let Some(path) = buffer.path() else {
            continue;
        };
        if Some(buffer.id()) == active {
            active_index = Some(entries.len());
        }
        entries.push(SessionEntry {
            path: path.to_path_buf(),
            cursor: buffer.cursor(),
        });
    }
    SessionSnapshot {
        entries,
        active_index,
        saved_at: Utc::now().timestamp(),
    }
}

/// Result of rebuilding a store from a snapshot.
pub struct RestoredSession {
    pub store: BufferStore,
    /// One line per entry that could not be reopened.
    pub warnings: Vec<String>,
}

/// Recreate buffers in snapshot order. Entries that fail to load are
/// skipped and reported; the store always ends up with an active buffer.
pub fn restore_store(snapshot: &SessionSnapshot, languages: Arc<LanguageTable>) -> RestoredSession {
    let mut store = BufferStore::empty(languages);
    let mut warnings = Vec::new();
    // Snapshot index -> restored id, for picking the active tab
    let mut restored: Vec<Option<BufferId>> = Vec::with_capacity(snapshot.entries.len());

    for entry in &snapshot.entries {
        if let Some(existing) = store.find_by_path(&entry.path) {
            debug!("Skipping duplicate session entry {}", entry.path.display());
            restored.push(Some(existing));
            continue;
        }
        match store.create(Some(&entry.path)) {
            Ok(id) => {
                if let Some(buffer) = store.get_mut(id) {
                    buffer.set_cursor(entry.cursor);
                }
                restored.push(Some(id));
            }
            Err(e) => {
                warn!("Skipping session entry: {}", e);
                warnings.push(e.to_string());
                restored.push(None);
            }
        }
    }

    let preferred = snapshot
        .active_index
        .and_then(|i| restored.get(i).copied().flatten());
    match preferred {
        Some(id) => {
            store.set_active(id, None);
        }
        None => {
            store.ensure_active();
        }
    }

    info!(
        "Restored {} of {} session entries",
        restored.iter().flatten().count(),
        snapshot.entries.len()
    );
    RestoredSession { store, warnings }
}

/// The snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.scribe/session.json`, if there is a home directory.
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".scribe").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. Never fails: problems are logged and yield an
    /// empty snapshot.
    pub fn read(&self) -> SessionSnapshot {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return SessionSnapshot::default();
            }
            Err(e) => {
                warn!("Failed to read session {}: {}", self.path.display(), e);
                return SessionSnapshot::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring corrupt session {}: {}", self.path.display(), e);
                SessionSnapshot::default()
            }
        }
    }

    pub fn write(&self, snapshot: &SessionSnapshot) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write_json(&self.path, snapshot)?;
        debug!(
            "Session saved to {} ({} entries)",
            self.path.display(),
            snapshot.entries.len()
        );
        Ok(())
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
