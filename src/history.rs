//! Local prompt history: a bounded, newest-first collection of past
//! generations with debounced durable persistence.
//!
//! The collection itself ([`History`]) is pure and synchronous. The
//! [`HistoryStore`] wraps it with an injected [`HistoryStorage`] collaborator
//! and schedules writes: every mutation restarts a debounce timer, so a burst
//! of mutations produces a single write once the store has been quiet for the
//! whole window. Whatever the collection holds when the timer fires is what
//! gets written.

use crate::languages::Language;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Hard cap on stored entries; appending past it evicts the oldest.
pub const MAX_ENTRIES: usize = 50;

/// Quiet period a mutation burst must observe before a write goes out.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// One past generation. Immutable once created, except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub prompt: String,
    pub language: Language,
    pub code: String,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
}

impl HistoryEntry {
    /// Build an entry for a generation that just completed.
    pub fn new(prompt: String, language: Language, code: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt,
            language,
            code,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// In-memory history collection, newest entries at the front.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted document order (newest first). Anything past
    /// the cap is dropped.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            entries: entries.into_iter().take(MAX_ENTRIES).collect(),
        }
    }

    /// Prepend an entry, evicting from the tail past [`MAX_ENTRIES`].
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Remove the entry with the given id. Returns whether anything changed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries whose prompt contains `query` case-insensitively, order
    /// preserved. An empty query returns the whole collection.
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        if query.is_empty() {
            return self.entries.iter().cloned().collect();
        }
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.prompt.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Durable storage collaborator: one JSON document holding the serialized
/// entry array.
pub trait HistoryStorage: Send + Sync {
    /// Read the stored document, `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored document.
    fn write(&self, document: &str) -> Result<()>;

    /// Erase the stored document, if any.
    fn clear(&self) -> Result<()>;
}

/// [`HistoryStorage`] backed by a JSON file on disk.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read {}", self.path.display())),
        }
    }

    fn write(&self, document: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, document)
            .context(format!("Failed to write {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context(format!("Failed to remove {}", self.path.display())),
        }
    }
}

struct StoreState {
    history: History,
    /// Debounce timer for the next write; `None` means idle.
    pending: Option<JoinHandle<()>>,
}

/// Shared handle to the history collection plus its persistence scheduling.
///
/// All collection operations are synchronous; persistence is fire-and-forget
/// on the runtime. Clones share the same underlying state.
#[derive(Clone)]
pub struct HistoryStore {
    state: Arc<Mutex<StoreState>>,
    storage: Arc<dyn HistoryStorage>,
    debounce: Duration,
}

impl HistoryStore {
    /// Initialize from durable storage with the default debounce window.
    ///
    /// Unreadable or unparseable stored data is treated as "no history": the
    /// durable record is erased and an empty store returned. This never
    /// fails.
    pub fn load(storage: Arc<dyn HistoryStorage>) -> Self {
        Self::load_with_debounce(storage, DEBOUNCE_WINDOW)
    }

    pub fn load_with_debounce(storage: Arc<dyn HistoryStorage>, debounce: Duration) -> Self {
        let history = match storage.read() {
            Ok(Some(document)) => match serde_json::from_str::<Vec<HistoryEntry>>(&document) {
                Ok(entries) => History::from_entries(entries),
                Err(e) => {
                    warn!("Discarding corrupt history record: {}", e);
                    if let Err(e) = storage.clear() {
                        warn!("Failed to erase corrupt history record: {}", e);
                    }
                    History::new()
                }
            },
            Ok(None) => History::new(),
            Err(e) => {
                warn!("Failed to read history storage, starting empty: {}", e);
                History::new()
            }
        };

        debug!(entries = history.len(), "Loaded prompt history");

        Self {
            state: Arc::new(Mutex::new(StoreState {
                history,
                pending: None,
            })),
            storage,
            debounce,
        }
    }

    pub fn append(&self, entry: HistoryEntry) {
        let mut state = self.state.lock().unwrap();
        state.history.append(entry);
        self.schedule_persist(&mut state);
    }

    /// Remove an entry by id. A miss leaves the collection untouched and
    /// schedules nothing.
    pub fn remove_by_id(&self, id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        let removed = state.history.remove_by_id(id);
        if removed {
            self.schedule_persist(&mut state);
        }
        removed
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.history.clear();
        self.schedule_persist(&mut state);
    }

    /// Pure view; does not touch persistence.
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        self.state.lock().unwrap().history.search(query)
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.state.lock().unwrap().history.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().history.is_empty()
    }

    /// Force any pending write out immediately (e.g. on shutdown).
    pub fn flush(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(timer) = state.pending.take() {
                timer.abort();
            }
        }
        self.write_now();
    }

    /// Restart the debounce timer. The collection state is *not* captured
    /// here; the write serializes whatever is current when the timer fires.
    fn schedule_persist(&self, state: &mut StoreState) {
        if let Some(timer) = state.pending.take() {
            timer.abort();
        }
        // The window is measured from the mutation, not from when the spawned
        // task first gets polled.
        let deadline = tokio::time::Instant::now() + self.debounce;
        let store = self.clone();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            store.write_now();
        }));
    }

    /// Serialize the current collection and hand it to storage. Failures are
    /// logged and swallowed; persistence is advisory.
    fn write_now(&self) {
        let document = {
            let state = self.state.lock().unwrap();
            let entries: Vec<&HistoryEntry> = state.history.iter().collect();
            match serde_json::to_string(&entries) {
                Ok(document) => document,
                Err(e) => {
                    warn!("Failed to serialize history: {}", e);
                    return;
                }
            }
        };
        if let Err(e) = self.storage.write(&document) {
            warn!("Failed to persist history: {}", e);
        } else {
            debug!("Persisted prompt history");
        }
    }
}
