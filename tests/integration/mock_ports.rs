//! Mock port adapters for integration tests.
//!
//! Records every media call so tests can assert on the full call history,
//! and provides a collection whose every operation fails.

use cardbridge::adapters::log_sink::RecordingSink;
use cardbridge::adapters::memory_store::MemoryCollection;
use cardbridge::adapters::strings::StringTable;
use cardbridge::app::ports::{CollectionPort, MediaError, MediaPort, StoreError};
use cardbridge::app::service::Backend;
use cardbridge::notes::{Note, NoteId, Notetype, NotetypeId, NotetypeKind};
use cardbridge::rpc::messages::OpChanges;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ── Media call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    ReadExternal(String),
    AddFile(String),
    ReadFile(String),
}

// ── MockMedia ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockMedia {
    external: Mutex<HashMap<String, Vec<u8>>>,
    folder: Mutex<HashMap<String, Vec<u8>>>,
    pub calls: Mutex<Vec<MediaCall>>,
}

#[allow(dead_code)]
impl MockMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external(self, path: &str, data: &[u8]) -> Self {
        self.external
            .lock()
            .unwrap()
            .insert(path.to_string(), data.to_vec());
        self
    }

    pub fn remove_from_folder(&self, name: &str) {
        self.folder.lock().unwrap().remove(name);
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn added(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MediaCall::AddFile(_)))
            .count()
    }
}

impl MediaPort for MockMedia {
    fn read_external(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::ReadExternal(path.to_string()));
        self.external
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn add_file(&self, desired_name: &str, data: &[u8]) -> Result<String, MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::AddFile(desired_name.to_string()));
        self.folder
            .lock()
            .unwrap()
            .insert(desired_name.to_string(), data.to_vec());
        Ok(desired_name.to_string())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::ReadFile(name.to_string()));
        self.folder
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(name.to_string()))
    }
}

// ── BrokenCollection ──────────────────────────────────────────

/// Collection whose storage is unusable.
pub struct BrokenCollection;

impl CollectionPort for BrokenCollection {
    fn get_notetype(&self, _id: NotetypeId) -> Result<Option<Notetype>, StoreError> {
        Err(StoreError::Corrupted)
    }

    fn find_notetype_by_kind(&self, _kind: NotetypeKind) -> Result<Option<Notetype>, StoreError> {
        Err(StoreError::Corrupted)
    }

    fn add_notetype(&self, _notetype: Notetype) -> Result<(NotetypeId, OpChanges), StoreError> {
        Err(StoreError::Corrupted)
    }

    fn add_note(&self, _note: Note) -> Result<(NoteId, OpChanges), StoreError> {
        Err(StoreError::Corrupted)
    }

    fn get_note(&self, _id: NoteId) -> Result<Option<Note>, StoreError> {
        Err(StoreError::Corrupted)
    }

    fn update_note(&self, _note: Note) -> Result<OpChanges, StoreError> {
        Err(StoreError::Corrupted)
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub type MockBackend = Backend<MemoryCollection, MockMedia, StringTable>;

/// Backend over an empty collection, the given media and bundled strings.
pub fn backend(media: MockMedia) -> (MockBackend, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let backend = Backend::new(MemoryCollection::new(), media, StringTable::builtin())
        .with_sink(sink.clone());
    (backend, sink)
}
