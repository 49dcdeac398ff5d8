//! In-memory collection adapter.
//!
//! Implements [`CollectionPort`] over hash maps behind a single mutex, so
//! every mutation is serialised and applied atomically. Snapshots are
//! encoded with `postcard` for persistence between runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{CollectionPort, StoreError};
use crate::notes::{Note, NoteId, Notetype, NotetypeId, NotetypeKind, TimestampSecs, Usn};
use crate::rpc::messages::{Op, OpChanges, StateChanges};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionState {
    notetypes: HashMap<i64, Notetype>,
    notes: HashMap<i64, Note>,
    next_note_id: i64,
    next_notetype_id: i64,
}

impl CollectionState {
    fn alloc_note_id(&mut self) -> NoteId {
        self.next_note_id = self.next_note_id.max(1);
        while self.notes.contains_key(&self.next_note_id) {
            self.next_note_id += 1;
        }
        let id = self.next_note_id;
        self.next_note_id += 1;
        NoteId(id)
    }

    fn alloc_notetype_id(&mut self) -> NotetypeId {
        self.next_notetype_id = self.next_notetype_id.max(1);
        while self.notetypes.contains_key(&self.next_notetype_id) {
            self.next_notetype_id += 1;
        }
        let id = self.next_notetype_id;
        self.next_notetype_id += 1;
        NotetypeId(id)
    }
}

/// Collection store held entirely in memory.
pub struct MemoryCollection {
    state: Mutex<CollectionState>,
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        info!("MemoryCollection: empty collection");
        Self {
            state: Mutex::new(CollectionState::default()),
        }
    }

    /// Restore a collection from a [`snapshot`](Self::snapshot).
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, StoreError> {
        let state: CollectionState = postcard::from_bytes(bytes).map_err(|e| {
            warn!("MemoryCollection: snapshot rejected: {}", e);
            StoreError::Corrupted
        })?;
        info!(
            "MemoryCollection: restored {} notes, {} note types",
            state.notes.len(),
            state.notetypes.len()
        );
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Serialise the whole collection.
    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let state = self.lock()?;
        postcard::to_allocvec(&*state).map_err(|_| StoreError::Corrupted)
    }

    pub fn note_count(&self) -> usize {
        self.lock().map_or(0, |s| s.notes.len())
    }

    /// All note types of `kind`, ordered by id.
    pub fn notetypes_of_kind(&self, kind: NotetypeKind) -> Vec<Notetype> {
        let Ok(state) = self.lock() else {
            return Vec::new();
        };
        let mut found: Vec<Notetype> = state
            .notetypes
            .values()
            .filter(|nt| nt.kind == kind)
            .cloned()
            .collect();
        found.sort_by_key(|nt| nt.id);
        found
    }

    fn lock(&self) -> Result<MutexGuard<'_, CollectionState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl CollectionPort for MemoryCollection {
    fn get_notetype(&self, id: NotetypeId) -> Result<Option<Notetype>, StoreError> {
        Ok(self.lock()?.notetypes.get(&id.0).cloned())
    }

    fn find_notetype_by_kind(&self, kind: NotetypeKind) -> Result<Option<Notetype>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .notetypes
            .values()
            .filter(|nt| nt.kind == kind)
            .min_by_key(|nt| nt.id)
            .cloned())
    }

    fn add_notetype(&self, mut notetype: Notetype) -> Result<(NotetypeId, OpChanges), StoreError> {
        let mut state = self.lock()?;
        if notetype.id.0 == 0 || state.notetypes.contains_key(&notetype.id.0) {
            notetype.id = state.alloc_notetype_id();
        }
        notetype.mtime = TimestampSecs::now();
        let id = notetype.id;
        state.notetypes.insert(id.0, notetype);
        Ok((
            id,
            OpChanges {
                op: Op::AddNotetype,
                changes: StateChanges {
                    notetype: true,
                    mtime: true,
                    ..StateChanges::default()
                },
                note_id: None,
            },
        ))
    }

    fn add_note(&self, mut note: Note) -> Result<(NoteId, OpChanges), StoreError> {
        let mut state = self.lock()?;
        if !state.notetypes.contains_key(&note.notetype_id.0) {
            return Err(StoreError::NotetypeNotFound(note.notetype_id));
        }
        note.id = state.alloc_note_id();
        note.mtime = TimestampSecs::now();
        note.usn = Usn::LOCAL;
        let id = note.id;
        let has_tags = !note.tags.is_empty();
        state.notes.insert(id.0, note);
        Ok((
            id,
            OpChanges {
                op: Op::AddNote,
                changes: StateChanges {
                    card: true,
                    note: true,
                    tag: has_tags,
                    mtime: true,
                    ..StateChanges::default()
                },
                note_id: Some(id),
            },
        ))
    }

    fn get_note(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        Ok(self.lock()?.notes.get(&id.0).cloned())
    }

    fn update_note(&self, mut note: Note) -> Result<OpChanges, StoreError> {
        let mut state = self.lock()?;
        let Some(existing) = state.notes.get_mut(&note.id.0) else {
            return Err(StoreError::NoteNotFound(note.id));
        };
        let tags_changed = existing.tags != note.tags;
        let fields_changed = existing.fields != note.fields;
        if !tags_changed && !fields_changed {
            return Ok(OpChanges::unchanged(Op::UpdateNote).for_note(note.id));
        }
        note.mtime = TimestampSecs::now();
        note.usn = Usn::LOCAL;
        let id = note.id;
        *existing = note;
        Ok(OpChanges {
            op: Op::UpdateNote,
            changes: StateChanges {
                card: fields_changed,
                note: true,
                tag: tags_changed,
                mtime: true,
                ..StateChanges::default()
            },
            note_id: Some(id),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────
