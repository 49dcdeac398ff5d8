//! Port traits: the hexagonal boundary between the services and their
//! collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Backend (service core)
//! ```
//!
//! Driven adapters (collection store, media folder, string tables, event
//! sinks) implement these traits. The [`Backend`](super::service::Backend)
//! consumes them via generics, so the service core never touches a
//! database or the filesystem directly.
//!
//! ## Concurrency notes
//!
//! - All ports take `&self` and must be `Send + Sync`; the services are
//!   shared between bindings.
//! - **CollectionPort** implementations MUST serialise mutations: at most
//!   one in-flight write per note / note type.
//! - A mutation either fully applies (and is described by the returned
//!   [`OpChanges`]) or returns an error and changes nothing.

use core::fmt;

use crate::notes::{Note, NoteId, Notetype, NotetypeId, NotetypeKind};
use crate::rpc::messages::OpChanges;

// ───────────────────────────────────────────────────────────────
// Collection port (notes and note types)
// ───────────────────────────────────────────────────────────────

/// Note and note-type storage.
pub trait CollectionPort: Send + Sync {
    /// Fetch a note type by id.
    fn get_notetype(&self, id: NotetypeId) -> Result<Option<Notetype>, StoreError>;

    /// First note type of the given kind, if any.
    fn find_notetype_by_kind(&self, kind: NotetypeKind) -> Result<Option<Notetype>, StoreError>;

    /// Persist a new note type. An id of 0 asks the store to assign one.
    fn add_notetype(&self, notetype: Notetype) -> Result<(NotetypeId, OpChanges), StoreError>;

    /// Persist a new note; the store assigns its id.
    fn add_note(&self, note: Note) -> Result<(NoteId, OpChanges), StoreError>;

    /// Fetch a note by id.
    fn get_note(&self, id: NoteId) -> Result<Option<Note>, StoreError>;

    /// Replace an existing note. Fails with [`StoreError::NoteNotFound`]
    /// if the id is unknown.
    fn update_note(&self, note: Note) -> Result<OpChanges, StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Media port (external images + media folder)
// ───────────────────────────────────────────────────────────────

/// Reads images from outside the collection and manages the media folder.
pub trait MediaPort: Send + Sync {
    /// Read raw bytes from a path outside the media folder.
    fn read_external(&self, path: &str) -> Result<Vec<u8>, MediaError>;

    /// Store `data` in the media folder under (a variant of) `desired_name`.
    ///
    /// Identical content already stored under the same name is reused;
    /// a name clash with different content gets a hash suffix. Returns the
    /// name actually used.
    fn add_file(&self, desired_name: &str, data: &[u8]) -> Result<String, MediaError>;

    /// Read a file from the media folder.
    fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError>;
}

// ───────────────────────────────────────────────────────────────
// Strings port (localisation resource table)
// ───────────────────────────────────────────────────────────────

/// Resolves message templates and module resources.
pub trait StringsPort: Send + Sync {
    /// Template for `(module_index, message_index)`, or `None` when either
    /// index is out of range.
    fn template(&self, module_index: u32, message_index: u32) -> Option<String>;

    /// Template for a message key, searched across all modules.
    fn message(&self, key: &str) -> Option<String>;

    /// Raw resource text of a named module.
    fn module_resource(&self, module: &str) -> Option<String>;

    /// Active language tags, most preferred first.
    fn langs(&self) -> Vec<String>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (service core → logging)
// ───────────────────────────────────────────────────────────────

/// The service core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`CollectionPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NoteNotFound(NoteId),
    NotetypeNotFound(NotetypeId),
    /// Stored data failed to deserialise.
    Corrupted,
    /// A writer panicked while holding the store lock.
    Poisoned,
}

/// Errors from [`MediaPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    NotFound(String),
    /// The name would escape the media folder or is empty.
    InvalidName(String),
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note {} not found", id),
            Self::NotetypeNotFound(id) => write!(f, "note type {} not found", id),
            Self::Corrupted => write!(f, "collection data corrupted"),
            Self::Poisoned => write!(f, "collection lock poisoned"),
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {}", path),
            Self::InvalidName(name) => write!(f, "invalid media file name: {:?}", name),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl std::error::Error for MediaError {}
