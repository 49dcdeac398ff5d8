//! Collection data types shared by the ports and the services.
//!
//! These are the records the [`CollectionPort`](crate::app::ports::CollectionPort)
//! stores. The RPC layer never exposes them directly; the services map
//! them to and from the wire messages in [`crate::rpc::messages`].

pub mod notetype;
pub mod occlusion;

use core::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub use notetype::{Notetype, NotetypeKind};

// ── Identifiers ───────────────────────────────────────────────

/// Note identifier, assigned by the collection on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

/// Note type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotetypeId(pub i64);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NotetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampSecs(pub i64);

impl TimestampSecs {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        Self(secs)
    }
}

/// Update sequence number; -1 marks a local change not yet synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usn(pub i32);

impl Usn {
    pub const LOCAL: Usn = Usn(-1);
}

// ── Note ──────────────────────────────────────────────────────

/// A stored note: ordered field contents plus tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub notetype_id: NotetypeId,
    pub fields: Vec<String>,
    pub tags: Vec<String>,
    pub mtime: TimestampSecs,
    pub usn: Usn,
}

impl Note {
    /// A note that has not been persisted yet (id 0).
    pub fn new(notetype_id: NotetypeId, fields: Vec<String>, tags: Vec<String>) -> Self {
        Self {
            id: NoteId(0),
            notetype_id,
            fields,
            tags,
            mtime: TimestampSecs::now(),
            usn: Usn::LOCAL,
        }
    }

    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", String::as_str)
    }

    /// Overwrite a field, growing the field list if needed.
    pub fn set_field(&mut self, idx: usize, text: impl Into<String>) {
        if self.fields.len() <= idx {
            self.fields.resize(idx + 1, String::new());
        }
        self.fields[idx] = text.into();
    }
}
