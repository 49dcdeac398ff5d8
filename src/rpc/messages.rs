//! Request/response messages of the two services.
//!
//! Wire rules (JSON via serde):
//! - Field names are the stable identity; field order does not matter.
//! - Unknown fields are ignored on decode, missing fields take their
//!   default (`#[serde(default)]` on every message).
//! - One-of types ([`TranslateArgValue`], [`GetImageOcclusionNoteResponse`])
//!   are externally tagged enums: exactly one key is present.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::notes::{NoteId, NotetypeId};

// ── Shared ────────────────────────────────────────────────────

/// What a collection mutation did. Produced by the collection port and
/// passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpChanges {
    pub op: Op,
    pub changes: StateChanges,
    /// The note written, for note operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<NoteId>,
}

impl OpChanges {
    /// An operation that changed nothing.
    pub fn unchanged(op: Op) -> Self {
        Self {
            op,
            changes: StateChanges::default(),
            note_id: None,
        }
    }

    #[must_use]
    pub fn for_note(mut self, note_id: NoteId) -> Self {
        self.note_id = Some(note_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes == StateChanges::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    #[default]
    Unknown,
    AddNote,
    UpdateNote,
    AddNotetype,
}

/// Which parts of the collection a mutation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateChanges {
    pub card: bool,
    pub note: bool,
    pub notetype: bool,
    pub tag: bool,
    pub mtime: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Empty {}

/// Opaque JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Json {
    pub json: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteIdRequest {
    pub note_id: NoteId,
}

// ── ImageOcclusionService ─────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetImageForOcclusionRequest {
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetImageForOcclusionResponse {
    pub data: Vec<u8>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddImageOcclusionNoteRequest {
    pub image_path: String,
    pub occlusions: String,
    pub header: String,
    pub back_extra: String,
    pub tags: Vec<String>,
    pub notetype_id: NotetypeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateImageOcclusionNoteRequest {
    pub note_id: NoteId,
    pub occlusions: String,
    pub header: String,
    pub back_extra: String,
    pub tags: Vec<String>,
}

/// A persisted image-occlusion note as seen by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOcclusionNote {
    pub note_id: NoteId,
    pub notetype_id: NotetypeId,
    pub image_data: Vec<u8>,
    pub image_file_name: String,
    pub occlusions: String,
    pub header: String,
    pub back_extra: String,
    pub tags: Vec<String>,
}

/// Either a populated note or an in-band error string, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GetImageOcclusionNoteResponse {
    Note(ImageOcclusionNote),
    Error(String),
}

impl GetImageOcclusionNoteResponse {
    pub fn note(&self) -> Option<&ImageOcclusionNote> {
        match self {
            Self::Note(note) => Some(note),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Note(_) => None,
            Self::Error(msg) => Some(msg),
        }
    }
}

// ── I18nService ───────────────────────────────────────────────

/// A translation argument: a string or a number, exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TranslateArgValue {
    Str(String),
    /// Non-finite values cross the wire as `null` and come back as NaN.
    Number(#[serde(deserialize_with = "nullable_f64")] f64),
}

impl TranslateArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Str(_) => None,
            Self::Number(n) => Some(*n),
        }
    }
}

impl From<&str> for TranslateArgValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for TranslateArgValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for TranslateArgValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for TranslateArgValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateStringRequest {
    pub module_index: u32,
    pub message_index: u32,
    pub args: HashMap<String, TranslateArgValue>,
}

impl TranslateStringRequest {
    pub fn new(module_index: u32, message_index: u32) -> Self {
        Self {
            module_index,
            message_index,
            args: HashMap::new(),
        }
    }

    pub fn arg(mut self, name: &str, value: impl Into<TranslateArgValue>) -> Self {
        self.args.insert(name.to_string(), value.into());
        self
    }
}

/// Where a duration will be displayed; selects the output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimespanContext {
    #[default]
    Precise,
    AnswerButtons,
    Intervals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatTimespanRequest {
    /// JSON has no NaN or infinity; encoders write those as `null`.
    #[serde(deserialize_with = "nullable_f32")]
    pub seconds: f32,
    pub context: TimespanContext,
}

fn nullable_f32<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(d)?.unwrap_or(f32::NAN))
}

fn nullable_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nResourcesRequest {
    pub modules: Vec<String>,
}

/// Single-string response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringResponse {
    pub val: String,
}
