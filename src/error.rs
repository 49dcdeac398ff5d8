//! Unified error type for the backend services.
//!
//! Every fallible service call funnels into [`BackendError`], keeping the
//! two bindings uniform: the in-process [`Backend`](crate::app::service::Backend)
//! returns it directly, and the RPC engine ships it inside the `Err`
//! outcome of a response envelope so the client can rebuild the identical
//! value on the other side of the wire.
//!
//! The in-band error arm of `GetImageOcclusionNote` is *not* a
//! `BackendError`; it is a plain string inside a successful response.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::{MediaError, StoreError};

// ---------------------------------------------------------------------------
// Top-level backend error
// ---------------------------------------------------------------------------

/// Out-of-band failure of a service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    /// The request was rejected before touching any collaborator
    /// (empty path, wrong note type, malformed occlusions, unknown method).
    InvalidInput(String),
    /// A referenced note, note type or file does not exist.
    NotFound(String),
    /// Reading or writing a file failed.
    Io(String),
    /// A request or response could not be decoded.
    Decode(String),
    /// The transport closed or failed mid-call.
    Transport(String),
    /// A collaborator failed in an unexpected way.
    Internal(String),
}

impl BackendError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(m)
            | Self::NotFound(m)
            | Self::Io(m)
            | Self::Decode(m)
            | Self::Transport(m)
            | Self::Internal(m) => m,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Io(msg) => write!(f, "I/O: {msg}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Internal(msg) => write!(f, "internal: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

// ---------------------------------------------------------------------------
// Conversions from port and library errors
// ---------------------------------------------------------------------------

impl From<StoreError> for BackendError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NoteNotFound(_) | StoreError::NotetypeNotFound(_) => {
                Self::NotFound(e.to_string())
            }
            StoreError::Corrupted | StoreError::Poisoned => Self::Internal(e.to_string()),
        }
    }
}

impl From<MediaError> for BackendError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::NotFound(_) => Self::NotFound(e.to_string()),
            MediaError::InvalidName(_) => Self::InvalidInput(e.to_string()),
            MediaError::Io(_) => Self::Io(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteId;

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: BackendError = StoreError::NoteNotFound(NoteId(7)).into();
        assert!(matches!(err, BackendError::NotFound(_)));
        assert_eq!(err.message(), "note 7 not found");
    }

    #[test]
    fn display_carries_category() {
        let err = BackendError::invalid_input("path must not be empty");
        assert_eq!(err.to_string(), "invalid input: path must not be empty");
    }

    #[test]
    fn survives_json_round_trip() {
        let err = BackendError::not_found("note 3");
        let json = serde_json::to_string(&err).unwrap();
        let back: BackendError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
