//! Outbound application events.
//!
//! The [`Backend`](super::service::Backend) emits these through the
//! [`EventSink`](super::ports::EventSink) port after a mutation has been
//! applied. Adapters on the other side decide what to do with them.

use crate::notes::{NoteId, NotetypeId};

/// Structured events emitted by the service core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A note was created from an image.
    NoteAdded {
        note_id: NoteId,
        notetype_id: NotetypeId,
        image: String,
    },

    /// An existing note had its occlusions or text replaced.
    NoteUpdated(NoteId),

    /// The stock image-occlusion note type was created.
    NotetypeAdded(NotetypeId),

    /// `AddImageOcclusionNotetype` found an existing note type and did nothing.
    NotetypeAlreadyPresent(NotetypeId),
}
