//! Application service: the hexagonal core.
//!
//! [`Backend`] owns the port adapters and implements both service
//! contracts directly; this is the in-process binding. The RPC engine
//! wraps a shared `Backend` to serve the external binding, so every
//! request ends up in the same code below.
//!
//! ```text
//!  MediaPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │        Backend          │
//!  StringsPort ─▶│  ImageOcclusion · I18n  │◀──▶ CollectionPort
//!                └────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::adapters::log_sink::LogEventSink;
use crate::adapters::media::file_name_of;
use crate::error::{BackendError, Result};
use crate::i18n::{INVALID_INDEX_FALLBACK, format_number, render, timespan_message};
use crate::notes::notetype::image_occlusion_notetype;
use crate::notes::occlusion::{
    BACK_EXTRA_FIELD, HEADER_FIELD, IMAGE_FIELD, IMAGE_OCCLUSION_FIELDS, OCCLUSION_FIELD,
    image_src, image_tag, occlusions_are_well_formed,
};
use crate::notes::{Note, NoteId, Notetype, NotetypeId, NotetypeKind};
use crate::rpc::messages::{
    AddImageOcclusionNoteRequest, FormatTimespanRequest, GetImageForOcclusionResponse,
    GetImageOcclusionNoteResponse, I18nResourcesRequest, ImageOcclusionNote, Json, Op,
    OpChanges, TranslateArgValue, TranslateStringRequest, UpdateImageOcclusionNoteRequest,
};
use crate::services::{I18nService, ImageOcclusionService};

use super::events::AppEvent;
use super::ports::{CollectionPort, EventSink, MediaPort, StoreError, StringsPort};

/// Message key naming the stock note type.
const NOTETYPE_NAME_KEY: &str = "notetypes-image-occlusion-name";
const DEFAULT_NOTETYPE_NAME: &str = "Image Occlusion";

// ───────────────────────────────────────────────────────────────
// Backend
// ───────────────────────────────────────────────────────────────

/// In-process implementation of both services.
pub struct Backend<C, M, S> {
    collection: C,
    media: M,
    strings: S,
    sink: Arc<dyn EventSink>,
    /// Held across the find-then-add of the stock note type.
    bootstrap: Mutex<()>,
}

impl<C, M, S> Backend<C, M, S>
where
    C: CollectionPort,
    M: MediaPort,
    S: StringsPort,
{
    /// Build a backend that logs its events.
    pub fn new(collection: C, media: M, strings: S) -> Self {
        Self {
            collection,
            media,
            strings,
            sink: Arc::new(LogEventSink::new()),
            bootstrap: Mutex::new(()),
        }
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn strings(&self) -> &S {
        &self.strings
    }

    // ── Helpers ───────────────────────────────────────────────

    /// Resolve the note type a new note should use. An id of 0 means the
    /// first image-occlusion note type in the collection.
    fn notetype_for_add(&self, id: NotetypeId) -> Result<Notetype> {
        let found = if id.0 == 0 {
            self.collection
                .find_notetype_by_kind(NotetypeKind::ImageOcclusion)?
        } else {
            self.collection.get_notetype(id)?
        };
        let notetype =
            found.ok_or_else(|| BackendError::not_found(format!("note type {} not found", id)))?;
        if !notetype.is_image_occlusion() {
            return Err(BackendError::invalid_input(format!(
                "note type {} is not an image occlusion note type",
                notetype.id
            )));
        }
        Ok(notetype)
    }

    /// Load a note and confirm it belongs to an image-occlusion note type.
    fn image_occlusion_note(&self, note_id: NoteId) -> Result<Note> {
        let note = self
            .collection
            .get_note(note_id)?
            .ok_or_else(|| BackendError::not_found(format!("note {} not found", note_id)))?;
        let is_io = self
            .collection
            .get_notetype(note.notetype_id)?
            .is_some_and(|nt| nt.is_image_occlusion());
        if !is_io {
            return Err(BackendError::invalid_input(format!(
                "note {} is not an image occlusion note",
                note_id
            )));
        }
        Ok(note)
    }

    fn read_note(&self, note_id: NoteId) -> Result<ImageOcclusionNote> {
        let note = self.image_occlusion_note(note_id)?;
        let image_field = note.field(IMAGE_FIELD);
        let image_file_name = image_src(image_field).ok_or_else(|| {
            BackendError::not_found(format!("note {} has no image", note_id))
        })?;
        let image_data = self.media.read_file(&image_file_name)?;
        Ok(ImageOcclusionNote {
            note_id: note.id,
            notetype_id: note.notetype_id,
            image_data,
            image_file_name,
            occlusions: note.field(OCCLUSION_FIELD).to_string(),
            header: note.field(HEADER_FIELD).to_string(),
            back_extra: note.field(BACK_EXTRA_FIELD).to_string(),
            tags: note.tags,
        })
    }

    fn check_occlusions(occlusions: &str) -> Result<()> {
        if occlusions_are_well_formed(occlusions) {
            Ok(())
        } else {
            Err(BackendError::invalid_input("occlusions must not be empty"))
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ImageOcclusionService
// ───────────────────────────────────────────────────────────────

impl<C, M, S> ImageOcclusionService for Backend<C, M, S>
where
    C: CollectionPort,
    M: MediaPort,
    S: StringsPort,
{
    fn get_image_for_occlusion(&self, path: &str) -> Result<GetImageForOcclusionResponse> {
        if path.trim().is_empty() {
            return Err(BackendError::invalid_input("image path must not be empty"));
        }
        let data = self.media.read_external(path)?;
        Ok(GetImageForOcclusionResponse {
            data,
            name: file_name_of(path).to_string(),
        })
    }

    fn add_image_occlusion_note(&self, req: AddImageOcclusionNoteRequest) -> Result<OpChanges> {
        if req.image_path.trim().is_empty() {
            return Err(BackendError::invalid_input("image path must not be empty"));
        }
        Self::check_occlusions(&req.occlusions)?;
        let notetype = self.notetype_for_add(req.notetype_id)?;

        let data = self.media.read_external(&req.image_path)?;
        let image = self.media.add_file(file_name_of(&req.image_path), &data)?;

        let mut fields = vec![String::new(); IMAGE_OCCLUSION_FIELDS.len()];
        fields[OCCLUSION_FIELD] = req.occlusions;
        fields[IMAGE_FIELD] = image_tag(&image);
        fields[HEADER_FIELD] = req.header;
        fields[BACK_EXTRA_FIELD] = req.back_extra;
        let note = Note::new(notetype.id, fields, req.tags);

        let (note_id, changes) = self.collection.add_note(note)?;
        self.sink.emit(&AppEvent::NoteAdded {
            note_id,
            notetype_id: notetype.id,
            image,
        });
        Ok(changes)
    }

    fn get_image_occlusion_note(&self, note_id: NoteId) -> Result<GetImageOcclusionNoteResponse> {
        Ok(match self.read_note(note_id) {
            Ok(note) => GetImageOcclusionNoteResponse::Note(note),
            Err(e) => {
                warn!("get_image_occlusion_note({}): {}", note_id, e);
                GetImageOcclusionNoteResponse::Error(e.message().to_string())
            }
        })
    }

    fn update_image_occlusion_note(
        &self,
        req: UpdateImageOcclusionNoteRequest,
    ) -> Result<OpChanges> {
        let mut note = self.image_occlusion_note(req.note_id)?;
        Self::check_occlusions(&req.occlusions)?;

        note.set_field(OCCLUSION_FIELD, req.occlusions);
        note.set_field(HEADER_FIELD, req.header);
        note.set_field(BACK_EXTRA_FIELD, req.back_extra);
        note.tags = req.tags;

        let changes = self.collection.update_note(note)?;
        if !changes.is_empty() {
            self.sink.emit(&AppEvent::NoteUpdated(req.note_id));
        }
        Ok(changes)
    }

    fn add_image_occlusion_notetype(&self) -> Result<OpChanges> {
        let _bootstrap = self.bootstrap.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(existing) = self
            .collection
            .find_notetype_by_kind(NotetypeKind::ImageOcclusion)?
        {
            self.sink.emit(&AppEvent::NotetypeAlreadyPresent(existing.id));
            return Ok(OpChanges::unchanged(Op::AddNotetype));
        }
        let name = self
            .strings
            .message(NOTETYPE_NAME_KEY)
            .unwrap_or_else(|| DEFAULT_NOTETYPE_NAME.to_string());
        let (id, changes) = self
            .collection
            .add_notetype(image_occlusion_notetype(&name))?;
        info!("Backend: created note type {:?} as {}", name, id);
        self.sink.emit(&AppEvent::NotetypeAdded(id));
        Ok(changes)
    }
}

// ───────────────────────────────────────────────────────────────
// I18nService
// ───────────────────────────────────────────────────────────────

impl<C, M, S> I18nService for Backend<C, M, S>
where
    C: CollectionPort,
    M: MediaPort,
    S: StringsPort,
{
    fn translate_string(&self, req: TranslateStringRequest) -> Result<String> {
        match self.strings.template(req.module_index, req.message_index) {
            Some(template) => Ok(render(&template, &req.args)),
            None => {
                warn!(
                    "translate_string: no message at {}/{}",
                    req.module_index, req.message_index
                );
                Ok(INVALID_INDEX_FALLBACK.to_string())
            }
        }
    }

    fn format_timespan(&self, req: FormatTimespanRequest) -> Result<String> {
        let msg = timespan_message(req.seconds, req.context);
        match self.strings.message(&msg.key) {
            Some(template) => {
                let mut args = HashMap::new();
                args.insert("amount".to_string(), TranslateArgValue::Number(msg.amount));
                Ok(render(&template, &args))
            }
            None => Ok(format!("{} {}", format_number(msg.amount), msg.unit.suffix())),
        }
    }

    fn i18n_resources(&self, req: I18nResourcesRequest) -> Result<Json> {
        let mut resources = serde_json::Map::new();
        for module in &req.modules {
            if let Some(text) = self.strings.module_resource(module) {
                resources.insert(module.clone(), serde_json::Value::String(text));
            }
        }
        let body = serde_json::json!({
            "langs": self.strings.langs(),
            "resources": resources,
        });
        Ok(Json {
            json: serde_json::to_vec(&body)?,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────
