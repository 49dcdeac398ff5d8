//! Method dispatch table.
//!
//! Every [`MethodId`] maps to an erased handler taking and returning JSON
//! values. [`MethodTable::backend`] fills the table with pass-through
//! handlers that decode the request, call the service trait and encode the
//! response. Individual entries can then be replaced with
//! [`MethodTable::override_method`]; the defaults stay underneath and come
//! back with [`MethodTable::clear_override`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BackendError, Result};
use crate::services::{I18nService, ImageOcclusionService};

use super::messages::{
    AddImageOcclusionNoteRequest, Empty, FormatTimespanRequest, GetImageForOcclusionRequest,
    I18nResourcesRequest, NoteIdRequest, StringResponse, TranslateStringRequest,
    UpdateImageOcclusionNoteRequest,
};
use super::methods::MethodId;

/// Type-erased method handler.
pub type Handler = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Wrap a typed function as a [`Handler`].
///
/// A `null` payload decodes as an empty object, so requests whose fields
/// all carry defaults may omit the payload entirely.
pub fn handler<Req, Resp, F>(f: F) -> Handler
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: Fn(Req) -> Result<Resp> + Send + Sync + 'static,
{
    Box::new(move |payload| {
        let payload = match payload {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        let req: Req = serde_json::from_value(payload)?;
        let resp = f(req)?;
        Ok(serde_json::to_value(resp)?)
    })
}

/// Handlers keyed by method, with overrides layered over defaults.
#[derive(Default)]
pub struct MethodTable {
    defaults: HashMap<MethodId, Handler>,
    overrides: HashMap<MethodId, Handler>,
}

impl MethodTable {
    /// A table with no handlers; every call fails with `InvalidInput`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pass-through defaults for every method of both services.
    pub fn backend<S>(service: Arc<S>) -> Self
    where
        S: ImageOcclusionService + I18nService + 'static,
    {
        let mut table = Self::empty();

        let s = service.clone();
        table.set_default(
            MethodId::GetImageForOcclusion,
            handler(move |r: GetImageForOcclusionRequest| s.get_image_for_occlusion(&r.path)),
        );
        let s = service.clone();
        table.set_default(
            MethodId::AddImageOcclusionNote,
            handler(move |r: AddImageOcclusionNoteRequest| s.add_image_occlusion_note(r)),
        );
        let s = service.clone();
        table.set_default(
            MethodId::GetImageOcclusionNote,
            handler(move |r: NoteIdRequest| s.get_image_occlusion_note(r.note_id)),
        );
        let s = service.clone();
        table.set_default(
            MethodId::UpdateImageOcclusionNote,
            handler(move |r: UpdateImageOcclusionNoteRequest| s.update_image_occlusion_note(r)),
        );
        let s = service.clone();
        table.set_default(
            MethodId::AddImageOcclusionNotetype,
            handler(move |_: Empty| s.add_image_occlusion_notetype()),
        );

        let s = service.clone();
        table.set_default(
            MethodId::TranslateString,
            handler(move |r: TranslateStringRequest| {
                s.translate_string(r).map(|val| StringResponse { val })
            }),
        );
        let s = service.clone();
        table.set_default(
            MethodId::FormatTimespan,
            handler(move |r: FormatTimespanRequest| {
                s.format_timespan(r).map(|val| StringResponse { val })
            }),
        );
        let s = service;
        table.set_default(
            MethodId::I18nResources,
            handler(move |r: I18nResourcesRequest| s.i18n_resources(r)),
        );

        table
    }

    /// Install or replace the default handler for `method`.
    pub fn set_default(&mut self, method: MethodId, h: Handler) {
        self.defaults.insert(method, h);
    }

    /// Serve `method` with `h` instead of its default.
    pub fn override_method(&mut self, method: MethodId, h: Handler) {
        self.overrides.insert(method, h);
    }

    /// Drop an override; returns whether one was present.
    pub fn clear_override(&mut self, method: MethodId) -> bool {
        self.overrides.remove(&method).is_some()
    }

    pub fn is_overridden(&self, method: MethodId) -> bool {
        self.overrides.contains_key(&method)
    }

    /// Run the handler for `method`.
    pub fn call(&self, method: MethodId, payload: Value) -> Result<Value> {
        let h = self
            .overrides
            .get(&method)
            .or_else(|| self.defaults.get(&method))
            .ok_or_else(|| {
                BackendError::invalid_input(format!("no handler for method {}", method))
            })?;
        h(payload)
    }
}

// ── Tests ────────────────────────────────────────────────────
