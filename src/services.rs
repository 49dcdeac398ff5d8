//! Service contracts.
//!
//! Both bindings implement these traits: [`Backend`](crate::app::service::Backend)
//! in process, [`RpcClient`](crate::rpc::client::RpcClient) over a transport.
//! Callers can hold either behind `&dyn ImageOcclusionService` and observe
//! the same results.

use crate::error::Result;
use crate::notes::NoteId;
use crate::rpc::messages::{
    AddImageOcclusionNoteRequest, FormatTimespanRequest, GetImageForOcclusionResponse,
    GetImageOcclusionNoteResponse, I18nResourcesRequest, Json, OpChanges,
    TranslateStringRequest, UpdateImageOcclusionNoteRequest,
};

/// Image-occlusion note operations (service index 1).
pub trait ImageOcclusionService: Send + Sync {
    /// Read an image from outside the collection for the occlusion editor.
    fn get_image_for_occlusion(&self, path: &str) -> Result<GetImageForOcclusionResponse>;

    fn add_image_occlusion_note(&self, req: AddImageOcclusionNoteRequest) -> Result<OpChanges>;

    /// Look up an existing note.
    ///
    /// Lookup failures come back in the `Error` arm of the response; an
    /// `Err` is reserved for the transport.
    fn get_image_occlusion_note(&self, note_id: NoteId) -> Result<GetImageOcclusionNoteResponse>;

    fn update_image_occlusion_note(
        &self,
        req: UpdateImageOcclusionNoteRequest,
    ) -> Result<OpChanges>;

    /// Create the stock image-occlusion note type unless one exists.
    fn add_image_occlusion_notetype(&self) -> Result<OpChanges>;
}

/// Localisation operations (service index 2).
pub trait I18nService: Send + Sync {
    fn translate_string(&self, req: TranslateStringRequest) -> Result<String>;

    fn format_timespan(&self, req: FormatTimespanRequest) -> Result<String>;

    /// `{"langs": [...], "resources": {module: text}}` as UTF-8 JSON.
    fn i18n_resources(&self, req: I18nResourcesRequest) -> Result<Json>;
}
