//! External binding: the service traits over a [`Transport`].
//!
//! Each call encodes a [`RequestEnvelope`], writes its frames, then reads
//! until the response with the same id arrives. Calls are serialised by
//! an internal mutex, so one client can be shared between threads.

use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::notes::NoteId;
use crate::services::{I18nService, ImageOcclusionService};

use super::envelope::{RequestEnvelope, ResponseEnvelope};
use super::messages::{
    AddImageOcclusionNoteRequest, Empty, FormatTimespanRequest, GetImageForOcclusionRequest,
    GetImageForOcclusionResponse, GetImageOcclusionNoteResponse, I18nResourcesRequest, Json,
    NoteIdRequest, OpChanges, StringResponse, TranslateStringRequest,
    UpdateImageOcclusionNoteRequest,
};
use super::methods::MethodId;
use super::stream::{FrameLimits, MessageReader, encode_message};
use super::transport::Transport;

const READ_BUF_SIZE: usize = 4096;

struct ClientState<T> {
    transport: T,
    reader: MessageReader,
    next_id: u64,
}

/// Client-side implementation of both services.
pub struct RpcClient<T> {
    state: Mutex<ClientState<T>>,
    limits: FrameLimits,
}

fn transport_err(e: impl core::fmt::Debug) -> BackendError {
    BackendError::Transport(format!("{:?}", e))
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T, limits: FrameLimits) -> Self {
        Self {
            state: Mutex::new(ClientState {
                transport,
                reader: MessageReader::new(limits),
                next_id: 1,
            }),
            limits,
        }
    }

    /// Run `f` with exclusive access to the transport, between calls.
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        Ok(f(&mut self.lock()?.transport))
    }

    /// Shut the client down and hand back its transport.
    pub fn into_transport(self) -> Result<T> {
        self.state
            .into_inner()
            .map(|s| s.transport)
            .map_err(|_| BackendError::Transport("client lock poisoned".into()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ClientState<T>>> {
        self.state
            .lock()
            .map_err(|_| BackendError::Transport("client lock poisoned".into()))
    }

    /// Send one request and wait for its response.
    pub fn call<Req, Resp>(&self, method: MethodId, req: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;

        let envelope = RequestEnvelope::new(id, method, serde_json::to_value(req)?);
        let bytes = encode_message(&serde_json::to_vec(&envelope)?, self.limits);
        debug!("client: {} id={} ({} bytes)", method, id, bytes.len());
        let written = state.transport.write_all(&bytes).map_err(transport_err)?;
        if written < bytes.len() {
            return Err(BackendError::Transport(format!(
                "request {} cut short after {} of {} bytes",
                id,
                written,
                bytes.len()
            )));
        }
        state.transport.flush().map_err(transport_err)?;

        let response = Self::await_response(&mut state, id)?;
        let value: Result<serde_json::Value> = response.outcome.into();
        Ok(serde_json::from_value(value?)?)
    }

    fn await_response(state: &mut ClientState<T>, id: u64) -> Result<ResponseEnvelope> {
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let n = state.transport.read(&mut buf).map_err(transport_err)?;
            if n == 0 {
                state.reader.reset();
                return Err(BackendError::Transport(format!(
                    "connection closed before response {}",
                    id
                )));
            }
            for message in state.reader.feed(&buf[..n]) {
                let response: ResponseEnvelope = serde_json::from_slice(&message)?;
                if response.id == id {
                    return Ok(response);
                }
                warn!("client: dropping response {} while waiting for {}", response.id, id);
            }
        }
    }
}

impl<T: Transport + Send> ImageOcclusionService for RpcClient<T> {
    fn get_image_for_occlusion(&self, path: &str) -> Result<GetImageForOcclusionResponse> {
        self.call(
            MethodId::GetImageForOcclusion,
            &GetImageForOcclusionRequest {
                path: path.to_string(),
            },
        )
    }

    fn add_image_occlusion_note(&self, req: AddImageOcclusionNoteRequest) -> Result<OpChanges> {
        self.call(MethodId::AddImageOcclusionNote, &req)
    }

    fn get_image_occlusion_note(&self, note_id: NoteId) -> Result<GetImageOcclusionNoteResponse> {
        self.call(MethodId::GetImageOcclusionNote, &NoteIdRequest { note_id })
    }

    fn update_image_occlusion_note(
        &self,
        req: UpdateImageOcclusionNoteRequest,
    ) -> Result<OpChanges> {
        self.call(MethodId::UpdateImageOcclusionNote, &req)
    }

    fn add_image_occlusion_notetype(&self) -> Result<OpChanges> {
        self.call(MethodId::AddImageOcclusionNotetype, &Empty {})
    }
}

impl<T: Transport + Send> I18nService for RpcClient<T> {
    fn translate_string(&self, req: TranslateStringRequest) -> Result<String> {
        self.call::<_, StringResponse>(MethodId::TranslateString, &req)
            .map(|r| r.val)
    }

    fn format_timespan(&self, req: FormatTimespanRequest) -> Result<String> {
        self.call::<_, StringResponse>(MethodId::FormatTimespan, &req)
            .map(|r| r.val)
    }

    fn i18n_resources(&self, req: I18nResourcesRequest) -> Result<Json> {
        self.call(MethodId::I18nResources, &req)
    }
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::transport::{IoTransport, NullTransport};
    use std::io::Cursor;

    #[test]
    fn closed_transport_is_a_transport_error() {
        let client = RpcClient::new(NullTransport, FrameLimits::default());
        let err = client.add_image_occlusion_notetype().unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[test]
    fn ids_increase_per_call() {
        let client = RpcClient::new(NullTransport, FrameLimits::default());
        let _ = client.format_timespan(FormatTimespanRequest::default());
        let _ = client.format_timespan(FormatTimespanRequest::default());
        let next = client.state.lock().unwrap().next_id;
        assert_eq!(next, 3);
    }

    #[test]
    fn stalled_writer_fails_the_call() {
        let mut sink = [0u8; 8];
        let transport = IoTransport::new(Cursor::new(Vec::new()), &mut sink[..]);
        let client = RpcClient::new(transport, FrameLimits::default());
        let err = client
            .translate_string(TranslateStringRequest::new(0, 0))
            .unwrap_err();
        match err {
            BackendError::Transport(msg) => assert!(msg.contains("cut short after 8"), "{msg}"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
