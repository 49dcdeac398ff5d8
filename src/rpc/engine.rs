//! RPC engine: dispatches incoming envelopes through the method table.
//!
//! **Transport-decoupled**: the engine does not own a transport. Callers
//! feed `(client_id, bytes)` via [`RpcEngine::feed_bytes`] and receive the
//! encoded response frames. [`serve`](super::io_task::serve) bridges a
//! transport to the engine.
//!
//! Every message passes through the same pipeline:
//!
//! 1. **Framing**: per-client decoder, chunk reassembly, decompression.
//! 2. **Envelope decode**: undecodable requests get a `Decode` error.
//! 3. **Routing**: `(service, method)` must name a known method, otherwise
//!    the caller gets `InvalidInput`.
//! 4. **Dispatch**: the [`MethodTable`] handler runs and its result becomes
//!    the response outcome.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::error::BackendError;

use super::dispatch::MethodTable;
use super::envelope::{Outcome, RequestEnvelope, ResponseEnvelope, salvage_id};
use super::stream::{FrameLimits, MessageReader, encode_message};

/// Identifies a connected peer.
pub type ClientId = u32;

/// Transport-decoupled RPC engine with per-client decoding state.
pub struct RpcEngine {
    table: MethodTable,
    limits: FrameLimits,
    clients: HashMap<ClientId, MessageReader>,
    handled: u64,
}

impl RpcEngine {
    pub fn new(table: MethodTable, limits: FrameLimits) -> Self {
        Self {
            table,
            limits,
            clients: HashMap::new(),
            handled: 0,
        }
    }

    pub fn table(&self) -> &MethodTable {
        &self.table
    }

    /// Mutable access for installing overrides on a running engine.
    pub fn table_mut(&mut self) -> &mut MethodTable {
        &mut self.table
    }

    pub fn limits(&self) -> FrameLimits {
        self.limits
    }

    /// Requests dispatched so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Feed raw bytes from a client. Returns the encoded response frames
    /// for every request the bytes completed (possibly none).
    pub fn feed_bytes(&mut self, client_id: ClientId, data: &[u8]) -> Vec<u8> {
        let limits = self.limits;
        let messages = self
            .clients
            .entry(client_id)
            .or_insert_with(|| MessageReader::new(limits))
            .feed(data);

        let mut out = Vec::new();
        for message in messages {
            out.extend(self.dispatch(client_id, &message));
        }
        out
    }

    /// Dispatch one complete request message. Returns the encoded
    /// response frames.
    pub fn dispatch(&mut self, client_id: ClientId, message: &[u8]) -> Vec<u8> {
        let response = self.handle(client_id, message);
        match serde_json::to_vec(&response) {
            Ok(bytes) => encode_message(&bytes, self.limits),
            Err(e) => {
                warn!("RPC[{}]: response encode failed: {}", client_id, e);
                let fallback = ResponseEnvelope {
                    id: response.id,
                    outcome: Outcome::Err(BackendError::Internal(e.to_string())),
                };
                serde_json::to_vec(&fallback)
                    .map(|b| encode_message(&b, self.limits))
                    .unwrap_or_default()
            }
        }
    }

    /// Decode, route and run a request.
    pub fn handle(&mut self, client_id: ClientId, message: &[u8]) -> ResponseEnvelope {
        self.handled += 1;

        let req: RequestEnvelope = match serde_json::from_slice(message) {
            Ok(r) => r,
            Err(e) => {
                warn!("RPC[{}]: invalid envelope: {}", client_id, e);
                return ResponseEnvelope {
                    id: salvage_id(message),
                    outcome: Outcome::Err(BackendError::Decode(e.to_string())),
                };
            }
        };

        let Some(method) = req.method_id() else {
            warn!(
                "RPC[{}]: unknown method {}/{}",
                client_id, req.service, req.method
            );
            return ResponseEnvelope {
                id: req.id,
                outcome: Outcome::Err(BackendError::invalid_input(format!(
                    "unknown method {}/{}",
                    req.service, req.method
                ))),
            };
        };

        if method.is_mutation() {
            info!("RPC[{}]: {} (id={})", client_id, method, req.id);
        } else {
            debug!("RPC[{}]: {} (id={})", client_id, method, req.id);
        }

        let result = self.table.call(method, req.payload);
        if let Err(e) = &result {
            warn!("RPC[{}]: {} failed: {}", client_id, method, e);
        }
        ResponseEnvelope {
            id: req.id,
            outcome: result.into(),
        }
    }

    /// Forget a client's partial input (e.g. on disconnect).
    pub fn reset_client(&mut self, client_id: ClientId) {
        if self.clients.remove(&client_id).is_some() {
            info!("RPC[{}]: client state reset", client_id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

// ── Tests ────────────────────────────────────────────────────
