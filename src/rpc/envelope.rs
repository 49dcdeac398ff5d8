//! Request / response envelopes.
//!
//! ```text
//! request:  { "id": 7, "service": 1, "method": 2, "payload": { "note_id": 3 } }
//! response: { "id": 7, "outcome": { "Ok": { "Note": { ... } } } }
//!           { "id": 7, "outcome": { "Err": { "NotFound": "note 3 not found" } } }
//! ```
//!
//! Envelopes are JSON. Field names are the stable identity: unknown fields
//! are ignored and missing ones take their defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;

use super::methods::MethodId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestEnvelope {
    /// Echoed in the response.
    pub id: u64,
    pub service: u32,
    pub method: u32,
    pub payload: Value,
}

impl RequestEnvelope {
    pub fn new(id: u64, method: MethodId, payload: Value) -> Self {
        Self {
            id,
            service: method.service(),
            method: method.index(),
            payload,
        }
    }

    /// Resolve the `(service, method)` pair.
    pub fn method_id(&self) -> Option<MethodId> {
        MethodId::from_parts(self.service, self.method)
    }
}

/// Result of a call as carried on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Ok(Value),
    Err(BackendError),
}

impl Default for Outcome {
    fn default() -> Self {
        Self::Err(BackendError::Decode("response carried no outcome".into()))
    }
}

impl From<crate::error::Result<Value>> for Outcome {
    fn from(r: crate::error::Result<Value>) -> Self {
        match r {
            Ok(v) => Self::Ok(v),
            Err(e) => Self::Err(e),
        }
    }
}

impl From<Outcome> for crate::error::Result<Value> {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::Ok(v) => Ok(v),
            Outcome::Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
    pub id: u64,
    pub outcome: Outcome,
}

/// Best-effort request id from a payload that failed to decode as an
/// envelope, so the error can still be routed to the caller.
pub fn salvage_id(bytes: &[u8]) -> u64 {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| v.get("id").and_then(Value::as_u64))
        .unwrap_or(0)
}

// ── Tests ────────────────────────────────────────────────────
