//! Transport-agnostic RPC subsystem.
//!
//! JSON envelopes inside length-prefixed frames, with optional DEFLATE
//! compression and chunking for large payloads.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         RPC Stack                            │
//! │                                                              │
//! │  RpcClient ──▶ stream ──▶ Transport ──▶ stream ──▶ RpcEngine │
//! │  (services)   (encode)    (trait)      (decode)     │        │
//! │      ▲                                              ▼        │
//! │      │                                        MethodTable    │
//! │      │                                   (defaults+overrides)│
//! │      │                                              │        │
//! │      └──── response envelope ◀──────────────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod chunked;
pub mod client;
pub mod codec;
pub mod compress;
pub mod dispatch;
pub mod engine;
pub mod envelope;
pub mod io_task;
pub mod messages;
pub mod methods;
pub mod stream;
pub mod transport;
