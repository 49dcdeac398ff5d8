//! Fuzz target: `RpcEngine::handle`
//!
//! Treats arbitrary bytes as a complete request body. The engine must
//! always answer with exactly one response and never panic, whatever the
//! JSON says.
//!
//! cargo fuzz run fuzz_request_envelope

#![no_main]

use std::sync::Arc;

use cardbridge::adapters::media::MemoryMedia;
use cardbridge::adapters::memory_store::MemoryCollection;
use cardbridge::adapters::strings::StringTable;
use cardbridge::app::service::Backend;
use cardbridge::rpc::dispatch::MethodTable;
use cardbridge::rpc::engine::RpcEngine;
use cardbridge::rpc::stream::{FrameLimits, MessageReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let backend = Backend::new(
        MemoryCollection::new(),
        MemoryMedia::new(),
        StringTable::builtin(),
    );
    let mut engine = RpcEngine::new(
        MethodTable::backend(Arc::new(backend)),
        FrameLimits::default(),
    );

    let out = engine.dispatch(1, data);
    let replies = MessageReader::default().feed(&out);
    assert_eq!(replies.len(), 1, "every request gets one response");
});
