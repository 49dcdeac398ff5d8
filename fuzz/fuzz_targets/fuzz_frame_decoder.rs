//! Fuzz target: `FrameDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming frame decoder and
//! asserts that it never panics, never yields empty or oversized payloads,
//! and behaves the same after a reset.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use cardbridge::rpc::codec::{DEFAULT_MAX_FRAME_SIZE, FrameDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = FrameDecoder::default();

    let first = decoder.feed(data);
    for frame in &first {
        assert!(!frame.payload.is_empty(), "decoder must not yield empty payload");
        assert!(
            frame.payload.len() <= DEFAULT_MAX_FRAME_SIZE,
            "payload exceeds frame limit"
        );
    }

    decoder.reset();
    assert_eq!(decoder.feed(data), first, "reset must restore a clean decoder");
});
