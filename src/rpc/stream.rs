//! Message streams over frames.
//!
//! [`encode_message`] turns one envelope into wire bytes (compress when it
//! pays, then chunk to the frame limit). [`MessageReader`] runs the same
//! pipeline backwards for one peer and yields complete envelopes.
//!
//! ```text
//!  envelope ─▶ compress? ─▶ chunk_payload ─▶ encode_frame ─▶ bytes
//!  bytes ─▶ FrameDecoder ─▶ ChunkReassembler ─▶ decompress? ─▶ envelope
//! ```

use log::warn;

use super::chunked::{ChunkReassembler, chunk_payload};
use super::codec::{
    DEFAULT_MAX_FRAME_SIZE, FLAG_COMPRESSED, FrameDecoder, MAX_FRAME_SIZE, encode_frame,
};
use super::compress::{DEFAULT_COMPRESS_THRESHOLD, MAX_DECOMPRESSED_SIZE, compress, decompress};

/// Size limits shared by both ends of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    /// Largest frame payload; bigger messages are chunked.
    pub max_frame_size: usize,
    /// Messages at least this large are considered for compression.
    pub compress_threshold: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            compress_threshold: DEFAULT_COMPRESS_THRESHOLD,
        }
    }
}

/// Encode one message into one or more frames.
///
/// An empty message produces no bytes. Parts never exceed
/// [`MAX_FRAME_SIZE`], whatever `limits` asks for.
pub fn encode_message(message: &[u8], limits: FrameLimits) -> Vec<u8> {
    let (body, flags) = match compress(message, limits.compress_threshold) {
        Some(c) => (c, FLAG_COMPRESSED),
        None => (message.to_vec(), 0),
    };
    let max_part = limits.max_frame_size.clamp(1, MAX_FRAME_SIZE);
    chunk_payload(&body, flags, max_part)
        .into_iter()
        .filter_map(|(f, part)| encode_frame(f, part))
        .flatten()
        .collect()
}

/// Inbound message pipeline for a single peer.
pub struct MessageReader {
    decoder: FrameDecoder,
    reassembler: ChunkReassembler,
}

impl Default for MessageReader {
    fn default() -> Self {
        Self::new(FrameLimits::default())
    }
}

impl MessageReader {
    pub fn new(limits: FrameLimits) -> Self {
        Self {
            decoder: FrameDecoder::new(limits.max_frame_size),
            reassembler: ChunkReassembler::new(MAX_DECOMPRESSED_SIZE),
        }
    }

    /// Feed raw bytes; returns every message they complete.
    ///
    /// Messages that fail to decompress are logged and dropped.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for frame in self.decoder.feed(data) {
            let Some((payload, compressed)) = self.reassembler.feed(frame.header, &frame.payload)
            else {
                continue;
            };
            if !compressed {
                out.push(payload);
                continue;
            }
            match decompress(&payload) {
                Some(plain) => out.push(plain),
                None => warn!("stream: dropped {} byte message", payload.len()),
            }
        }
        out
    }

    /// Discard partial frames and chunks.
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.reassembler.reset();
    }

    /// Whether bytes of an unfinished message are buffered.
    pub fn is_idle(&self) -> bool {
        !self.decoder.is_mid_frame() && !self.reassembler.is_active()
    }
}

// ── Tests ────────────────────────────────────────────────────
