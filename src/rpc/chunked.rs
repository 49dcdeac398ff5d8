//! Splitting messages across frames and joining them again.
//!
//! A message longer than the frame limit (typically image bytes in a
//! `GetImageForOcclusion` or `GetImageOcclusionNote` response) travels as
//! a run of chunk frames:
//!
//! ```text
//! [CHUNKED | c]  part 1
//! [CHUNKED | c]  part 2
//! [CHUNKED | LAST_CHUNK | c]  part N        c = COMPRESSED or 0
//! ```
//!
//! The receiver joins the parts first and inflates the whole message
//! afterwards, so the compressed flag describes the message, not the part.

use log::warn;

use super::codec::{FLAG_CHUNKED, FLAG_LAST_CHUNK, FrameHeader};

/// `(flags, part)` pairs for `body`, each part at most `max_part` bytes.
///
/// `message_flags` goes on every part. A body that fits is a single
/// unchunked part.
pub fn chunk_payload(body: &[u8], message_flags: u8, max_part: usize) -> Vec<(u8, &[u8])> {
    let max_part = max_part.max(1);
    if body.len() <= max_part {
        return vec![(message_flags, body)];
    }
    let mut parts: Vec<(u8, &[u8])> = body
        .chunks(max_part)
        .map(|part| (message_flags | FLAG_CHUNKED, part))
        .collect();
    if let Some((flags, _)) = parts.last_mut() {
        *flags |= FLAG_LAST_CHUNK;
    }
    parts
}

enum Assembly {
    Idle,
    Joining { body: Vec<u8>, compressed: bool },
}

/// Joins chunk frames of one peer back into messages.
pub struct ChunkReassembler {
    state: Assembly,
    max_message_size: usize,
}

impl ChunkReassembler {
    /// Messages growing past `max_message_size` are dropped.
    pub fn new(max_message_size: usize) -> Self {
        Self {
            state: Assembly::Idle,
            max_message_size,
        }
    }

    /// Take one frame. Yields `(message, compressed)` when a message is
    /// complete.
    pub fn feed(&mut self, header: FrameHeader, part: &[u8]) -> Option<(Vec<u8>, bool)> {
        if !header.is_chunked() {
            if self.is_active() {
                warn!("chunked: unfinished message dropped");
                self.reset();
            }
            return Some((part.to_vec(), header.is_compressed()));
        }

        let limit = self.max_message_size;
        let Assembly::Joining { body, .. } = self.state_for(header) else {
            return None;
        };
        if body.len() + part.len() > limit {
            warn!("chunked: message exceeds {} bytes, dropped", limit);
            self.reset();
            return None;
        }
        body.extend_from_slice(part);

        if !header.is_last_chunk() {
            return None;
        }
        match core::mem::replace(&mut self.state, Assembly::Idle) {
            Assembly::Joining { body, compressed } => Some((body, compressed)),
            Assembly::Idle => None,
        }
    }

    /// Current assembly, starting one if idle.
    fn state_for(&mut self, header: FrameHeader) -> &mut Assembly {
        if let Assembly::Idle = self.state {
            self.state = Assembly::Joining {
                body: Vec::new(),
                compressed: header.is_compressed(),
            };
        }
        &mut self.state
    }

    /// Drop any partial message.
    pub fn reset(&mut self) {
        self.state = Assembly::Idle;
    }

    /// Whether a message is partly joined.
    pub fn is_active(&self) -> bool {
        matches!(self.state, Assembly::Joining { .. })
    }
}

impl Default for ChunkReassembler {
    fn default() -> Self {
        Self::new(super::compress::MAX_DECOMPRESSED_SIZE)
    }
}

// ── Tests ────────────────────────────────────────────────────
