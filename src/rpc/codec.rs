//! Length-prefix frame codec.
//!
//! Wire format:
//! ```text
//! ┌────────────┬───────────┬─────────────────────────┐
//! │ Length (4B)│ Flags (1B)│ Envelope payload (N B)  │
//! │ LE u32     │           │                         │
//! └────────────┴───────────┴─────────────────────────┘
//! ```
//!
//! `Length` counts payload bytes only. The decoder accumulates incoming
//! bytes and yields complete frames, so a single transport read may carry
//! part of a header, part of a payload, or several frames at once.

/// Payload is DEFLATE-compressed (set on every chunk of a compressed message).
pub const FLAG_COMPRESSED: u8 = 0x01;
/// Frame is one chunk of a larger message.
pub const FLAG_CHUNKED: u8 = 0x02;
/// Final chunk of a chunked message.
pub const FLAG_LAST_CHUNK: u8 = 0x04;

/// Upper bound for any configured frame size.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Default frame payload limit.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Length + flags.
pub const HEADER_SIZE: usize = 5;

/// Per-frame flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub flags: u8,
}

impl FrameHeader {
    pub fn is_compressed(self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn is_chunked(self) -> bool {
        self.flags & FLAG_CHUNKED != 0
    }

    pub fn is_last_chunk(self) -> bool {
        self.flags & FLAG_LAST_CHUNK != 0
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub header: FrameHeader,
    pub payload: Vec<u8>,
}

/// Decoder state machine.
enum DecoderState {
    /// Waiting for header bytes.
    ReadingHeader { collected: usize },
    /// Header received, reading payload.
    ReadingPayload { expected: usize, flags: u8 },
}

/// Streaming frame decoder.
pub struct FrameDecoder {
    state: DecoderState,
    header_buf: [u8; HEADER_SIZE],
    payload_buf: Vec<u8>,
    max_frame_size: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl FrameDecoder {
    /// Decoder accepting payloads up to `max_frame_size` bytes (clamped
    /// to [`MAX_FRAME_SIZE`]).
    pub fn new(max_frame_size: usize) -> Self {
        Self {
            state: DecoderState::ReadingHeader { collected: 0 },
            header_buf: [0; HEADER_SIZE],
            payload_buf: Vec::new(),
            max_frame_size: max_frame_size.clamp(1, MAX_FRAME_SIZE),
        }
    }

    /// Feed bytes into the decoder and collect every frame they complete.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            match &mut self.state {
                DecoderState::ReadingHeader { collected } => {
                    let needed = HEADER_SIZE - *collected;
                    let to_copy = needed.min(data.len() - offset);

                    self.header_buf[*collected..*collected + to_copy]
                        .copy_from_slice(&data[offset..offset + to_copy]);

                    *collected += to_copy;
                    offset += to_copy;

                    if *collected == HEADER_SIZE {
                        let mut len = [0u8; 4];
                        len.copy_from_slice(&self.header_buf[..4]);
                        let expected = u32::from_le_bytes(len) as usize;
                        let flags = self.header_buf[4];

                        if expected == 0 || expected > self.max_frame_size {
                            // Invalid frame, reset.
                            self.state = DecoderState::ReadingHeader { collected: 0 };
                            continue;
                        }

                        self.payload_buf.clear();
                        self.payload_buf.reserve(expected);
                        self.state = DecoderState::ReadingPayload { expected, flags };
                    }
                }

                DecoderState::ReadingPayload { expected, flags } => {
                    let needed = *expected - self.payload_buf.len();
                    let to_copy = needed.min(data.len() - offset);

                    self.payload_buf
                        .extend_from_slice(&data[offset..offset + to_copy]);
                    offset += to_copy;

                    if self.payload_buf.len() == *expected {
                        frames.push(Frame {
                            header: FrameHeader { flags: *flags },
                            payload: core::mem::take(&mut self.payload_buf),
                        });
                        self.state = DecoderState::ReadingHeader { collected: 0 };
                    }
                }
            }
        }

        frames
    }

    /// Reset decoder state (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.state = DecoderState::ReadingHeader { collected: 0 };
        self.payload_buf.clear();
    }

    /// Whether a frame is partially buffered.
    pub fn is_mid_frame(&self) -> bool {
        !matches!(self.state, DecoderState::ReadingHeader { collected: 0 })
    }
}

/// Encode a payload into a length-prefixed frame.
///
/// Returns `None` when the payload is empty or exceeds [`MAX_FRAME_SIZE`].
pub fn encode_frame(flags: u8, payload: &[u8]) -> Option<Vec<u8>> {
    if payload.is_empty() || payload.len() > MAX_FRAME_SIZE {
        return None;
    }
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.push(flags);
    out.extend_from_slice(payload);
    Some(out)
}

// ── Tests ────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame() {
        let mut dec = FrameDecoder::default();
        let bytes = encode_frame(0, b"hello").unwrap();
        let frames = dec.feed(&bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, b"hello");
        assert!(!frames[0].header.is_compressed());
    }

    #[test]
    fn byte_at_a_time() {
        let mut dec = FrameDecoder::default();
        let bytes = encode_frame(FLAG_COMPRESSED, b"split me").unwrap();
        let mut out = Vec::new();
        for b in &bytes {
            out.extend(dec.feed(core::slice::from_ref(b)));
        }
        assert_eq!(out.len(), 1);
        assert!(out[0].header.is_compressed());
        assert_eq!(out[0].payload, b"split me");
    }

    #[test]
    fn two_frames_in_one_read() {
        let mut dec = FrameDecoder::default();
        let mut bytes = encode_frame(0, b"one").unwrap();
        bytes.extend(encode_frame(FLAG_CHUNKED, b"two").unwrap());
        let frames = dec.feed(&bytes);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].payload, b"two");
        assert!(frames[1].header.is_chunked());
    }

    #[test]
    fn oversized_header_resets() {
        let mut dec = FrameDecoder::new(8);
        let mut bytes = encode_frame(0, b"too long for eight").unwrap();
        bytes.truncate(HEADER_SIZE);
        assert!(dec.feed(&bytes).is_empty());
        assert!(!dec.is_mid_frame());

        let frames = dec.feed(&encode_frame(0, b"ok").unwrap());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload, b"ok");
    }

    #[test]
    fn zero_length_header_resets() {
        let mut dec = FrameDecoder::default();
        assert!(dec.feed(&[0, 0, 0, 0, 0]).is_empty());
        assert!(!dec.is_mid_frame());
    }

    #[test]
    fn encode_rejects_empty() {
        assert!(encode_frame(0, b"").is_none());
    }
}
