//! DEFLATE for large messages (`miniz_oxide`).
//!
//! A message is sent compressed, with `FLAG_COMPRESSED` on each of its
//! frames, only when it is at least `threshold` bytes long and the
//! deflated form is strictly shorter. Image payloads that are already
//! compressed (PNG, JPEG) usually fail the second test and go out as is.

use log::warn;
use miniz_oxide::deflate::compress_to_vec;
use miniz_oxide::inflate::decompress_to_vec_with_limit;

/// Messages shorter than this are never worth deflating.
pub const DEFAULT_COMPRESS_THRESHOLD: usize = 128;

/// miniz level; 6 is zlib's default trade-off.
const LEVEL: u8 = 6;

/// Inflated messages may not grow past this.
pub const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Deflate `message` if that pays off.
pub fn compress(message: &[u8], threshold: usize) -> Option<Vec<u8>> {
    if message.len() < threshold {
        return None;
    }
    let deflated = compress_to_vec(message, LEVEL);
    (deflated.len() < message.len()).then_some(deflated)
}

/// Inflate a message body. Corrupt or oversized input yields `None`.
pub fn decompress(body: &[u8]) -> Option<Vec<u8>> {
    decompress_to_vec_with_limit(body, MAX_DECOMPRESSED_SIZE)
        .map_err(|e| warn!("compress: inflate failed ({:?})", e.status))
        .ok()
}

// ── Tests ────────────────────────────────────────────────────
