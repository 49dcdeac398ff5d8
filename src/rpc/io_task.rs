//! Blocking serve loop. Bridges one transport to the engine.
//!
//! ```text
//!  ┌───────────────┐   bytes   ┌───────────┐  frames  ┌───────────────┐
//!  │  Transport    │──────────▶│ RpcEngine │─────────▶│  Transport    │
//!  │  (read)       │           │           │          │  (write)      │
//!  └───────────────┘           └───────────┘          └───────────────┘
//! ```
//!
//! The loop ends when the transport reports end of stream; the client's
//! decoder state is dropped so a later connection starts clean.

use log::{info, warn};

use super::engine::{ClientId, RpcEngine};
use super::transport::Transport;

const READ_BUF_SIZE: usize = 8192;

/// Counters for one served connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Serve requests from `transport` until it closes.
pub fn serve<T: Transport>(
    engine: &mut RpcEngine,
    transport: &mut T,
    client_id: ClientId,
) -> Result<ServeStats, T::Error> {
    let mut stats = ServeStats::default();
    let mut buf = [0u8; READ_BUF_SIZE];
    info!("IO[{}]: serving", client_id);

    loop {
        let n = match transport.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("IO[{}]: read failed: {:?}", client_id, e);
                engine.reset_client(client_id);
                return Err(e);
            }
        };
        stats.bytes_in += n as u64;

        let out = engine.feed_bytes(client_id, &buf[..n]);
        if out.is_empty() {
            continue;
        }
        let written = transport.write_all(&out)?;
        stats.bytes_out += written as u64;
        if written < out.len() {
            warn!("IO[{}]: peer stopped accepting responses", client_id);
            break;
        }
        transport.flush()?;
    }

    engine.reset_client(client_id);
    info!(
        "IO[{}]: closed ({} bytes in, {} bytes out)",
        client_id, stats.bytes_in, stats.bytes_out
    );
    Ok(stats)
}

// ── Tests ────────────────────────────────────────────────────
