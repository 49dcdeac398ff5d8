//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - [`IoTransport`]: any `Read` + `Write` pair (stdin/stdout, pipes, TCP)
//! - [`LoopbackTransport`]: an in-process [`RpcEngine`] on the other end
//! - [`NullTransport`]: discards writes, never reads
//!
//! The client and the serve loop are generic over `Transport`, so adding
//! a new transport requires zero changes to the RPC logic.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use log::warn;

use super::engine::{ClientId, RpcEngine};

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read; 0 means the peer has
    /// nothing more to send.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading without blocking.
    fn available(&self) -> bool;

    /// Write all of `data`, retrying short writes.
    ///
    /// Returns how many bytes the transport accepted. That is less than
    /// `data.len()` only when a write accepted nothing; callers must treat
    /// such a short count as a lost message.
    fn write_all(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        while written < data.len() {
            let n = self.write(&data[written..])?;
            if n == 0 {
                warn!("transport: write stalled after {} of {} bytes", written, data.len());
                break;
            }
            written += n;
        }
        Ok(written)
    }
}

/// A null transport that discards all writes and never reads.
/// Useful as a default when no peer is connected.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}

// ── std::io ──────────────────────────────────────────────────

/// Blocking transport over a reader and a writer.
pub struct IoTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: Read, W: Write> IoTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W: Write> Transport for IoTransport<R, W> {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.reader.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.writer.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn available(&self) -> bool {
        true
    }
}

// ── Loopback ─────────────────────────────────────────────────

/// Transport whose peer is an engine in the same process.
///
/// Writes are fed straight into the engine; its responses queue up for
/// the next reads.
pub struct LoopbackTransport {
    engine: RpcEngine,
    client_id: ClientId,
    inbound: VecDeque<u8>,
}

impl LoopbackTransport {
    pub fn new(engine: RpcEngine, client_id: ClientId) -> Self {
        Self {
            engine,
            client_id,
            inbound: VecDeque::new(),
        }
    }

    pub fn engine(&self) -> &RpcEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RpcEngine {
        &mut self.engine
    }

    /// Bytes waiting to be read.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl Transport for LoopbackTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let out = self.engine.feed_bytes(self.client_id, data);
        self.inbound.extend(out);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.inbound.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────
