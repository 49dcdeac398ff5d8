//! cardbridge server: Main Entry Point
//!
//! Serves the external binding over stdin / stdout. Logs go to stderr.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  MemoryCollection   MediaFolder   StringTable   LogEventSink   │
//! │  (CollectionPort)   (MediaPort)   (StringsPort) (EventSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          Backend (ImageOcclusion · I18n)               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  RpcEngine (MethodTable) ◀── serve ──▶ IoTransport (stdio)     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `cardbridge [config.json]`. `RUST_LOG` selects the log level.

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use cardbridge::adapters::media::MediaFolder;
use cardbridge::adapters::memory_store::MemoryCollection;
use cardbridge::adapters::strings::StringTable;
use cardbridge::app::service::Backend;
use cardbridge::config::BridgeConfig;
use cardbridge::rpc::dispatch::MethodTable;
use cardbridge::rpc::engine::RpcEngine;
use cardbridge::rpc::io_task::serve;
use cardbridge::rpc::transport::IoTransport;

/// The only client of a stdio server.
const STDIO_CLIENT: u32 = 0;

fn main() -> Result<()> {
    init_logging();
    info!("cardbridge v{}", env!("CARGO_PKG_VERSION"));

    // ── Configuration ─────────────────────────────────────────
    let config = match env::args_os().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            let config = BridgeConfig::load(path)?;
            info!("Config loaded from {}", path.display());
            config
        }
        None => {
            info!("No config file given, using defaults");
            BridgeConfig::default()
        }
    };

    // ── Adapters ──────────────────────────────────────────────
    let collection = open_collection(config.collection_path.as_deref())?;
    let media = MediaFolder::open(&config.media_dir)
        .with_context(|| format!("opening media folder {}", config.media_dir.display()))?;
    let mut strings = StringTable::builtin().with_langs(config.langs.clone());
    if let Some(dir) = &config.resource_dir {
        strings = strings
            .with_resource_dir(dir)
            .with_context(|| format!("reading resources from {}", dir.display()))?;
    }

    // ── Services + RPC ────────────────────────────────────────
    let backend = Arc::new(Backend::new(collection, media, strings));
    let mut engine = RpcEngine::new(MethodTable::backend(backend.clone()), config.frame_limits());
    let mut transport = IoTransport::new(io::stdin().lock(), io::stdout().lock());

    info!("Ready. Serving on stdio.");
    let stats = serve(&mut engine, &mut transport, STDIO_CLIENT).context("serving stdio")?;
    info!(
        "Input closed after {} requests ({} bytes in, {} bytes out)",
        engine.handled(),
        stats.bytes_in,
        stats.bytes_out
    );

    // ── Shutdown ──────────────────────────────────────────────
    if let Some(path) = &config.collection_path {
        save_collection(backend.collection(), path)?;
    }
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_collection(path: Option<&Path>) -> Result<MemoryCollection> {
    let Some(path) = path else {
        return Ok(MemoryCollection::new());
    };
    match fs::read(path) {
        Ok(bytes) => MemoryCollection::from_snapshot(&bytes)
            .with_context(|| format!("loading collection {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Collection {} not found, starting empty", path.display());
            Ok(MemoryCollection::new())
        }
        Err(e) => Err(e).with_context(|| format!("reading collection {}", path.display())),
    }
}

/// Write the snapshot next to `path`, then rename over it.
fn save_collection(collection: &MemoryCollection, path: &Path) -> Result<()> {
    let bytes = collection.snapshot()?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    info!(
        "Collection saved to {} ({} notes, {} bytes)",
        path.display(),
        collection.note_count(),
        bytes.len()
    );
    Ok(())
}
