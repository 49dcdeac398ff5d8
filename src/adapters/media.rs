//! Media adapters.
//!
//! | Adapter       | Backing store                         |
//! |---------------|---------------------------------------|
//! | `MediaFolder` | a directory on disk                   |
//! | `MemoryMedia` | hash maps (tests, ephemeral sessions) |
//!
//! Both implement [`MediaPort`] with the same naming rules: a name clash
//! with identical content reuses the existing file, a clash with different
//! content appends the first 8 hex digits of the content's SHA-256.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use hmac_sha256::Hash;
use log::{info, warn};

use crate::app::ports::{MediaError, MediaPort};

// ── Naming ───────────────────────────────────────────────────

/// Validate a media file name: a single path component, not empty.
pub fn check_media_name(name: &str) -> Result<&str, MediaError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(MediaError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

/// Final component of a path, accepting both separators.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn content_hash(data: &[u8]) -> String {
    Hash::hash(data)[..4]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// `photo.png` + data → `photo-1a2b3c4d.png`.
fn hashed_name(name: &str, data: &[u8]) -> String {
    let hash = content_hash(data);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, hash, ext),
        _ => format!("{}-{}", name, hash),
    }
}

/// Decide where `data` goes given a lookup of existing content.
///
/// Returns `(name, needs_write)`.
fn resolve_name(
    desired: &str,
    data: &[u8],
    existing: impl Fn(&str) -> Option<Vec<u8>>,
) -> (String, bool) {
    match existing(desired) {
        None => (desired.to_string(), true),
        Some(current) if current == data => (desired.to_string(), false),
        Some(_) => {
            let alt = hashed_name(desired, data);
            let write = existing(&alt).is_none_or(|c| c != data);
            (alt, write)
        }
    }
}

// ── Filesystem ───────────────────────────────────────────────

/// Media folder on disk. External reads go straight to the filesystem.
pub struct MediaFolder {
    dir: PathBuf,
}

impl MediaFolder {
    /// Open (and create if missing) a media directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| MediaError::Io(e.to_string()))?;
        info!("MediaFolder: {}", dir.display());
        Ok(Self { dir })
    }

    fn read_path(path: &Path) -> Result<Vec<u8>, MediaError> {
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MediaError::NotFound(path.display().to_string()),
            _ => MediaError::Io(format!("{}: {}", path.display(), e)),
        })
    }
}

impl MediaPort for MediaFolder {
    fn read_external(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        Self::read_path(Path::new(path))
    }

    fn add_file(&self, desired_name: &str, data: &[u8]) -> Result<String, MediaError> {
        let desired = check_media_name(desired_name)?;
        let (name, write) = resolve_name(desired, data, |n| fs::read(self.dir.join(n)).ok());
        if write {
            fs::write(self.dir.join(&name), data).map_err(|e| {
                warn!("MediaFolder: write {} failed: {}", name, e);
                MediaError::Io(e.to_string())
            })?;
        }
        Ok(name)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        let name = check_media_name(name)?;
        Self::read_path(&self.dir.join(name))
    }
}

// ── In-memory ────────────────────────────────────────────────

/// Media held in memory. External paths must be seeded with
/// [`insert_external`](Self::insert_external).
#[derive(Default)]
pub struct MemoryMedia {
    external: Mutex<HashMap<String, Vec<u8>>>,
    folder: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `data` readable at `path` through `read_external`.
    pub fn insert_external(&self, path: &str, data: &[u8]) {
        if let Ok(mut ext) = self.external.lock() {
            ext.insert(path.to_string(), data.to_vec());
        }
    }

    /// Names currently in the media folder, sorted.
    pub fn folder_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .folder
            .lock()
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

fn poisoned() -> MediaError {
    MediaError::Io("media lock poisoned".to_string())
}

impl MediaPort for MemoryMedia {
    fn read_external(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        self.external
            .lock()
            .map_err(|_| poisoned())?
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn add_file(&self, desired_name: &str, data: &[u8]) -> Result<String, MediaError> {
        let desired = check_media_name(desired_name)?;
        let mut folder = self.folder.lock().map_err(|_| poisoned())?;
        let (name, write) = resolve_name(desired, data, |n| folder.get(n).cloned());
        if write {
            folder.insert(name.clone(), data.to_vec());
        }
        Ok(name)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, MediaError> {
        self.folder
            .lock()
            .map_err(|_| poisoned())?
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::NotFound(name.to_string()))
    }
}

// ── Tests ────────────────────────────────────────────────────
