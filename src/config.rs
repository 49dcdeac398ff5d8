//! Bridge configuration parameters
//!
//! All tunable parameters for the cardbridge server. Values come from an
//! optional JSON file; missing keys keep their defaults and unknown keys
//! are ignored.

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rpc::codec::{DEFAULT_MAX_FRAME_SIZE, MAX_FRAME_SIZE};
use crate::rpc::compress::DEFAULT_COMPRESS_THRESHOLD;
use crate::rpc::stream::FrameLimits;

/// Smallest accepted frame limit.
pub const MIN_FRAME_SIZE: usize = 64;

/// Core bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    // --- Framing ---
    /// Largest frame payload in bytes; larger messages are chunked
    pub max_frame_size: usize,
    /// Messages at least this large are DEFLATE-compressed when it helps
    pub compress_threshold: usize,

    // --- Storage ---
    /// Directory holding collection media
    pub media_dir: PathBuf,
    /// Collection snapshot loaded at start and written on shutdown
    pub collection_path: Option<PathBuf>,

    // --- Localisation ---
    /// Language tags, most preferred first
    pub langs: Vec<String>,
    /// Directory of `<module>.ftl` files layered over the bundled strings
    pub resource_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // Framing
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            compress_threshold: DEFAULT_COMPRESS_THRESHOLD,

            // Storage
            media_dir: PathBuf::from("media"),
            collection_path: None,

            // Localisation
            langs: vec!["en-US".to_string()],
            resource_dir: None,
        }
    }
}

/// Configuration load / validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read(String),
    Parse(String),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "cannot read config: {}", msg),
            Self::Parse(msg) => write!(f, "cannot parse config: {}", msg),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl BridgeConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&self.max_frame_size) {
            return Err(ConfigError::Invalid("max_frame_size out of range"));
        }
        if self.langs.is_empty() {
            return Err(ConfigError::Invalid("langs must not be empty"));
        }
        if self.langs.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::Invalid("langs must not contain blank tags"));
        }
        if self.media_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("media_dir must not be empty"));
        }
        Ok(())
    }

    pub fn frame_limits(&self) -> FrameLimits {
        FrameLimits {
            max_frame_size: self.max_frame_size,
            compress_threshold: self.compress_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = BridgeConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.compress_threshold < c.max_frame_size);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = BridgeConfig::from_json(r#"{"max_frame_size": 4096, "future_key": 1}"#).unwrap();
        assert_eq!(c.max_frame_size, 4096);
        assert_eq!(c.compress_threshold, DEFAULT_COMPRESS_THRESHOLD);
        assert_eq!(c.langs, vec!["en-US"]);
    }

    #[test]
    fn tiny_frames_rejected() {
        let err = BridgeConfig::from_json(r#"{"max_frame_size": 8}"#).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("max_frame_size out of range"));
    }

    #[test]
    fn empty_langs_rejected() {
        assert!(BridgeConfig::from_json(r#"{"langs": []}"#).is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            BridgeConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn postcard_roundtrip() {
        let c = BridgeConfig {
            collection_path: Some(PathBuf::from("/var/lib/cardbridge/collection.bin")),
            ..BridgeConfig::default()
        };
        let bytes = postcard::to_allocvec(&c).unwrap();
        let c2: BridgeConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(c, c2);
    }
}
