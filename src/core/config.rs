//! Codec configuration.
//!
//! Loaded from TOML text by the caller; the library never reads files or the
//! environment on its own.
//!
//! ```toml
//! max_document_size = 1048576
//! default_format = "tron"
//! pretty_json = true
//! ```

use crate::core::error::VbriefError;
use crate::plugins::codec::Format;
use serde::{Deserialize, Serialize};

/// Default cap on bytes read from a stream: 10 MiB.
pub const MAX_DOCUMENT_SIZE: usize = 10 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum bytes accepted from a reader before failing with `DocumentTooLarge`.
    pub max_document_size: usize,
    /// Format used by `Parser::from_config` and `Serializer::convert_default`.
    pub default_format: String,
    /// Indent JSON output.
    pub pretty_json: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_document_size: MAX_DOCUMENT_SIZE,
            default_format: Format::Json.as_str().to_string(),
            pretty_json: false,
        }
    }
}

impl CodecConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, VbriefError> {
        let config: CodecConfig =
            toml::from_str(content).map_err(|e| VbriefError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Parsed `default_format`.
    pub fn format(&self) -> Result<Format, VbriefError> {
        self.default_format.parse()
    }

    fn check(&self) -> Result<(), VbriefError> {
        if self.max_document_size == 0 {
            return Err(VbriefError::Config(
                "max_document_size must be greater than zero".to_string(),
            ));
        }
        self.format()?;
        Ok(())
    }
}
