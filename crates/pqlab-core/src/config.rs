//! User configuration
//!
//! Read from `~/.pqlab/config.json` unless a path is given. Every field is
//! optional; a missing file is the same as an empty one.

use std::path::{Path, PathBuf};

use pqlab_crypto::Family;
use serde::{Deserialize, Serialize};

use crate::codec::{ByteFormat, DEFAULT_PREVIEW_LEN};
use crate::render::RenderOptions;
use crate::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Elements shown in collapsed byte previews
    pub preview_len: usize,
    pub byte_format: ByteFormat,
    /// Print full byte arrays instead of previews
    pub expanded: bool,
    /// Print a notice before running a slow parameter set
    pub slow_warning: bool,
    pub default_messages: DefaultMessages,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preview_len: DEFAULT_PREVIEW_LEN,
            byte_format: ByteFormat::Array,
            expanded: false,
            slow_warning: true,
            default_messages: DefaultMessages::default(),
        }
    }
}

/// Messages signed when the user supplies none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultMessages {
    pub ml_dsa: String,
    pub slh_dsa: String,
}

impl Default for DefaultMessages {
    fn default() -> Self {
        Self {
            ml_dsa: "This is a default test message for ML-DSA signature.".to_string(),
            slh_dsa: "This is a default test message for SLH-DSA signature.".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".pqlab").join("config.json"))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => path,
            None => {
                tracing::debug!("no home directory, using default config");
                return Ok(Self::default());
            }
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_json(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).map_err(|e| CoreError::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        if config.preview_len == 0 {
            return Err(CoreError::Config {
                path: origin.to_string(),
                message: "preview_len must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    /// Message to sign for `family` when the user gave none. KEMs sign nothing.
    pub fn default_message(&self, family: Family) -> &str {
        match family {
            Family::MlDsa => &self.default_messages.ml_dsa,
            Family::SlhDsa => &self.default_messages.slh_dsa,
            Family::MlKem => "",
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            expanded: self.expanded,
            format: self.byte_format,
            limit: self.preview_len,
        }
    }
}
