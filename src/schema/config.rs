//! Configuration types for conversion, validation and upload.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TestPattern;
use crate::sprite::DEFAULT_MAX_SIZE;

/// Frame rate used when neither the caller nor the source provides one.
pub const DEFAULT_FPS: u8 = 30;

/// Device endpoint receiving uploaded containers.
pub const DEFAULT_UPLOAD_PATH: &str = "/api/animations/upload";

/// Default upload timeout in seconds.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

fn default_max_size() -> Option<u64> {
    Some(DEFAULT_MAX_SIZE)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_UPLOAD_TIMEOUT_SECS
}

fn default_upload_path() -> String {
    DEFAULT_UPLOAD_PATH.to_string()
}

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Frame loading and encoding options.
    #[serde(default)]
    pub convert: ConvertConfig,
    /// Container validation policy.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Upload client options.
    #[serde(default)]
    pub upload: UploadConfig,
}

impl SpriteConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.convert.validate()?;
        self.upload.validate()
    }
}

/// Options controlling how frames become a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertConfig {
    /// Playback rate. `None` defers to the source's hint, then [`DEFAULT_FPS`].
    #[serde(default)]
    pub fps: Option<u8>,
    /// Test pattern parameters, used when the input is `test`.
    #[serde(default)]
    pub pattern: TestPattern,
    /// Resize every frame before quantization.
    #[serde(default)]
    pub resize: Option<ResizeConfig>,
}

impl ConvertConfig {
    /// Pick the playback rate: explicit setting, then `hint`, then default.
    pub fn resolve_fps(&self, hint: Option<u8>) -> u8 {
        self.fps.or(hint).unwrap_or(DEFAULT_FPS)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pattern.validate()?;
        if let Some(resize) = &self.resize {
            if resize.width == 0 || resize.height == 0 {
                return Err(ConfigError::InvalidResizeDimensions);
            }
        }
        Ok(())
    }
}

/// Target size for frame normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
}

impl FromStr for ResizeConfig {
    type Err = ConfigError;

    /// Parse `WIDTHxHEIGHT`, e.g. `128x96`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResizeSpec(s.to_string());
        let (w, h) = s.split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResizeDimensions);
        }
        Ok(Self { width, height })
    }
}

/// Policy applied by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum container size in bytes; `None` disables the check.
    #[serde(default = "default_max_size")]
    pub max_size: Option<u64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
        }
    }
}

/// Upload client parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Endpoint path on the device.
    #[serde(default = "default_upload_path")]
    pub path: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            path: default_upload_path(),
        }
    }
}

impl UploadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidUploadPath(self.path.clone()));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Test pattern width and height must be non-zero")]
    InvalidPatternDimensions,
    #[error("Test pattern {width}x{height} exceeds the {max}x{max} limit")]
    PatternTooLarge { width: u32, height: u32, max: u32 },
    #[error("Resize width and height must be non-zero")]
    InvalidResizeDimensions,
    #[error("Invalid resize spec '{0}', expected WIDTHxHEIGHT")]
    InvalidResizeSpec(String),
    #[error("Unknown test pattern '{0}'")]
    UnknownPattern(String),
    #[error("Upload timeout must be positive")]
    InvalidTimeout,
    #[error("Upload path '{0}' must start with '/'")]
    InvalidUploadPath(String),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
