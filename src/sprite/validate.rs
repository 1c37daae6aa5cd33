//! Transport-side checks on container bytes.
//!
//! Magic validation is a format requirement. The size ceiling is a policy of
//! the upload path and is kept separate so callers can override or skip it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::format::check_magic_bytes;
use crate::error::{Result, SpriteError};
use crate::schema::ValidationConfig;

/// Default size ceiling: 1 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024;

/// Returns true if `bytes` begins with the sprite magic number.
pub fn has_valid_magic(bytes: &[u8]) -> bool {
    check_magic_bytes(bytes).is_ok()
}

/// Checks container bytes against the magic number and an optional size
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_size: Option<u64>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_size: Some(DEFAULT_MAX_SIZE),
        }
    }
}

impl Validator {
    /// Validator with the given ceiling (`None` disables the size check).
    pub fn new(max_size: Option<u64>) -> Self {
        Self { max_size }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.max_size)
    }

    /// Validator that only checks the magic number.
    pub fn magic_only() -> Self {
        Self::new(None)
    }

    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    /// Fails with [`SpriteError::InvalidFormat`] unless `bytes` starts with
    /// the magic number.
    pub fn check_magic(&self, bytes: &[u8]) -> Result<()> {
        check_magic_bytes(bytes)
    }

    /// Fails with [`SpriteError::SizeExceeded`] if `size` is over the ceiling.
    pub fn check_size(&self, size: u64) -> Result<()> {
        match self.max_size {
            Some(limit) if size > limit => Err(SpriteError::SizeExceeded { size, limit }),
            _ => Ok(()),
        }
    }

    /// Run both checks on an in-memory buffer.
    pub fn validate(&self, bytes: &[u8]) -> Result<()> {
        self.check_magic(bytes)?;
        self.check_size(bytes.len() as u64)
    }

    /// Run both checks on a file, reading only its first four bytes.
    ///
    /// Returns the file size on success.
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("spr") {
            log::warn!("{} does not have a .spr extension", path.display());
        }

        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        let mut head = Vec::with_capacity(4);
        file.by_ref().take(4).read_to_end(&mut head)?;
        self.check_magic(&head)?;
        self.check_size(size)?;

        log::debug!("{} is a valid sprite ({} bytes)", path.display(), size);
        Ok(size)
    }
}
