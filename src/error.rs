//! Error types shared across the conversion pipeline.

use std::io;

use crate::schema::ConfigError;

/// Errors produced while loading, quantizing, encoding, decoding or
/// validating sprite containers.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("No frames available to encode")]
    EmptyInput,
    #[error(
        "Frame {index} is {found_width}x{found_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        index: usize,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },
    #[error("Frame buffer holds {actual} bytes, {width}x{height} RGB needs {expected}")]
    InvalidFrame {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid sprite format: {0}")]
    InvalidFormat(String),
    #[error("Sprite is {size} bytes, exceeds limit of {limit} bytes")]
    SizeExceeded { size: u64, limit: u64 },
    #[error("Unsupported sprite version: {0}")]
    UnsupportedVersion(u16),
    #[error("Unsupported color format code: {0}")]
    UnsupportedColorFormat(u8),
    #[error("Unsupported compression code: {0}")]
    UnsupportedCompression(u8),
    #[error("Sprite data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("{field} value {value} does not fit header field (max {max})")]
    FieldOverflow {
        field: &'static str,
        value: usize,
        max: usize,
    },
    #[error("File name {0:?} cannot be used on the device")]
    InvalidFileName(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

/// Failures of the upload transport, kept distinct so callers can tell a
/// refused connection apart from a slow device or a rejected file.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Connection to {url} failed: {message}")]
    ConnectionFailed { url: String, message: String },
    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
    #[error("Device answered HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Device response was not valid JSON: {0}")]
    InvalidResponse(String),
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpriteError>;
