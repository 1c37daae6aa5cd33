//! Doki sprite container encoding, decoding and validation.
//!
//! # File Format
//!
//! The `.spr` format stores a fixed-size animation of 8-bit indexed frames
//! sharing one palette. All integers are little-endian:
//!
//! ```text
//! Header (64 bytes):
//!   Magic: 0x444F4B49 ("IKOD" on disk) (4 bytes)
//!   Version: u16
//!   Frame count: u16
//!   Frame width: u16
//!   Frame height: u16
//!   FPS: u8
//!   Color format: u8 (0 = indexed 8-bit)
//!   Compression: u8 (0 = none)
//!   Reserved: 49 bytes, zero
//!
//! Palette (1024 bytes):
//!   256 x (R, G, B, A)
//!
//! Frame data (width * height * frame_count bytes):
//!   One palette index per pixel, row-major, frames back to back.
//!   Frame N starts at 1088 + N * width * height.
//! ```

mod container;
mod decoder;
mod encoder;
mod format;
mod validate;

pub use container::SpriteContainer;
pub use encoder::EncodeStats;
pub use format::{
    COMPRESSION_LZ4, COMPRESSION_RLE, ColorFormat, Compression, FRAME_DATA_OFFSET, HEADER_SIZE,
    SPRITE_MAGIC, SPRITE_MAGIC_BYTES, SPRITE_VERSION, SpriteHeader,
};
pub use validate::{DEFAULT_MAX_SIZE, Validator, has_valid_magic};
