//! Binary format definitions for Doki sprite containers.

use std::io::{self, Write};

use crate::error::{Result, SpriteError};
use crate::quantize::PALETTE_BYTES;

/// Magic number: "DOKI" read as a little-endian u32.
pub const SPRITE_MAGIC: u32 = 0x444F_4B49;

/// Magic as it appears on disk (`I K O D`).
pub const SPRITE_MAGIC_BYTES: [u8; 4] = SPRITE_MAGIC.to_le_bytes();

/// Current format version.
pub const SPRITE_VERSION: u16 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 64;

/// Offset of the first frame: header followed by the palette.
pub const FRAME_DATA_OFFSET: usize = HEADER_SIZE + PALETTE_BYTES;

const RESERVED_LEN: usize = 49;

const _: () = assert!(15 + RESERVED_LEN == HEADER_SIZE);

/// Pixel encoding of frame data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ColorFormat {
    /// One palette index per pixel.
    #[default]
    Indexed8 = 0,
    /// 16-bit RGB565. Reserved by the device; never emitted.
    Rgb565 = 1,
    /// 24-bit RGB888. Reserved by the device; never emitted.
    Rgb888 = 2,
}

impl ColorFormat {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(ColorFormat::Indexed8),
            1 => Some(ColorFormat::Rgb565),
            2 => Some(ColorFormat::Rgb888),
            _ => None,
        }
    }

    /// Bytes used by one pixel in this format.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Indexed8 => 1,
            ColorFormat::Rgb565 => 2,
            ColorFormat::Rgb888 => 3,
        }
    }
}

/// Reserved compression code for run-length encoding.
pub const COMPRESSION_RLE: u8 = 1;

/// Reserved compression code for LZ4.
pub const COMPRESSION_LZ4: u8 = 2;

/// Compression applied to frame data.
///
/// Only `None` is produced; [`COMPRESSION_RLE`] and [`COMPRESSION_LZ4`] are
/// reserved codes in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
#[repr(u8)]
pub enum Compression {
    /// Raw frame bytes.
    #[default]
    None = 0,
}

impl Compression {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Compression::None),
            _ => None,
        }
    }
}

/// The 64-byte container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteHeader {
    pub version: u16,
    pub frame_count: u16,
    pub width: u16,
    pub height: u16,
    pub fps: u8,
    pub color_format: ColorFormat,
    pub compression: Compression,
}

impl SpriteHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(2) + FrameCount(2) + Width(2) + Height(2) + Fps(1) +
    /// ColorFormat(1) + Compression(1) + Reserved(49) = 64
    pub const SIZE: usize = HEADER_SIZE;

    /// Size of one frame in bytes.
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize * self.color_format.bytes_per_pixel()
    }

    /// Byte offset of frame `n` from the start of the file.
    pub fn frame_offset(&self, n: usize) -> usize {
        FRAME_DATA_OFFSET + n * self.frame_size()
    }

    /// Total container size implied by this header.
    pub fn file_size(&self) -> usize {
        self.frame_offset(self.frame_count as usize)
    }

    /// Serialize the header. Reserved bytes are zero.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&SPRITE_MAGIC_BYTES);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.frame_count.to_le_bytes());
        buf[8..10].copy_from_slice(&self.width.to_le_bytes());
        buf[10..12].copy_from_slice(&self.height.to_le_bytes());
        buf[12] = self.fps;
        buf[13] = self.color_format as u8;
        buf[14] = self.compression as u8;
        buf
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Parse a header from the first 64 bytes of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(SpriteError::InvalidFormat(format!(
                "{} bytes is too small for a {}-byte header",
                bytes.len(),
                Self::SIZE
            )));
        }
        check_magic_bytes(bytes)?;

        let u16_at = |offset: usize| u16::from_le_bytes([bytes[offset], bytes[offset + 1]]);

        let version = u16_at(4);
        if version != SPRITE_VERSION {
            return Err(SpriteError::UnsupportedVersion(version));
        }

        let color_format =
            ColorFormat::from_u8(bytes[13]).ok_or(SpriteError::UnsupportedColorFormat(bytes[13]))?;
        let compression =
            Compression::from_u8(bytes[14]).ok_or(SpriteError::UnsupportedCompression(bytes[14]))?;

        Ok(Self {
            version,
            frame_count: u16_at(6),
            width: u16_at(8),
            height: u16_at(10),
            fps: bytes[12],
            color_format,
            compression,
        })
    }
}

/// Check that `bytes` starts with [`SPRITE_MAGIC_BYTES`].
pub fn check_magic_bytes(bytes: &[u8]) -> Result<()> {
    let Some(head) = bytes.get(..4) else {
        return Err(SpriteError::InvalidFormat(format!(
            "{} bytes is too small to hold the magic number",
            bytes.len()
        )));
    };
    if head != SPRITE_MAGIC_BYTES {
        return Err(SpriteError::InvalidFormat(format!(
            "expected magic {}, got {}",
            hex(&SPRITE_MAGIC_BYTES),
            hex(head)
        )));
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
