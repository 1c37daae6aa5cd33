//! Reading containers back, with the checks the device loader applies.

use std::fs;
use std::path::Path;

use super::container::SpriteContainer;
use super::format::{ColorFormat, HEADER_SIZE, SpriteHeader};
use crate::error::{Result, SpriteError};
use crate::frame::{Frame, IndexedFrame};
use crate::quantize::{PALETTE_BYTES, Palette};

impl SpriteContainer {
    /// Open a `.spr` file and decode it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a container from raw bytes.
    ///
    /// Trailing data past the last frame is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = SpriteHeader::parse(bytes)?;
        if header.color_format != ColorFormat::Indexed8 {
            return Err(SpriteError::UnsupportedColorFormat(header.color_format as u8));
        }

        let expected = header.file_size();
        if bytes.len() < expected {
            return Err(SpriteError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let mut palette_bytes = [0u8; PALETTE_BYTES];
        palette_bytes.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + PALETTE_BYTES]);
        let palette = Palette::from_bytes(&palette_bytes);

        let frame_size = header.frame_size();
        let mut frames = Vec::with_capacity(header.frame_count as usize);
        for n in 0..header.frame_count as usize {
            let start = header.frame_offset(n);
            frames.push(IndexedFrame::new(
                header.width as u32,
                header.height as u32,
                bytes[start..start + frame_size].to_vec(),
            )?);
        }

        log::debug!(
            "Decoded sprite: {} frames, {}x{} @ {} fps",
            header.frame_count,
            header.width,
            header.height,
            header.fps
        );

        Ok(Self::from_parts(header, palette, frames))
    }

    /// Expand every frame back to RGB through the palette.
    pub fn rgb_frames(&self) -> Vec<Frame> {
        self.frames()
            .iter()
            .map(|f| f.to_rgb(self.palette()))
            .collect()
    }
}
