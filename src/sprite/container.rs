//! In-memory sprite container.

use super::format::{ColorFormat, Compression, SPRITE_VERSION, SpriteHeader};
use crate::error::{Result, SpriteError};
use crate::frame::IndexedFrame;
use crate::quantize::{Palette, Quantized};

/// A complete animation ready to be serialized: header fields, the shared
/// palette and indexed frames in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteContainer {
    header: SpriteHeader,
    palette: Palette,
    frames: Vec<IndexedFrame>,
}

impl SpriteContainer {
    /// Build a container from quantizer output.
    ///
    /// Fails with [`SpriteError::FieldOverflow`] when the frame count or
    /// dimensions do not fit their 16-bit header fields.
    pub fn from_quantized(quantized: Quantized, fps: u8) -> Result<Self> {
        let frame_count = fit_u16("frame count", quantized.frames.len())?;
        let width = fit_u16("frame width", quantized.width as usize)?;
        let height = fit_u16("frame height", quantized.height as usize)?;

        Ok(Self {
            header: SpriteHeader {
                version: SPRITE_VERSION,
                frame_count,
                width,
                height,
                fps,
                color_format: ColorFormat::Indexed8,
                compression: Compression::None,
            },
            palette: quantized.palette,
            frames: quantized.frames,
        })
    }

    /// Assemble a container from already validated parts.
    pub(crate) fn from_parts(
        header: SpriteHeader,
        palette: Palette,
        frames: Vec<IndexedFrame>,
    ) -> Self {
        Self {
            header,
            palette,
            frames,
        }
    }

    pub fn header(&self) -> &SpriteHeader {
        &self.header
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn frames(&self) -> &[IndexedFrame] {
        &self.frames
    }

    /// Get a specific frame, or `None` if out of range.
    pub fn frame(&self, index: usize) -> Option<&IndexedFrame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Get frame dimensions.
    pub fn dimensions(&self) -> (u16, u16) {
        (self.header.width, self.header.height)
    }

    pub fn fps(&self) -> u8 {
        self.header.fps
    }

    /// Exact number of bytes [`write_to`](Self::write_to) produces.
    pub fn encoded_len(&self) -> usize {
        self.header.file_size()
    }
}

fn fit_u16(field: &'static str, value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| SpriteError::FieldOverflow {
        field,
        value,
        max: u16::MAX as usize,
    })
}
