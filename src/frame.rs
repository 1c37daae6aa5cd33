//! Raster frame types flowing through the pipeline.

use image::RgbImage;

use crate::error::{Result, SpriteError};
use crate::quantize::Palette;

/// An RGB color with 8 bits per channel.
pub type Rgb = [u8; 3];

/// Immutable RGB raster, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame from interleaved RGB bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(SpriteError::InvalidFrame {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a frame filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgb) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a frame from a list of pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgb]) -> Result<Self> {
        Self::new(width, height, pixels.concat())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl TryFrom<Frame> for RgbImage {
    type Error = SpriteError;

    fn try_from(frame: Frame) -> Result<Self> {
        let (width, height) = frame.dimensions();
        let actual = frame.data.len();
        RgbImage::from_raw(width, height, frame.data).ok_or(SpriteError::InvalidFrame {
            width,
            height,
            expected: width as usize * height as usize * 3,
            actual,
        })
    }
}

/// A frame expressed as palette indices, one byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexedFrame {
    /// Create an indexed frame; `indices` must hold `width * height` bytes.
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(SpriteError::InvalidFrame {
                width,
                height,
                expected,
                actual: indices.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Palette indices in row-major order.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Expand back to RGB through `palette`, dropping alpha.
    pub fn to_rgb(&self, palette: &Palette) -> Frame {
        let mut data = Vec::with_capacity(self.indices.len() * 3);
        for &index in &self.indices {
            let [r, g, b, _] = palette.entry(index);
            data.extend_from_slice(&[r, g, b]);
        }
        Frame {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
