//! Palette quantization shared across all frames of an animation.
//!
//! The container stores a single palette, so colors are gathered from the
//! union of every frame before any frame is indexed:
//!
//! 1. Validate the frame set (non-empty, equal dimensions).
//! 2. Build one [`ColorHistogram`] over all pixels.
//! 3. Derive 256 palette entries: exact when the animation uses at most 256
//!    colors, median cut otherwise, padding unused slots.
//! 4. Map every pixel to its nearest palette entry.

mod histogram;
mod median_cut;
mod palette;

use std::collections::HashMap;

pub use histogram::{ColorCount, ColorHistogram};
pub use median_cut::median_cut;
pub use palette::{PADDING_COLOR, PALETTE_BYTES, PALETTE_LEN, Palette, distance_sq};

use crate::error::{Result, SpriteError};
use crate::frame::{Frame, IndexedFrame};

/// Output of quantizing a frame set.
#[derive(Debug, Clone)]
pub struct Quantized {
    /// Frame width shared by every frame.
    pub width: u32,
    /// Frame height shared by every frame.
    pub height: u32,
    /// The shared palette.
    pub palette: Palette,
    /// Indexed frames in input order.
    pub frames: Vec<IndexedFrame>,
    /// Distinct colors seen across all frames.
    pub distinct_colors: usize,
}

impl Quantized {
    /// True when every source color is present verbatim in the palette.
    pub fn is_exact(&self) -> bool {
        self.distinct_colors <= PALETTE_LEN
    }
}

/// Quantize `frames` to one shared 256-color palette.
///
/// Takes ownership of the frame buffer: the palette must reflect the complete
/// set, and nothing else should touch the frames while it is built.
pub fn quantize(frames: Vec<Frame>) -> Result<Quantized> {
    let (width, height) = check_dimensions(&frames)?;

    let histogram = ColorHistogram::from_frames(&frames);
    let distinct_colors = histogram.len();
    log::info!(
        "Quantizing {} frames ({}x{}), {} distinct colors",
        frames.len(),
        width,
        height,
        distinct_colors
    );

    let colors = if distinct_colors <= PALETTE_LEN {
        histogram.entries().iter().map(|e| e.color).collect()
    } else {
        median_cut(histogram.entries().to_vec(), PALETTE_LEN)
    };
    let palette = Palette::from_colors(&colors);

    // Palette is final from here on; index every frame against it.
    let lookup: HashMap<u32, u8> = histogram
        .entries()
        .iter()
        .map(|e| (e.key(), palette.nearest(e.color)))
        .collect();

    let mut indexed = Vec::with_capacity(frames.len());
    for frame in &frames {
        let indices = frame
            .pixels()
            .map(|p| {
                lookup
                    .get(&histogram::pack(p))
                    .copied()
                    .unwrap_or_else(|| palette.nearest(p))
            })
            .collect();
        indexed.push(IndexedFrame::new(width, height, indices)?);
    }

    log::info!("Generated palette with {} colors", colors.len());

    Ok(Quantized {
        width,
        height,
        palette,
        frames: indexed,
        distinct_colors,
    })
}

/// Ensure there is at least one frame and all frames match the first.
fn check_dimensions(frames: &[Frame]) -> Result<(u32, u32)> {
    let first = frames.first().ok_or(SpriteError::EmptyInput)?;
    let (width, height) = first.dimensions();
    for (index, frame) in frames.iter().enumerate().skip(1) {
        if frame.dimensions() != (width, height) {
            return Err(SpriteError::DimensionMismatch {
                index,
                expected_width: width,
                expected_height: height,
                found_width: frame.width(),
                found_height: frame.height(),
            });
        }
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32, shift: u32) -> Frame {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    ((x * 255) / width.max(1)) as u8,
                    ((y * 255) / height.max(1)) as u8,
                    ((x + y + shift) * 37 % 256) as u8,
                ]);
            }
        }
        Frame::new(width, height, data).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(quantize(vec![]), Err(SpriteError::EmptyInput)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let frames = vec![
            Frame::solid(4, 4, [0, 0, 0]),
            Frame::solid(4, 4, [0, 0, 0]),
            Frame::solid(4, 5, [0, 0, 0]),
        ];
        match quantize(frames) {
            Err(SpriteError::DimensionMismatch {
                index,
                found_height,
                ..
            }) => {
                assert_eq!(index, 2);
                assert_eq!(found_height, 5);
            }
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_single_pixel_full_palette() {
        let q = quantize(vec![Frame::solid(1, 1, [12, 34, 56])]).unwrap();
        assert_eq!(q.palette.entries().len(), 256);
        assert_eq!(q.palette.entry(0), [12, 34, 56, 255]);
        assert_eq!(q.palette.entry(255), PADDING_COLOR);
        assert_eq!(q.frames[0].indices(), &[0]);
    }

    #[test]
    fn test_black_frames_map_to_same_index() {
        let frames = vec![Frame::solid(4, 4, [0, 0, 0]); 3];
        let q = quantize(frames).unwrap();
        assert_eq!(q.frames.len(), 3);
        for frame in &q.frames {
            assert!(frame.indices().iter().all(|&i| i == 0));
        }
        assert_eq!(q.palette.entry(0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_exact_quantization_reconstructs() {
        let frame = Frame::from_pixels(
            2,
            2,
            &[[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        )
        .unwrap();
        let q = quantize(vec![frame.clone()]).unwrap();
        assert!(q.is_exact());
        assert_eq!(q.frames[0].to_rgb(&q.palette), frame);
    }

    #[test]
    fn test_palette_shared_across_frames() {
        let a = Frame::solid(2, 2, [255, 0, 0]);
        let b = Frame::solid(2, 2, [0, 0, 255]);
        let q = quantize(vec![a, b]).unwrap();
        let red = q.frames[0].indices()[0];
        let blue = q.frames[1].indices()[0];
        assert_ne!(red, blue);
        assert_eq!(q.palette.entry(red), [255, 0, 0, 255]);
        assert_eq!(q.palette.entry(blue), [0, 0, 255, 255]);
    }

    #[test]
    fn test_many_colors_nearest_mapping() {
        let frames = vec![gradient(64, 32, 0), gradient(64, 32, 5)];
        let q = quantize(frames.clone()).unwrap();
        assert!(!q.is_exact());

        for (frame, indexed) in frames.iter().zip(&q.frames) {
            for (pixel, &index) in frame.pixels().zip(indexed.indices()) {
                assert_eq!(q.palette.nearest(pixel), index);
            }
        }
    }

    #[test]
    fn test_deterministic_many_colors() {
        let frames = vec![gradient(48, 48, 1), gradient(48, 48, 9)];
        let a = quantize(frames.clone()).unwrap();
        let b = quantize(frames).unwrap();
        assert_eq!(a.palette, b.palette);
        assert_eq!(a.frames, b.frames);
    }

    proptest! {
        #[test]
        fn prop_quantize_deterministic(
            pixels in proptest::collection::vec(any::<[u8; 3]>(), 1..200),
            frames in 1usize..4,
        ) {
            let width = pixels.len() as u32;
            let frame = Frame::from_pixels(width, 1, &pixels).unwrap();
            let input = vec![frame; frames];
            let a = quantize(input.clone()).unwrap();
            let b = quantize(input).unwrap();
            prop_assert_eq!(a.palette, b.palette);
            prop_assert_eq!(a.frames, b.frames);
        }

        #[test]
        fn prop_mismatched_dimensions_rejected(
            w1 in 1u32..8, h1 in 1u32..8, w2 in 1u32..8, h2 in 1u32..8,
        ) {
            prop_assume!((w1, h1) != (w2, h2));
            let frames = vec![Frame::solid(w1, h1, [1, 2, 3]), Frame::solid(w2, h2, [1, 2, 3])];
            let is_mismatch = matches!(quantize(frames), Err(SpriteError::DimensionMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }
}
