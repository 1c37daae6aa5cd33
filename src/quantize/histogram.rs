//! Color histogram over the union of all frames.

use std::collections::HashMap;

use crate::frame::{Frame, Rgb};

/// One distinct color and how many pixels carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    pub color: Rgb,
    pub count: u64,
}

impl ColorCount {
    /// Color packed as `0xRRGGBB`, the histogram's sort key.
    #[inline]
    pub fn key(&self) -> u32 {
        pack(self.color)
    }
}

/// Distinct colors of a frame set, sorted by packed key.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    entries: Vec<ColorCount>,
    total: u64,
}

impl ColorHistogram {
    /// Count every pixel of every frame.
    pub fn from_frames(frames: &[Frame]) -> Self {
        let mut counts: HashMap<u32, u64> = HashMap::new();
        let mut total = 0u64;
        for frame in frames {
            for pixel in frame.pixels() {
                *counts.entry(pack(pixel)).or_insert(0) += 1;
                total += 1;
            }
        }

        let mut entries: Vec<ColorCount> = counts
            .into_iter()
            .map(|(key, count)| ColorCount {
                color: unpack(key),
                count,
            })
            .collect();
        // Hash iteration order is arbitrary; sort so output is reproducible.
        entries.sort_unstable_by_key(ColorCount::key);

        Self { entries, total }
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of pixels counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn entries(&self) -> &[ColorCount] {
        &self.entries
    }
}

#[inline]
pub fn pack(c: Rgb) -> u32 {
    (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

#[inline]
pub fn unpack(key: u32) -> Rgb {
    [(key >> 16) as u8, (key >> 8) as u8, key as u8]
}
