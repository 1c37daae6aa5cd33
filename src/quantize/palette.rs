//! Fixed 256-entry RGBA palette.

use std::io::{self, Write};

use crate::frame::Rgb;

/// Number of palette entries in every container.
pub const PALETTE_LEN: usize = 256;

/// Size of the serialized palette in bytes (256 x RGBA).
pub const PALETTE_BYTES: usize = PALETTE_LEN * 4;

/// Color used for slots left over when fewer than 256 colors are needed.
pub const PADDING_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Shared color table referenced by indexed frames.
///
/// Always holds exactly [`PALETTE_LEN`] entries; alpha is 255 for palettes
/// produced by the quantizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [[u8; 4]; PALETTE_LEN],
}

impl Palette {
    /// Build an opaque palette from up to 256 colors, padding the rest with
    /// [`PADDING_COLOR`]. Colors beyond the 256th are ignored.
    pub fn from_colors(colors: &[Rgb]) -> Self {
        let mut entries = [PADDING_COLOR; PALETTE_LEN];
        for (slot, &[r, g, b]) in entries.iter_mut().zip(colors) {
            *slot = [r, g, b, 255];
        }
        Self { entries }
    }

    /// Wrap raw RGBA entries, e.g. as read back from a container.
    pub fn from_entries(entries: [[u8; 4]; PALETTE_LEN]) -> Self {
        Self { entries }
    }

    /// Decode a palette from its 1024-byte on-disk representation.
    pub fn from_bytes(bytes: &[u8; PALETTE_BYTES]) -> Self {
        let mut entries = [[0u8; 4]; PALETTE_LEN];
        for (entry, chunk) in entries.iter_mut().zip(bytes.chunks_exact(4)) {
            entry.copy_from_slice(chunk);
        }
        Self { entries }
    }

    /// RGBA entry at `index`.
    #[inline]
    pub fn entry(&self, index: u8) -> [u8; 4] {
        self.entries[index as usize]
    }

    pub fn entries(&self) -> &[[u8; 4]; PALETTE_LEN] {
        &self.entries
    }

    /// Index of the entry closest to `color` by squared RGB distance.
    ///
    /// Ties resolve to the lowest index.
    pub fn nearest(&self, color: Rgb) -> u8 {
        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let dist = distance_sq(color, [entry[0], entry[1], entry[2]]);
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    /// Serialize as 256 x (R, G, B, A) in index order.
    pub fn to_bytes(&self) -> [u8; PALETTE_BYTES] {
        let mut buf = [0u8; PALETTE_BYTES];
        for (chunk, entry) in buf.chunks_exact_mut(4).zip(&self.entries) {
            chunk.copy_from_slice(entry);
        }
        buf
    }

    /// Write the palette as 256 x (R, G, B, A) in index order.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }
}

/// Squared Euclidean distance between two RGB colors.
#[inline]
pub fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
