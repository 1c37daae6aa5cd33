//! Sequential container serialization.

use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::container::SpriteContainer;
use crate::error::Result;

impl SpriteContainer {
    /// Serialize header, palette and frame data to `w` in a single forward
    /// pass. Returns the number of bytes written.
    ///
    /// Frames follow the palette back to back; there is no offset table, so
    /// nothing written earlier ever needs patching.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<u64> {
        self.header().write_to(w)?;
        self.palette().write_to(w)?;
        for frame in self.frames() {
            w.write_all(frame.indices())?;
        }
        Ok(self.encoded_len() as u64)
    }

    /// Serialize into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.header().to_bytes());
        buf.extend_from_slice(&self.palette().to_bytes());
        for frame in self.frames() {
            buf.extend_from_slice(frame.indices());
        }
        buf
    }

    /// Write the container to `path`.
    ///
    /// Data goes to a temporary file in the destination directory which is
    /// renamed over `path` only after every byte is flushed, so a failed
    /// conversion never leaves a partial container behind.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<EncodeStats> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
        let total_bytes = self.write_to(&mut writer)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        log::info!("Wrote {} bytes to {}", total_bytes, path.display());

        Ok(EncodeStats {
            frame_count: self.frame_count(),
            width: self.header().width,
            height: self.header().height,
            fps: self.fps(),
            total_bytes,
        })
    }
}

/// Summary of a written container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Frames written.
    pub frame_count: usize,
    pub width: u16,
    pub height: u16,
    pub fps: u8,
    /// Total file size in bytes.
    pub total_bytes: u64,
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, {}x{} @ {} fps, {} bytes ({:.1} KB), 8-bit indexed",
            self.frame_count,
            self.width,
            self.height,
            self.fps,
            self.total_bytes,
            self.total_bytes as f64 / 1024.0
        )
    }
}
