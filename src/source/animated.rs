//! Frames decoded from an animated GIF.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage};

use super::FrameSource;
use crate::error::Result;
use crate::frame::Frame;

/// A fully decoded animated image.
///
/// Frames are composited by the decoder, so each one is a complete picture
/// rather than a delta.
#[derive(Debug, Clone)]
pub struct AnimatedSource {
    frames: Vec<Frame>,
    fps_hint: Option<u8>,
}

impl AnimatedSource {
    /// Decode every frame of the GIF at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
        let raw = decoder.into_frames().collect_frames()?;

        let fps_hint = raw.first().and_then(|f| {
            let (numer, denom) = f.delay().numer_denom_ms();
            fps_from_delay(numer, denom)
        });

        let frames: Vec<Frame> = raw
            .into_iter()
            .map(|f| Frame::from(DynamicImage::ImageRgba8(f.into_buffer()).to_rgb8()))
            .collect();

        log::info!(
            "Loaded {} frames from {} (fps hint: {:?})",
            frames.len(),
            path.display(),
            fps_hint
        );

        Ok(Self { frames, fps_hint })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for AnimatedSource {
    fn fps_hint(&self) -> Option<u8> {
        self.fps_hint
    }

    fn into_frames(self) -> Result<Vec<Frame>> {
        Ok(self.frames)
    }
}

/// Frame rate implied by a per-frame delay of `numer / denom` milliseconds.
///
/// A zero delay carries no timing information and gives no hint.
pub fn fps_from_delay(numer: u32, denom: u32) -> Option<u8> {
    if numer == 0 || denom == 0 {
        return None;
    }
    let fps = (1000u64 * denom as u64) / numer as u64;
    Some(fps.clamp(1, u8::MAX as u64) as u8)
}
