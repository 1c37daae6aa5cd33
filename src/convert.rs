//! End-to-end conversion: frame source to sprite container.

use std::path::Path;

use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::error::Result;
use crate::frame::Frame;
use crate::quantize::quantize;
use crate::schema::{ConvertConfig, ResizeConfig};
use crate::source::FrameSource;
use crate::sprite::{EncodeStats, SpriteContainer};

/// Load, normalize and quantize all frames of `source` into a container.
///
/// The palette is built only after every frame has reached its final size,
/// so palette colors always match the pixels being indexed.
pub fn convert<S: FrameSource>(source: S, config: &ConvertConfig) -> Result<SpriteContainer> {
    config.validate()?;

    let fps = config.resolve_fps(source.fps_hint());
    let mut frames = source.into_frames()?;
    log::info!("Loaded {} frames", frames.len());

    if let Some(target) = config.resize {
        frames = resize_frames(frames, target)?;
    }

    let quantized = quantize(frames)?;
    let container = SpriteContainer::from_quantized(quantized, fps)?;
    log::info!(
        "Built container: {} frames, {}x{} @ {} fps",
        container.frame_count(),
        container.header().width,
        container.header().height,
        fps
    );
    Ok(container)
}

/// Convert `source` and write the result to `output`.
///
/// Nothing is written unless every step succeeds.
pub fn convert_to_file<S, P>(source: S, config: &ConvertConfig, output: P) -> Result<EncodeStats>
where
    S: FrameSource,
    P: AsRef<Path>,
{
    let container = convert(source, config)?;
    container.write_file(output)
}

/// Resize every frame to `target` with a Lanczos filter.
pub fn resize_frames(frames: Vec<Frame>, target: ResizeConfig) -> Result<Vec<Frame>> {
    frames
        .into_iter()
        .map(|frame| {
            if frame.dimensions() == (target.width, target.height) {
                return Ok(frame);
            }
            let img = RgbImage::try_from(frame)?;
            Ok(Frame::from(imageops::resize(
                &img,
                target.width,
                target.height,
                FilterType::Lanczos3,
            )))
        })
        .collect()
}
