//! Frame sources feeding the quantizer.
//!
//! Every source yields an ordered list of RGB frames and may suggest a frame
//! rate. Sources do not check that frame sizes agree; the quantizer does.

mod animated;
mod pattern;
mod sequence;

use std::path::Path;

pub use animated::{AnimatedSource, fps_from_delay};
pub use pattern::{PatternSource, render_frame};
pub use sequence::{ImageSequence, STILL_EXTENSIONS};

use crate::error::Result;
use crate::frame::Frame;
use crate::schema::TestPattern;

/// Input argument selecting the procedural test pattern.
pub const TEST_INPUT: &str = "test";

/// Producer of an ordered sequence of frames.
pub trait FrameSource {
    /// Frame rate suggested by the source itself, if any.
    fn fps_hint(&self) -> Option<u8> {
        None
    }

    /// Load every frame, in playback order.
    fn into_frames(self) -> Result<Vec<Frame>>
    where
        Self: Sized;
}

impl FrameSource for Vec<Frame> {
    fn into_frames(self) -> Result<Vec<Frame>> {
        Ok(self)
    }
}

/// Any of the supported inputs, chosen from a command-line argument.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Folder of stills, or a single still image.
    Stills(ImageSequence),
    /// Animated GIF.
    Animated(AnimatedSource),
    /// Procedural test pattern.
    Pattern(PatternSource),
}

impl InputSource {
    /// Resolve `input`: the literal `test`, a directory, a `.gif` file, or a
    /// single still image.
    pub fn from_input(input: &str, pattern: &TestPattern) -> Result<Self> {
        if input.eq_ignore_ascii_case(TEST_INPUT) {
            return Ok(Self::Pattern(PatternSource::new(*pattern)));
        }

        let path = Path::new(input);
        if path.is_dir() {
            return Ok(Self::Stills(ImageSequence::from_dir(path)?));
        }

        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gif"));
        if is_gif {
            Ok(Self::Animated(AnimatedSource::open(path)?))
        } else {
            Ok(Self::Stills(ImageSequence::from_files(vec![path.to_path_buf()])))
        }
    }
}

impl FrameSource for InputSource {
    fn fps_hint(&self) -> Option<u8> {
        match self {
            InputSource::Stills(s) => s.fps_hint(),
            InputSource::Animated(s) => s.fps_hint(),
            InputSource::Pattern(s) => s.fps_hint(),
        }
    }

    fn into_frames(self) -> Result<Vec<Frame>> {
        match self {
            InputSource::Stills(s) => s.into_frames(),
            InputSource::Animated(s) => s.into_frames(),
            InputSource::Pattern(s) => s.into_frames(),
        }
    }
}
