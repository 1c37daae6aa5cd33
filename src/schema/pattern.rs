//! Parameters for procedurally generated test animations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Shape animated by a test pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Red dot orbiting the center.
    Circle,
    /// Blue ball bouncing left to right.
    Bounce,
    /// Rotating 270 degree arc.
    #[default]
    Spinner,
    /// Bar filling from left to right.
    Progress,
    /// Checkmark drawn stroke by stroke.
    Checkmark,
    /// Glowing circle pulsing in size.
    Pulse,
}

impl PatternKind {
    pub const ALL: [PatternKind; 6] = [
        PatternKind::Circle,
        PatternKind::Bounce,
        PatternKind::Spinner,
        PatternKind::Progress,
        PatternKind::Checkmark,
        PatternKind::Pulse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Circle => "circle",
            PatternKind::Bounce => "bounce",
            PatternKind::Spinner => "spinner",
            PatternKind::Progress => "progress",
            PatternKind::Checkmark => "checkmark",
            PatternKind::Pulse => "pulse",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPattern(s.to_string()))
    }
}

fn default_size() -> u32 {
    64
}

fn default_frames() -> u32 {
    20
}

/// Largest pattern width or height; the container stores 16-bit sizes.
pub const MAX_PATTERN_DIM: u32 = u16::MAX as u32;

/// Complete test pattern specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPattern {
    /// Shape to animate.
    #[serde(default)]
    pub kind: PatternKind,
    /// Frame width in pixels.
    #[serde(default = "default_size")]
    pub width: u32,
    /// Frame height in pixels.
    #[serde(default = "default_size")]
    pub height: u32,
    /// Number of frames to render.
    #[serde(default = "default_frames")]
    pub frames: u32,
}

impl Default for TestPattern {
    fn default() -> Self {
        Self {
            kind: PatternKind::default(),
            width: default_size(),
            height: default_size(),
            frames: default_frames(),
        }
    }
}

impl TestPattern {
    /// Both dimensions must lie in `1..=MAX_PATTERN_DIM`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidPatternDimensions);
        }
        if self.width > MAX_PATTERN_DIM || self.height > MAX_PATTERN_DIM {
            return Err(ConfigError::PatternTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_PATTERN_DIM,
            });
        }
        Ok(())
    }
}
