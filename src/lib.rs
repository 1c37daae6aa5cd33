//! Doki Sprite - Convert frame sequences into indexed-color `.spr` containers.
//!
//! This crate turns a folder of stills, an animated GIF or a procedural test
//! pattern into the fixed binary animation format played back by Doki OS
//! devices: one shared 256-color palette followed by 8-bit indexed frames.
//!
//! # Architecture
//!
//! - `source`: Frame sources (folders, GIFs, test patterns)
//! - `quantize`: Shared palette generation and pixel indexing
//! - `sprite`: Container layout, encoder, decoder and validator
//! - `convert`: The end-to-end pipeline tying the above together
//! - `schema`: Configuration types and test pattern parameters
//! - `upload`: HTTP upload to a device (feature `upload`)
//!
//! # Example
//!
//! ```rust,no_run
//! use doki_sprite::{
//!     convert::convert_to_file,
//!     schema::{ConvertConfig, PatternKind, TestPattern},
//!     source::PatternSource,
//! };
//!
//! let config = ConvertConfig {
//!     fps: Some(20),
//!     pattern: TestPattern {
//!         kind: PatternKind::Spinner,
//!         ..Default::default()
//!     },
//!     resize: None,
//! };
//!
//! let stats = convert_to_file(PatternSource::new(config.pattern), &config, "spinner.spr")?;
//! println!("{}", stats);
//! # Ok::<(), doki_sprite::SpriteError>(())
//! ```

pub mod convert;
pub mod error;
pub mod frame;
pub mod quantize;
pub mod schema;
pub mod source;
pub mod sprite;

#[cfg(feature = "upload")]
pub mod upload;

// Re-export commonly used types
pub use convert::{convert, convert_to_file};
pub use error::{NetworkError, Result, SpriteError};
pub use frame::{Frame, IndexedFrame, Rgb};
pub use quantize::{Palette, Quantized, quantize};
pub use schema::{ConvertConfig, SpriteConfig};
pub use source::{FrameSource, InputSource};
pub use sprite::{SpriteContainer, Validator};
