//! Schema module - Configuration and test pattern types.

mod config;
mod pattern;

pub use config::*;
pub use pattern::*;
