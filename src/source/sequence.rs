//! Frames loaded from individual still images.

use std::fs;
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::error::Result;
use crate::frame::Frame;

/// File extensions picked up when scanning a folder.
pub const STILL_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// An ordered list of still image files, one frame each.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    files: Vec<PathBuf>,
}

impl ImageSequence {
    /// Collect every supported image in `dir`, sorted by file name.
    ///
    /// An empty folder is not an error here; it yields zero frames.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_still_image(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        if files.is_empty() {
            log::warn!("No image files found in {}", dir.display());
        } else {
            log::info!("Found {} frames in {}", files.len(), dir.display());
        }
        Ok(Self { files })
    }

    /// Use exactly these files, in this order.
    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

impl FrameSource for ImageSequence {
    fn into_frames(self) -> Result<Vec<Frame>> {
        let mut frames = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let img = image::open(path)?.to_rgb8();
            log::debug!(
                "Loaded {} ({}x{})",
                path.display(),
                img.width(),
                img.height()
            );
            frames.push(Frame::from(img));
        }
        Ok(frames)
    }
}

fn is_still_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| STILL_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn save_solid(path: &Path, width: u32, height: u32, color: [u8; 3]) {
        RgbImage::from_pixel(width, height, Rgb(color))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_folder_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        save_solid(&dir.path().join("frame_02.png"), 4, 4, [0, 255, 0]);
        save_solid(&dir.path().join("frame_01.PNG"), 4, 4, [255, 0, 0]);
        save_solid(&dir.path().join("frame_03.bmp"), 4, 4, [0, 0, 255]);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let source = ImageSequence::from_dir(dir.path()).unwrap();
        assert_eq!(source.files().len(), 3);

        let frames = source.into_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(frames[1].pixel(0, 0), Some([0, 255, 0]));
        assert_eq!(frames[2].pixel(0, 0), Some([0, 0, 255]));
    }

    #[test]
    fn test_empty_folder_yields_no_frames() {
        let dir = tempdir().unwrap();
        let frames = ImageSequence::from_dir(dir.path())
            .unwrap()
            .into_frames()
            .unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_missing_folder() {
        let dir = tempdir().unwrap();
        assert!(ImageSequence::from_dir(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_mixed_sizes_loaded_as_is() {
        let dir = tempdir().unwrap();
        save_solid(&dir.path().join("a.png"), 4, 4, [1, 1, 1]);
        save_solid(&dir.path().join("b.png"), 5, 4, [1, 1, 1]);
        let frames = ImageSequence::from_dir(dir.path())
            .unwrap()
            .into_frames()
            .unwrap();
        assert_eq!(frames[1].dimensions(), (5, 4));
    }

    #[test]
    fn test_corrupt_image_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();
        let result = ImageSequence::from_files(vec![path]).into_frames();
        assert!(matches!(result, Err(crate::SpriteError::Image(_))));
    }
}
