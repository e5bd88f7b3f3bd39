use anyhow::{Context, Result};
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the composited stream as a numbered PNG sequence
pub struct FrameRecorder {
    dir: PathBuf,
    frames_written: u64,
}

impl FrameRecorder {
    /// Create the output directory (and its parents) if it does not exist yet
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        tracing::info!("Recording frames to {}", dir.display());

        Ok(Self {
            dir,
            frames_written: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }

    pub fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        let path = self.frame_path(self.frames_written + 1);
        frame
            .save(&path)
            .with_context(|| format!("Failed to write frame to {}", path.display()))?;
        self.frames_written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    #[test]
    fn test_creates_nested_directory() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Invisible_Cloak_Output").join("run");

        let recorder = FrameRecorder::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(recorder.dir(), dir.as_path());
        assert_eq!(recorder.frames_written(), 0);
    }

    #[test]
    fn test_writes_numbered_frames() {
        let root = tempdir().unwrap();
        let mut recorder = FrameRecorder::new(root.path()).unwrap();
        let frame = RgbImage::from_pixel(3, 2, Rgb([255, 0, 0]));

        recorder.write_frame(&frame).unwrap();
        recorder.write_frame(&frame).unwrap();

        assert_eq!(recorder.frames_written(), 2);
        let second = root.path().join("frame_000002.png");
        assert!(root.path().join("frame_000001.png").is_file());

        let reloaded = image::open(&second).unwrap().to_rgb8();
        assert_eq!(reloaded, frame);
    }
}
