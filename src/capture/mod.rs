mod v4l_capture;
mod window;

pub use v4l_capture::WebcamCapture;
pub use window::run_timed_window;

use crate::error::CloakError;
use anyhow::Result;
use image::{imageops, RgbImage};

/// Trait for camera capture sources
pub trait CaptureSource {
    /// Capture a single frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Get the resolution of captured frames
    fn resolution(&self) -> (u32, u32);
}

/// Mirror a frame horizontally so the user sees themselves as in a mirror.
/// Every phase of the pipeline reads frames through this.
pub fn mirror(frame: &RgbImage) -> RgbImage {
    let _span = tracing::debug_span!("mirror").entered();
    imageops::flip_horizontal(frame)
}

/// Read one frame from `source` and mirror it.
///
/// Source failures are collapsed into [`CloakError::FrameUnavailable`]; the
/// caller decides whether that skips an iteration or ends the stream.
pub fn read_mirrored<C: CaptureSource + ?Sized>(source: &mut C) -> Result<RgbImage, CloakError> {
    match source.capture_frame() {
        Ok(frame) => Ok(mirror(&frame)),
        Err(err) => {
            tracing::debug!("Frame read failed: {:#}", err);
            Err(CloakError::FrameUnavailable)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::CaptureSource;
    use anyhow::{anyhow, Result};
    use image::RgbImage;
    use std::collections::VecDeque;

    /// Replays a fixed script of frames and read failures, then fails forever
    pub struct ScriptedCapture {
        script: VecDeque<Option<RgbImage>>,
        repeat_last: bool,
        last: Option<RgbImage>,
        width: u32,
        height: u32,
        pub reads: usize,
    }

    impl ScriptedCapture {
        pub fn new(width: u32, height: u32, script: Vec<Option<RgbImage>>) -> Self {
            Self {
                script: script.into(),
                repeat_last: false,
                last: None,
                width,
                height,
                reads: 0,
            }
        }

        /// Keep returning the last scripted frame once the script runs out
        pub fn repeating(mut self) -> Self {
            self.repeat_last = true;
            self
        }

        /// A source whose every read fails
        pub fn broken(width: u32, height: u32) -> Self {
            Self::new(width, height, Vec::new())
        }
    }

    impl CaptureSource for ScriptedCapture {
        fn capture_frame(&mut self) -> Result<RgbImage> {
            self.reads += 1;
            match self.script.pop_front() {
                Some(Some(frame)) => {
                    self.last = Some(frame.clone());
                    Ok(frame)
                }
                Some(None) => Err(anyhow!("scripted read failure")),
                None => match (&self.last, self.repeat_last) {
                    (Some(frame), true) => Ok(frame.clone()),
                    _ => Err(anyhow!("end of script")),
                },
            }
        }

        fn resolution(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }
}
