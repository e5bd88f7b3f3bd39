mod loopback;
mod recorder;
mod stop;

pub use loopback::V4L2Output;
pub use recorder::FrameRecorder;
pub use stop::StopFlag;

use anyhow::Result;
use image::RgbImage;

/// Trait for output destinations
pub trait OutputSink {
    /// Persist a frame to the recorded stream
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;

    /// Show a frame live
    fn present(&mut self, _frame: &RgbImage) -> Result<()> {
        Ok(())
    }

    /// Polled once per compositing iteration; `true` ends the loop
    fn stop_requested(&mut self) -> bool {
        false
    }
}

/// Records every frame, optionally mirrors it to a preview device, and asks
/// the loop to stop once the user raises `stop` or a frame budget is spent
pub struct CloakOutput {
    recorder: FrameRecorder,
    preview: Option<V4L2Output>,
    max_frames: Option<u64>,
    stop: StopFlag,
}

impl CloakOutput {
    pub fn new(
        recorder: FrameRecorder,
        preview: Option<V4L2Output>,
        max_frames: Option<u64>,
        stop: StopFlag,
    ) -> Self {
        Self {
            recorder,
            preview,
            max_frames,
            stop,
        }
    }

    pub fn recorder(&self) -> &FrameRecorder {
        &self.recorder
    }
}

impl OutputSink for CloakOutput {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        self.recorder.write_frame(frame)
    }

    fn present(&mut self, frame: &RgbImage) -> Result<()> {
        match self.preview.as_mut() {
            Some(preview) => preview.present(frame),
            None => Ok(()),
        }
    }

    fn stop_requested(&mut self) -> bool {
        self.stop.is_requested()
            || self
                .max_frames
                .is_some_and(|max| self.recorder.frames_written() >= max)
    }
}
