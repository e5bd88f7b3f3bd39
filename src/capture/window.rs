use super::{read_mirrored, CaptureSource};
use image::RgbImage;
use std::time::{Duration, Instant};

/// Read counts for one timed capture window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub frames: u64,
    pub failures: u64,
}

/// Pull mirrored frames from `source` until `duration` of wall-clock time has
/// elapsed, handing each successful read to `on_frame`.
///
/// Failed reads are skipped; they never end the window early. The window is
/// checked before every read, so a zero duration performs no reads.
pub fn run_timed_window<C, F>(source: &mut C, duration: Duration, mut on_frame: F) -> WindowStats
where
    C: CaptureSource + ?Sized,
    F: FnMut(RgbImage),
{
    let start = Instant::now();
    let mut stats = WindowStats::default();

    while start.elapsed() < duration {
        match read_mirrored(source) {
            Ok(frame) => {
                stats.frames += 1;
                on_frame(frame);
            }
            Err(_) => stats.failures += 1,
        }
    }

    tracing::debug!(
        "Timed window of {:.1}s done: {} frames, {} failed reads",
        duration.as_secs_f32(),
        stats.frames,
        stats.failures
    );

    stats
}
