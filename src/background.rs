use crate::capture::{run_timed_window, CaptureSource};
use crate::error::CloakError;
use image::RgbImage;
use std::time::Duration;

/// Capture the static background the cloak will reveal.
///
/// Sleeps for `warmup` without reading so the subject can step out of view,
/// then keeps the most recent mirrored frame read during `window`.
pub fn capture_background<C: CaptureSource + ?Sized>(
    source: &mut C,
    warmup: Duration,
    window: Duration,
) -> Result<RgbImage, CloakError> {
    let _span = tracing::info_span!("background").entered();
    tracing::info!("Stand away from the frame for background detection...");

    if !warmup.is_zero() {
        std::thread::sleep(warmup);
    }

    let mut background = None;
    let stats = run_timed_window(source, window, |frame| background = Some(frame));

    match background {
        Some(frame) => {
            tracing::info!(
                "Background image detected ({}x{}, {} frames read)",
                frame.width(),
                frame.height(),
                stats.frames
            );
            Ok(frame)
        }
        None => {
            tracing::error!("No background frame read ({} failed reads)", stats.failures);
            Err(CloakError::BackgroundCaptureFailed {
                window_secs: window.as_secs_f32(),
            })
        }
    }
}
