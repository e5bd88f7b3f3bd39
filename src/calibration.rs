use crate::capture::{run_timed_window, CaptureSource};
use crate::error::CloakError;
use crate::segmentation::{rgb_to_hsv, ColorRange, HUE_MAX};
use image::RgbImage;
use std::time::Duration;

/// How a sampled mean color is widened into a [`ColorRange`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueBand {
    pub margin: u8,
    pub saturation_floor: u8,
    pub value_floor: u8,
}

impl Default for HueBand {
    fn default() -> Self {
        Self {
            margin: 10,
            saturation_floor: 40,
            value_floor: 40,
        }
    }
}

impl HueBand {
    /// Symmetric hue band around `mean`, with fixed saturation/value floors.
    /// Only the mean hue matters; its saturation and value are ignored.
    pub fn range_around(&self, mean: [u8; 3]) -> ColorRange {
        let hue = mean[0].min(HUE_MAX);
        ColorRange::new(
            [hue.saturating_sub(self.margin), self.saturation_floor, self.value_floor],
            [hue.saturating_add(self.margin).min(HUE_MAX), u8::MAX, u8::MAX],
        )
    }
}

/// Mean HSV color of the square of side `2 * half_width` at the frame center.
///
/// The square is clipped to the frame; returns `None` when nothing is left.
/// The mean is truncated toward zero.
pub fn sample_center(frame: &RgbImage, half_width: u32) -> Option<[u8; 3]> {
    let (width, height) = frame.dimensions();
    let (cx, cy) = (width / 2, height / 2);

    let x0 = cx.saturating_sub(half_width);
    let x1 = cx.saturating_add(half_width).min(width);
    let y0 = cy.saturating_sub(half_width);
    let y1 = cy.saturating_add(half_width).min(height);

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = frame.get_pixel(x, y);
            let hsv = rgb_to_hsv(px[0], px[1], px[2]);
            for c in 0..3 {
                sums[c] += hsv[c] as u64;
            }
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    Some(sums.map(|sum| (sum / count) as u8))
}

/// Sample the cloak color held at the frame center for `window`.
///
/// Every mirrored frame replaces the previous estimate; the last sampled frame
/// decides the range. Fails if no frame could be sampled at all.
pub fn calibrate<C: CaptureSource + ?Sized>(
    source: &mut C,
    window: Duration,
    half_width: u32,
    band: &HueBand,
) -> Result<ColorRange, CloakError> {
    let _span = tracing::info_span!("calibrate").entered();
    tracing::info!("Hold the cloth steady in the center for color detection...");

    let mut latest = None;
    let stats = run_timed_window(source, window, |frame| {
        if let Some(mean) = sample_center(&frame, half_width) {
            tracing::trace!("Sampled mean HSV {:?}", mean);
            latest = Some(band.range_around(mean));
        }
    });

    match latest {
        Some(range) => {
            tracing::info!("Color combination detected: {}", range);
            Ok(range)
        }
        None => {
            tracing::error!(
                "Color combination not taken ({} frames, {} failed reads)",
                stats.frames,
                stats.failures
            );
            Err(CloakError::CalibrationFailed {
                window_secs: window.as_secs_f32(),
            })
        }
    }
}
