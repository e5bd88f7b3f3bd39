use super::types::{ColorRange, HsvImage, Mask, HUE_MAX, MASK_OFF, MASK_ON};
use image::{Luma, Rgb, RgbImage};

/// Convert an RGB triple to 8-bit HSV.
///
/// Hue is in half-degrees (0-179), saturation and value span 0-255.
/// Grays (no chroma) get hue 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    if delta == 0.0 {
        return [0, s, v];
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let degrees = if max as f32 == r {
        60.0 * (g - b) / delta
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    let mut h = (degrees / 2.0).round() as u16;
    if h > HUE_MAX as u16 {
        h -= HUE_MAX as u16 + 1;
    }

    [h as u8, s, v]
}

/// Convert a whole frame into the detection color space
pub fn to_hsv(frame: &RgbImage) -> HsvImage {
    let _span = tracing::debug_span!("to_hsv").entered();

    let mut hsv = HsvImage::new(frame.width(), frame.height());
    for (src, dst) in frame.pixels().zip(hsv.pixels_mut()) {
        *dst = Rgb(rgb_to_hsv(src[0], src[1], src[2]));
    }
    hsv
}

/// Mark every pixel whose H, S and V all fall inside `range` (inclusive)
pub fn threshold(hsv: &HsvImage, range: &ColorRange) -> Mask {
    let mut mask = Mask::new(hsv.width(), hsv.height());
    for (src, dst) in hsv.pixels().zip(mask.pixels_mut()) {
        let value = if range.contains(src.0) {
            MASK_ON
        } else {
            MASK_OFF
        };
        *dst = Luma([value]);
    }
    mask
}
