mod color;
mod morphology;
pub mod types;

pub use color::rgb_to_hsv;
pub use morphology::Kernel;
pub use types::{ColorRange, Mask, MaskPair, HUE_MAX, MASK_ON};

use color::{threshold, to_hsv};
use morphology::{dilate, open};

use image::{Luma, RgbImage};

/// Complement a binary mask (on <-> off)
pub fn invert(mask: &Mask) -> Mask {
    let mut inverse = mask.clone();
    for px in inverse.pixels_mut() {
        *px = Luma([!px[0]]);
    }
    inverse
}

/// Build the cloak mask and its complement for an already mirrored frame.
///
/// threshold -> open -> dilate -> invert. The opening clears single-pixel
/// false positives; the extra dilation covers the fringe the threshold misses.
pub fn segment(frame: &RgbImage, range: &ColorRange, kernel: &Kernel) -> MaskPair {
    let _span = tracing::debug_span!("segment").entered();

    let hsv = to_hsv(frame);
    let raw = threshold(&hsv, range);
    let mask = dilate(&open(&raw, kernel), kernel);
    let inverse = invert(&mask);

    MaskPair { mask, inverse }
}

#[cfg(test)]
mod tests {
    use super::types::MASK_OFF;
    use super::*;
    use image::Rgb;

    fn green_range() -> ColorRange {
        ColorRange::new([50, 40, 40], [70, 255, 255])
    }

    /// Gray frame with a green square and a lone green speck
    fn scene() -> RgbImage {
        RgbImage::from_fn(12, 10, |x, y| {
            let in_square = (3..7).contains(&x) && (2..6).contains(&y);
            let speck = x == 10 && y == 8;
            if in_square || speck {
                Rgb([0, 200, 0])
            } else {
                Rgb([90, 90, 90])
            }
        })
    }

    #[test]
    fn test_invert_flips_every_cell() {
        let mask = Mask::from_fn(2, 1, |x, _| Luma([if x == 0 { MASK_ON } else { MASK_OFF }]));
        let inverse = invert(&mask);
        assert_eq!(inverse.get_pixel(0, 0)[0], MASK_OFF);
        assert_eq!(inverse.get_pixel(1, 0)[0], MASK_ON);
    }

    #[test]
    fn test_masks_are_complementary() {
        let pair = segment(&scene(), &green_range(), &Kernel::default());
        for (m, i) in pair.mask.pixels().zip(pair.inverse.pixels()) {
            assert_eq!(m[0] ^ i[0], MASK_ON);
        }
    }

    #[test]
    fn test_segment_is_deterministic() {
        let frame = scene();
        let a = segment(&frame, &green_range(), &Kernel::default());
        let b = segment(&frame, &green_range(), &Kernel::default());
        assert_eq!(a.mask, b.mask);
        assert_eq!(a.inverse, b.inverse);
    }

    #[test]
    fn test_speck_dropped_and_square_grown() {
        let pair = segment(&scene(), &green_range(), &Kernel::default());

        assert_eq!(pair.mask.get_pixel(10, 8)[0], MASK_OFF);
        // Square spans x 3..7, y 2..6; the dilation adds a one pixel rim
        assert_eq!(pair.mask.get_pixel(2, 1)[0], MASK_ON);
        assert_eq!(pair.mask.get_pixel(7, 6)[0], MASK_ON);
        assert_eq!(pair.mask.get_pixel(8, 6)[0], MASK_OFF);
        assert_eq!(pair.mask.get_pixel(5, 4)[0], MASK_ON);
    }

    #[test]
    fn test_fully_matching_frame_is_all_on() {
        let frame = RgbImage::from_pixel(5, 5, Rgb([0, 200, 0]));
        let pair = segment(&frame, &green_range(), &Kernel::default());
        assert!(pair.mask.pixels().all(|p| p[0] == MASK_ON));
        assert!(pair.inverse.pixels().all(|p| p[0] == MASK_OFF));
    }
}
