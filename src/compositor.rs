use crate::error::CloakError;
use crate::segmentation::{Mask, MaskPair, MASK_ON};
use image::{Rgb, RgbImage};

/// Copy `frame` where `mask` is on, black elsewhere
pub fn masked_copy(frame: &RgbImage, mask: &Mask) -> RgbImage {
    let mut out = RgbImage::new(frame.width(), frame.height());
    for ((src, m), dst) in frame.pixels().zip(mask.pixels()).zip(out.pixels_mut()) {
        if m[0] == MASK_ON {
            *dst = *src;
        }
    }
    out
}

/// Per-channel sum of two frames, saturating at 255
pub fn saturating_add(a: &RgbImage, b: &RgbImage) -> RgbImage {
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        *dst = Rgb([
            dst[0].saturating_add(src[0]),
            dst[1].saturating_add(src[1]),
            dst[2].saturating_add(src[2]),
        ]);
    }
    out
}

fn check_dimensions(expected: (u32, u32), actual: (u32, u32)) -> Result<(), CloakError> {
    if expected != actual {
        return Err(CloakError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Show `background` under the cloak mask and the live `frame` everywhere else.
///
/// Because the two masks are complementary every output pixel comes from
/// exactly one source at full strength.
pub fn composite(
    background: &RgbImage,
    frame: &RgbImage,
    masks: &MaskPair,
) -> Result<RgbImage, CloakError> {
    let _span = tracing::debug_span!("composite").entered();

    let expected = frame.dimensions();
    check_dimensions(expected, background.dimensions())?;
    check_dimensions(expected, masks.mask.dimensions())?;
    check_dimensions(expected, masks.inverse.dimensions())?;

    let revealed = masked_copy(background, &masks.mask);
    let live = masked_copy(frame, &masks.inverse);

    Ok(saturating_add(&revealed, &live))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::types::MASK_OFF;
    use crate::segmentation::{invert, segment, ColorRange, Kernel};
    use image::Luma;

    fn left_half_mask(width: u32, height: u32) -> MaskPair {
        let mask = Mask::from_fn(width, height, |x, _| {
            Luma([if x < width / 2 { MASK_ON } else { MASK_OFF }])
        });
        let inverse = invert(&mask);
        MaskPair { mask, inverse }
    }

    #[test]
    fn test_matching_frame_shows_background() {
        let background = RgbImage::from_pixel(8, 6, Rgb([255, 0, 0]));
        let frame = RgbImage::from_pixel(8, 6, Rgb([0, 200, 0]));
        let range = ColorRange::new([50, 40, 40], [70, 255, 255]);

        let masks = segment(&frame, &range, &Kernel::default());
        let output = composite(&background, &frame, &masks).unwrap();

        assert!(output.pixels().all(|p| *p == Rgb([255, 0, 0])));
    }

    #[test]
    fn test_each_pixel_from_one_source() {
        let background = RgbImage::from_pixel(4, 2, Rgb([10, 20, 30]));
        let frame = RgbImage::from_pixel(4, 2, Rgb([200, 210, 220]));
        let masks = left_half_mask(4, 2);

        let output = composite(&background, &frame, &masks).unwrap();
        for (x, _, px) in output.enumerate_pixels() {
            let expected = if x < 2 {
                Rgb([10, 20, 30])
            } else {
                Rgb([200, 210, 220])
            };
            assert_eq!(*px, expected);
        }
    }

    #[test]
    fn test_composite_is_idempotent() {
        let background = RgbImage::from_fn(4, 2, |x, y| Rgb([x as u8, y as u8, 7]));
        let frame = RgbImage::from_fn(4, 2, |x, y| Rgb([y as u8, x as u8, 99]));
        let masks = left_half_mask(4, 2);

        let a = composite(&background, &frame, &masks).unwrap();
        let b = composite(&background, &frame, &masks).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_overlapping_masks_saturate() {
        let background = RgbImage::from_pixel(1, 1, Rgb([200, 100, 0]));
        let frame = RgbImage::from_pixel(1, 1, Rgb([100, 100, 5]));
        let on = Mask::from_pixel(1, 1, Luma([MASK_ON]));
        let masks = MaskPair {
            mask: on.clone(),
            inverse: on,
        };

        let output = composite(&background, &frame, &masks).unwrap();
        assert_eq!(output.get_pixel(0, 0), &Rgb([255, 200, 5]));
    }

    #[test]
    fn test_dimension_mismatch() {
        let background = RgbImage::new(4, 4);
        let frame = RgbImage::new(4, 2);
        let masks = left_half_mask(4, 2);

        let err = composite(&background, &frame, &masks).unwrap_err();
        assert!(matches!(
            err,
            CloakError::DimensionMismatch {
                expected: (4, 2),
                actual: (4, 4)
            }
        ));
    }
}
