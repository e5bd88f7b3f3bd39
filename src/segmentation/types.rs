use image::{GrayImage, ImageBuffer, Rgb};
use std::fmt;

/// Largest hue value in the 8-bit HSV encoding (degrees / 2)
pub const HUE_MAX: u8 = 179;

/// Mask value for pixels that belong to the cloak color
pub const MASK_ON: u8 = 255;

/// Mask value for pixels outside the cloak color
pub const MASK_OFF: u8 = 0;

/// Image whose three channels hold H, S and V instead of R, G and B.
/// Hue is stored halved so it fits in a byte (0-179).
pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Binary membership grid: every cell is either [`MASK_ON`] or [`MASK_OFF`]
pub type Mask = GrayImage;

/// Inclusive HSV bounds of the tracked cloak color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        debug_assert!(
            lower.iter().zip(upper.iter()).all(|(lo, hi)| lo <= hi),
            "lower bound exceeds upper bound"
        );
        Self { lower, upper }
    }

    /// Whether an HSV triple lies inside the range (bounds included)
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| hsv[c] >= self.lower[c] && hsv[c] <= self.upper[c])
    }
}

impl fmt::Display for ColorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lower=[{} {} {}], Upper=[{} {} {}]",
            self.lower[0], self.lower[1], self.lower[2], self.upper[0], self.upper[1], self.upper[2]
        )
    }
}

/// A cloak mask together with its complement
#[derive(Debug, Clone)]
pub struct MaskPair {
    /// [`MASK_ON`] where the cloak color was detected
    pub mask: Mask,
    /// [`MASK_ON`] everywhere the live frame should show through
    pub inverse: Mask,
}
