//! Binary morphology over cloak masks.
//!
//! Neighbors that fall outside the image are ignored: erosion never eats in
//! from the border and dilation never grows in from it.

use super::types::Mask;
use crate::error::CloakError;
use image::Luma;

/// Rectangular all-ones structuring element anchored at its center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    width: u32,
    height: u32,
}

impl Kernel {
    pub fn new(width: u32, height: u32) -> Result<Self, CloakError> {
        if width == 0 || height == 0 {
            return Err(CloakError::InvalidKernel { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn square(size: u32) -> Result<Self, CloakError> {
        Self::new(size, size)
    }

    fn anchor(&self) -> (i64, i64) {
        ((self.width / 2) as i64, (self.height / 2) as i64)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self { width: 3, height: 3 }
    }
}

/// Slide `kernel` over `mask` and fold the in-bounds neighborhood with `pick`
fn sweep(mask: &Mask, kernel: &Kernel, start: u8, pick: fn(u8, u8) -> u8) -> Mask {
    let (width, height) = mask.dimensions();
    let (ax, ay) = kernel.anchor();

    Mask::from_fn(width, height, |x, y| {
        let mut acc = start;
        for ky in 0..kernel.height as i64 {
            let sy = y as i64 + ky - ay;
            if sy < 0 || sy >= height as i64 {
                continue;
            }
            for kx in 0..kernel.width as i64 {
                let sx = x as i64 + kx - ax;
                if sx < 0 || sx >= width as i64 {
                    continue;
                }
                acc = pick(acc, mask.get_pixel(sx as u32, sy as u32)[0]);
            }
        }
        Luma([acc])
    })
}

pub fn erode(mask: &Mask, kernel: &Kernel) -> Mask {
    sweep(mask, kernel, u8::MAX, u8::min)
}

pub fn dilate(mask: &Mask, kernel: &Kernel) -> Mask {
    sweep(mask, kernel, u8::MIN, u8::max)
}

/// Erosion followed by dilation; drops specks smaller than the kernel
pub fn open(mask: &Mask, kernel: &Kernel) -> Mask {
    dilate(&erode(mask, kernel), kernel)
}
