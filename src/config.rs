use crate::calibration::HueBand;
use crate::error::CloakError;
use crate::segmentation::Kernel;
use std::time::Duration;

/// Tunables for the calibration, background and compositing phases
#[derive(Debug, Clone, PartialEq)]
pub struct CloakSettings {
    /// Idle time after opening the camera so exposure can settle
    pub camera_warmup: Duration,
    /// How long the center region is sampled for the cloak color
    pub calibration: Duration,
    /// Half the side of the square sampled at the frame center
    pub sample_half_width: u32,
    /// Hue distance either side of the sampled mean that still counts as cloak
    pub hue_margin: u8,
    pub saturation_floor: u8,
    pub value_floor: u8,
    /// Time for the user to leave the scene before the background is taken
    pub background_warmup: Duration,
    pub background_capture: Duration,
    /// Side of the square structuring element used to clean the mask
    pub kernel_size: u32,
    /// Pacing of the compositing loop
    pub fps: u32,
}

impl Default for CloakSettings {
    fn default() -> Self {
        Self {
            camera_warmup: Duration::from_secs(2),
            calibration: Duration::from_secs(5),
            sample_half_width: 10,
            hue_margin: 10,
            saturation_floor: 40,
            value_floor: 40,
            background_warmup: Duration::from_secs(1),
            background_capture: Duration::from_secs(6),
            kernel_size: 3,
            fps: 30,
        }
    }
}

impl CloakSettings {
    pub fn band(&self) -> HueBand {
        HueBand {
            margin: self.hue_margin,
            saturation_floor: self.saturation_floor,
            value_floor: self.value_floor,
        }
    }

    pub fn kernel(&self) -> Result<Kernel, CloakError> {
        Kernel::square(self.kernel_size)
    }

    /// Target time budget per composited frame, `None` when unpaced
    pub fn frame_period(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs_f32(1.0 / self.fps as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CloakSettings::default();
        assert_eq!(settings.calibration, Duration::from_secs(5));
        assert_eq!(settings.background_warmup, Duration::from_secs(1));
        assert_eq!(settings.background_capture, Duration::from_secs(6));
        assert_eq!(settings.sample_half_width, 10);
        assert_eq!(settings.kernel().unwrap(), Kernel::default());
        assert_eq!(settings.band(), HueBand::default());
    }

    #[test]
    fn test_zero_fps_is_unpaced() {
        let settings = CloakSettings {
            fps: 0,
            ..CloakSettings::default()
        };
        assert_eq!(settings.frame_period(), None);
    }
}
