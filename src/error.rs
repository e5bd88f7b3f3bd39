use thiserror::Error;

/// Errors raised by the cloak pipeline stages
#[derive(Debug, Error)]
pub enum CloakError {
    /// A single read from the frame source failed
    #[error("No frame available from capture source")]
    FrameUnavailable,

    /// Not a single frame could be sampled during the color window
    #[error("Color calibration failed: no frame was sampled in {window_secs:.1}s")]
    CalibrationFailed { window_secs: f32 },

    /// Not a single frame could be read during the background window
    #[error("Background capture failed: no frame was read in {window_secs:.1}s")]
    BackgroundCaptureFailed { window_secs: f32 },

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Structuring element must be non-empty, got {width}x{height}")]
    InvalidKernel { width: u32, height: u32 },
}
