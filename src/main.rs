mod background;
mod calibration;
mod capture;
mod compositor;
mod config;
mod error;
mod output;
mod segmentation;
mod session;

use anyhow::{Context, Result};
use capture::{CaptureSource, WebcamCapture};
use clap::Parser;
use config::CloakSettings;
use output::{CloakOutput, FrameRecorder, StopFlag, V4L2Output};
use session::{run_compositing, Session};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Capture resolution width
    #[arg(long, default_value_t = 1280)]
    capture_width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 720)]
    capture_height: u32,

    /// Target frames per second (0 disables pacing)
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Directory receiving the recorded frames
    #[arg(short, long, default_value = "Invisible_Cloak_Output")]
    output_dir: PathBuf,

    /// Optional v4l2loopback device for live preview, e.g. /dev/video10
    #[arg(long)]
    preview_device: Option<PathBuf>,

    /// Stop after this many composited frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Seconds to let the camera settle before calibration
    #[arg(long, default_value_t = 2.0)]
    camera_warmup_secs: f32,

    /// Seconds spent sampling the cloak color
    #[arg(long, default_value_t = 5.0)]
    calibration_secs: f32,

    /// Half the side of the sampled center square, in pixels
    #[arg(long, default_value_t = 10)]
    sample_half_width: u32,

    /// Hue tolerance either side of the sampled color (0-179 scale)
    #[arg(long, default_value_t = 10)]
    hue_margin: u8,

    /// Minimum saturation still treated as cloak
    #[arg(long, default_value_t = 40)]
    saturation_floor: u8,

    /// Minimum value (brightness) still treated as cloak
    #[arg(long, default_value_t = 40)]
    value_floor: u8,

    /// Seconds to step out of view before the background is taken
    #[arg(long, default_value_t = 1.0)]
    background_warmup_secs: f32,

    /// Seconds spent capturing the background
    #[arg(long, default_value_t = 6.0)]
    background_secs: f32,

    /// Side of the square morphology kernel used to clean the mask
    #[arg(long, default_value_t = 3)]
    kernel_size: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> Result<CloakSettings> {
        let secs = |name: &str, value: f32| {
            Duration::try_from_secs_f32(value)
                .with_context(|| format!("Invalid --{} value {}", name, value))
        };

        Ok(CloakSettings {
            camera_warmup: secs("camera-warmup-secs", self.camera_warmup_secs)?,
            calibration: secs("calibration-secs", self.calibration_secs)?,
            sample_half_width: self.sample_half_width,
            hue_margin: self.hue_margin,
            saturation_floor: self.saturation_floor,
            value_floor: self.value_floor,
            background_warmup: secs("background-warmup-secs", self.background_warmup_secs)?,
            background_capture: secs("background-secs", self.background_secs)?,
            kernel_size: self.kernel_size,
            fps: self.fps,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let settings = args.settings()?;
    settings.kernel().context("Invalid --kernel-size")?;

    tracing::info!("Cloak FX starting");
    tracing::debug!("{:?}", settings);

    // Initialize capture
    let mut capture = WebcamCapture::new(
        args.input_device,
        args.capture_width,
        args.capture_height,
        args.fps.max(1),
    )
    .context("Failed to initialize webcam capture")?;
    let (width, height) = capture.resolution();
    tracing::info!("Capture: {}x{}", width, height);

    // Initialize outputs
    let recorder = FrameRecorder::new(&args.output_dir).context("Failed to initialize recorder")?;
    let preview = match &args.preview_device {
        Some(path) => Some(
            V4L2Output::new(path, width, height)
                .context("Failed to initialize v4l2loopback preview")?,
        ),
        None => None,
    };
    let stop = StopFlag::new();
    let mut output = CloakOutput::new(recorder, preview, args.max_frames, stop.clone());

    // Allow camera to warm up
    std::thread::sleep(settings.camera_warmup);

    let session = Session::establish(&mut capture, &settings)?;

    stop.spawn_stdin_listener();
    tracing::info!("Type q and press Enter to stop recording");
    let stats = run_compositing(&mut capture, &mut output, &session, &settings)?;

    if stats.frames > 0 {
        let per_frame = |total: Duration| total.as_secs_f64() * 1000.0 / stats.frames as f64;
        tracing::info!(
            "Averages: segment={:.1}ms, composite={:.1}ms, output={:.1}ms",
            per_frame(stats.total_segment_time),
            per_frame(stats.total_composite_time),
            per_frame(stats.total_output_time)
        );
    }
    tracing::info!(
        "Recording saved successfully at: {} ({} frames, {:?})",
        output.recorder().dir().display(),
        stats.frames,
        stats.stop
    );

    Ok(())
}
