use crate::background::capture_background;
use crate::calibration::calibrate;
use crate::capture::{read_mirrored, CaptureSource};
use crate::compositor::composite;
use crate::config::CloakSettings;
use crate::output::OutputSink;
use crate::segmentation::{segment, ColorRange};
use anyhow::{Context, Result};
use image::RgbImage;
use std::fmt;
use std::time::{Duration, Instant};

/// Stages of a cloak run; each is entered once and in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uncalibrated,
    ColorKnown,
    BackgroundKnown,
    Compositing,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Uncalibrated => "uncalibrated",
            Phase::ColorKnown => "color known",
            Phase::BackgroundKnown => "background known",
            Phase::Compositing => "compositing",
            Phase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

fn enter(phase: Phase) {
    tracing::info!("Phase: {}", phase);
}

/// The calibrated color and captured background, fixed for the rest of the run
#[derive(Debug, Clone)]
pub struct Session {
    pub range: ColorRange,
    pub background: RgbImage,
}

impl Session {
    /// Calibrate the cloak color, then capture the background
    pub fn establish<C: CaptureSource + ?Sized>(
        source: &mut C,
        settings: &CloakSettings,
    ) -> Result<Self> {
        enter(Phase::Uncalibrated);
        let range = calibrate(
            source,
            settings.calibration,
            settings.sample_half_width,
            &settings.band(),
        )?;

        enter(Phase::ColorKnown);
        let background = capture_background(
            source,
            settings.background_warmup,
            settings.background_capture,
        )?;

        enter(Phase::BackgroundKnown);
        Ok(Self { range, background })
    }
}

/// Why the compositing loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source stopped delivering frames
    EndOfStream,
    /// The output asked to stop
    Requested,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineStats {
    pub frames: u64,
    pub stop: StopReason,
    pub total_segment_time: Duration,
    pub total_composite_time: Duration,
    pub total_output_time: Duration,
}

/// Run the cloak effect until the source dries up or the sink asks to stop
pub fn run_compositing<C, O>(
    source: &mut C,
    sink: &mut O,
    session: &Session,
    settings: &CloakSettings,
) -> Result<PipelineStats>
where
    C: CaptureSource + ?Sized,
    O: OutputSink + ?Sized,
{
    let kernel = settings.kernel()?;
    let frame_duration = settings.frame_period();
    let mut frame_count = 0u64;
    let mut total_segment_time = Duration::ZERO;
    let mut total_composite_time = Duration::ZERO;
    let mut total_output_time = Duration::ZERO;

    enter(Phase::Compositing);
    tracing::info!("Recording started...");

    let stop = loop {
        let loop_start = Instant::now();

        let frame = match read_mirrored(source) {
            Ok(frame) => frame,
            Err(_) => break StopReason::EndOfStream,
        };

        let segment_start = Instant::now();
        let masks = segment(&frame, &session.range, &kernel);
        total_segment_time += segment_start.elapsed();

        let composite_start = Instant::now();
        let output_frame = composite(&session.background, &frame, &masks)
            .context("Failed to composite frame")?;
        total_composite_time += composite_start.elapsed();

        let output_start = Instant::now();
        sink.write_frame(&output_frame).context("Failed to write frame")?;
        sink.present(&output_frame).context("Failed to present frame")?;
        total_output_time += output_start.elapsed();

        frame_count += 1;

        // Log stats every 30 frames
        if frame_count % 30 == 0 {
            let avg_segment_ms = total_segment_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_composite_ms = total_composite_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let avg_output_ms = total_output_time.as_secs_f64() * 1000.0 / frame_count as f64;
            let total_ms = avg_segment_ms + avg_composite_ms + avg_output_ms;

            tracing::info!(
                "Frame {}: segment={:.1}ms, composite={:.1}ms, output={:.1}ms, fps={:.1}",
                frame_count,
                avg_segment_ms,
                avg_composite_ms,
                avg_output_ms,
                1000.0 / total_ms
            );
        }

        if sink.stop_requested() {
            break StopReason::Requested;
        }

        // Frame rate limiting
        if let Some(frame_duration) = frame_duration {
            let elapsed = loop_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
    };

    enter(Phase::Terminated);
    tracing::info!("Compositing stopped ({:?}) after {} frames", stop, frame_count);

    Ok(PipelineStats {
        frames: frame_count,
        stop,
        total_segment_time,
        total_composite_time,
        total_output_time,
    })
}
