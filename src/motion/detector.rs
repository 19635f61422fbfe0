//! Webcam motion detection by frame differencing.
//!
//! Each captured frame is box-filtered into a 64×48 buffer and compared with
//! the previous one. Pixels whose summed absolute RGB difference exceeds the
//! pixel threshold are "active"; their count is the motion mass and their
//! mean position (mirrored horizontally, so the view acts like a mirror) is
//! reported in NDC. One event per frame at most, no smoothing.
//!
//! The detector lives in the capture domain. Events only leave it through a
//! [`SpawnRequestSender`]; it never touches the particle pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::input::requests::{SpawnRequest, SpawnRequestSender};
use crate::motion::capture::{acquire_stream, ActiveCapture, CaptureBackend, CaptureError};
use crate::motion::frame::{MotionFrame, VideoFrame};

/// A detected motion centroid in NDC with its pixel mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    /// Mirrored horizontal position in [-1, 1]
    pub x: f32,
    /// Vertical position in [-1, 1], up positive
    pub y: f32,
    /// Number of active pixels
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub analysis_width: usize,
    pub analysis_height: usize,
    /// Per-pixel `|ΔR| + |ΔG| + |ΔB|` must exceed this to count
    pub pixel_threshold: u32,
    /// Active pixel count must exceed this to emit an event
    pub mass_threshold: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            analysis_width: 64,
            analysis_height: 48,
            pixel_threshold: 30,
            mass_threshold: 15,
        }
    }
}

/// Accumulated frame difference
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub mass: u32,
    sum_x: u64,
    sum_y: u64,
}

impl MotionSample {
    /// Mirrored centroid in analysis pixels, `None` without active pixels
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.mass == 0 {
            return None;
        }
        let mass = self.mass as f32;
        Some((self.sum_x as f32 / mass, self.sum_y as f32 / mass))
    }
}

/// Difference two equally sized buffers
pub fn frame_difference(previous: &MotionFrame, current: &MotionFrame, pixel_threshold: u32) -> MotionSample {
    let width = current.width().min(previous.width());
    let height = current.height().min(previous.height());

    let mut sample = MotionSample::default();
    for y in 0..height {
        for x in 0..width {
            let a = previous.pixel(x, y);
            let b = current.pixel(x, y);
            let delta: u32 = a
                .iter()
                .zip(b.iter())
                .map(|(&p, &c)| (p as i32 - c as i32).unsigned_abs())
                .sum();
            if delta > pixel_threshold {
                sample.mass += 1;
                sample.sum_x += (width - 1 - x) as u64;
                sample.sum_y += y as u64;
            }
        }
    }
    sample
}

/// Pure per-frame analysis: holds the previous buffer, nothing else
#[derive(Debug)]
pub struct MotionAnalyzer {
    config: MotionConfig,
    current: MotionFrame,
    previous: MotionFrame,
    has_previous: bool,
}

impl MotionAnalyzer {
    pub fn new(config: MotionConfig) -> Self {
        let width = config.analysis_width.max(1);
        let height = config.analysis_height.max(1);
        Self {
            config,
            current: MotionFrame::new(width, height),
            previous: MotionFrame::new(width, height),
            has_previous: false,
        }
    }

    /// Compare `frame` with the previous one and remember it.
    ///
    /// The first frame after construction only primes the buffer.
    pub fn analyze(&mut self, frame: &VideoFrame) -> Option<MotionEvent> {
        self.current.downsample_from(frame);

        let event = if self.has_previous {
            let sample = frame_difference(&self.previous, &self.current, self.config.pixel_threshold);
            self.event_from(&sample)
        } else {
            None
        };

        std::mem::swap(&mut self.previous, &mut self.current);
        self.has_previous = true;
        event
    }

    fn event_from(&self, sample: &MotionSample) -> Option<MotionEvent> {
        if sample.mass <= self.config.mass_threshold {
            return None;
        }
        let (cx, cy) = sample.centroid()?;
        let width = self.current.width() as f32;
        let height = self.current.height() as f32;
        Some(MotionEvent {
            x: (cx / width) * 2.0 - 1.0,
            y: -((cy / height) * 2.0 - 1.0),
            intensity: sample.mass as f32,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    Idle,
    Active,
}

/// Owns the capture stream while enabled and turns frames into spawn requests
pub struct MotionDetector {
    config: MotionConfig,
    sender: SpawnRequestSender,
    enabled: Arc<AtomicBool>,
    capture: Option<ActiveCapture>,
    analyzer: Option<MotionAnalyzer>,
    last_error: Option<CaptureError>,
}

impl MotionDetector {
    pub fn new(config: MotionConfig, sender: SpawnRequestSender) -> Self {
        Self {
            config,
            sender,
            enabled: Arc::new(AtomicBool::new(false)),
            capture: None,
            analyzer: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> DetectorState {
        if self.capture.is_some() {
            DetectorState::Active
        } else {
            DetectorState::Idle
        }
    }

    /// Most recent acquisition or stream failure, for display
    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    /// Shared flag that frame callbacks can check before doing any work
    pub fn enabled_flag(&self) -> Arc<AtomicBool> {
        self.enabled.clone()
    }

    /// Idle → Active. On failure the detector stays Idle and the error is
    /// kept in [`Self::last_error`]. Enabling an active detector is a no-op.
    pub fn enable(&mut self, backend: &mut dyn CaptureBackend) -> Result<(), CaptureError> {
        if self.capture.is_some() {
            return Ok(());
        }

        log::info!("Enabling motion detection");
        match acquire_stream(backend) {
            Ok(capture) => {
                self.capture = Some(capture);
                self.analyzer = Some(MotionAnalyzer::new(self.config.clone()));
                self.last_error = None;
                self.enabled.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                log::warn!("Motion detection unavailable: {}", e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Active → Idle: stop capture, release the device, drop the buffers
    pub fn disable(&mut self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.analyzer = None;
        if self.capture.take().is_some() {
            log::info!("Motion detection disabled, camera released");
        }
    }

    /// Read and analyze the next frame from the stream, if one is ready.
    ///
    /// A stream failure moves the detector to Idle (releasing the device)
    /// and is returned.
    pub fn poll(&mut self) -> Result<Option<MotionEvent>, CaptureError> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(None);
        };

        match capture.read_frame() {
            Ok(Some(frame)) => Ok(self.on_frame(&frame)),
            Ok(None) => Ok(None),
            Err(e) => {
                log::warn!("Capture stream failed: {}", e);
                self.last_error = Some(e.clone());
                self.disable();
                Err(e)
            }
        }
    }

    /// Frame callback. Ignored once the detector has been disabled.
    pub fn on_frame(&mut self, frame: &VideoFrame) -> Option<MotionEvent> {
        if !self.enabled.load(Ordering::SeqCst) {
            return None;
        }
        let event = self.analyzer.as_mut()?.analyze(frame)?;

        log::trace!(
            "Motion at ({:.2}, {:.2}) intensity {}",
            event.x,
            event.y,
            event.intensity
        );
        self.sender.send(SpawnRequest::Motion(event));
        Some(event)
    }
}

impl Drop for MotionDetector {
    fn drop(&mut self) {
        self.disable();
    }
}
