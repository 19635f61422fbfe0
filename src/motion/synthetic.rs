//! Software camera: a bright square circling over a dark background.
//!
//! Stands in for a platform camera in the headless driver and in tests, with
//! switches for the failure modes a real device can show.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::motion::capture::{CaptureBackend, CaptureConstraints, CaptureError, CaptureStream, FacingMode};
use crate::motion::frame::VideoFrame;

const BACKGROUND: [u8; 3] = [16, 20, 24];
const SQUARE: [u8; 3] = [240, 236, 220];
/// Angle the square advances per frame, radians
const ANGULAR_STEP: f32 = 0.15;

/// Open/release bookkeeping shared between a camera and its streams
#[derive(Debug, Default)]
pub struct CaptureCounters {
    open_attempts: AtomicUsize,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl CaptureCounters {
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Streams opened and not yet stopped
    pub fn open_streams(&self) -> usize {
        self.opened().saturating_sub(self.released())
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    has_front_camera: bool,
    failure: Option<CaptureError>,
    end_after: Option<usize>,
    counters: Arc<CaptureCounters>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            has_front_camera: true,
            failure: None,
            end_after: None,
            counters: Arc::new(CaptureCounters::default()),
        }
    }

    /// Only a rear camera: requests for a user-facing one fail
    pub fn without_front_camera(mut self) -> Self {
        self.has_front_camera = false;
        self
    }

    /// Every open fails with `error`
    pub fn failing_with(mut self, error: CaptureError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Streams fail with [`CaptureError::StreamEnded`] after `frames` frames
    pub fn ending_after(mut self, frames: usize) -> Self {
        self.end_after = Some(frames);
        self
    }

    pub fn counters(&self) -> Arc<CaptureCounters> {
        self.counters.clone()
    }
}

impl CaptureBackend for SyntheticCamera {
    fn open(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream + Send>, CaptureError> {
        self.counters.open_attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if constraints.facing == Some(FacingMode::User) && !self.has_front_camera {
            return Err(CaptureError::ConstraintsUnsatisfied(
                "no user-facing camera".to_string(),
            ));
        }

        let (width, height) = constraints.ideal_size.unwrap_or((self.width, self.height));
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        log::debug!("Synthetic camera opened at {}x{}", width, height);

        Ok(Box::new(SyntheticStream {
            width: width.max(1),
            height: height.max(1),
            frame_index: 0,
            end_after: self.end_after,
            stopped: false,
            counters: self.counters.clone(),
        }))
    }
}

struct SyntheticStream {
    width: u32,
    height: u32,
    frame_index: usize,
    end_after: Option<usize>,
    stopped: bool,
    counters: Arc<CaptureCounters>,
}

impl SyntheticStream {
    fn render(&self) -> Result<VideoFrame, CaptureError> {
        let mut frame = VideoFrame::filled(self.width, self.height, BACKGROUND)
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let (w, h) = (self.width as f32, self.height as f32);
        let size = (w.min(h) / 6.0).max(1.0);
        let angle = self.frame_index as f32 * ANGULAR_STEP;
        let cx = w * 0.5 + w * 0.25 * angle.cos();
        let cy = h * 0.5 + h * 0.25 * angle.sin();

        let x0 = (cx - size * 0.5).max(0.0) as u32;
        let y0 = (cy - size * 0.5).max(0.0) as u32;
        let x1 = ((cx + size * 0.5) as u32).min(self.width);
        let y1 = ((cy + size * 0.5) as u32).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                frame.set_rgb(x, y, SQUARE);
            }
        }
        Ok(frame)
    }
}

impl CaptureStream for SyntheticStream {
    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        if self.stopped {
            return Err(CaptureError::StreamEnded);
        }
        if self.end_after.is_some_and(|n| self.frame_index >= n) {
            return Err(CaptureError::StreamEnded);
        }

        let frame = self.render()?;
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.counters.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_change_over_time() {
        let mut camera = SyntheticCamera::new(64, 48);
        let mut stream = camera.open(&CaptureConstraints::relaxed()).expect("opens");

        let first = stream.read_frame().expect("frame").expect("ready");
        let second = stream.read_frame().expect("frame").expect("ready");
        assert_eq!(first.width(), 64);
        assert_eq!(first.height(), 48);
        assert_ne!(first, second);
    }

    #[test]
    fn test_preferred_size_is_honored() {
        let mut camera = SyntheticCamera::new(64, 48);
        let mut stream = camera.open(&CaptureConstraints::preferred()).expect("opens");
        let frame = stream.read_frame().expect("frame").expect("ready");
        assert_eq!((frame.width(), frame.height()), (640, 480));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut camera = SyntheticCamera::new(64, 48);
        let counters = camera.counters();
        let mut stream = camera.open(&CaptureConstraints::relaxed()).expect("opens");

        stream.stop();
        stream.stop();
        drop(stream);
        assert_eq!(counters.released(), 1);
        assert_eq!(counters.open_streams(), 0);
    }

    #[test]
    fn test_stopped_stream_yields_error() {
        let mut camera = SyntheticCamera::new(64, 48);
        let mut stream = camera.open(&CaptureConstraints::relaxed()).expect("opens");
        stream.stop();
        assert_eq!(stream.read_frame(), Err(CaptureError::StreamEnded));
    }
}
