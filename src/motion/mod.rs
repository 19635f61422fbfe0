//! Webcam motion detection: capture access, frame buffers and differencing.

pub mod capture;
pub mod detector;
pub mod frame;
pub mod synthetic;

pub use capture::{
    acquire_stream, ActiveCapture, CaptureBackend, CaptureConstraints, CaptureError, CaptureStream, FacingMode,
};
pub use detector::{frame_difference, DetectorState, MotionAnalyzer, MotionConfig, MotionDetector, MotionEvent};
pub use frame::{FrameError, MotionFrame, VideoFrame};
pub use synthetic::{CaptureCounters, SyntheticCamera};
