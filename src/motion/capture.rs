//! Capture device access.
//!
//! Platform camera APIs sit behind [`CaptureBackend`] / [`CaptureStream`].
//! [`acquire_stream`] asks for the front-facing camera first and retries once
//! with relaxed constraints; the returned [`ActiveCapture`] stops the stream
//! when dropped so every exit path releases the device.

use crate::motion::frame::VideoFrame;

/// Error type for camera acquisition and streaming.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device available")]
    NoDevice,
    #[error("camera access requires a secure context")]
    InsecureContext,
    #[error("no camera satisfies the requested constraints: {0}")]
    ConstraintsUnsatisfied(String),
    #[error("capture stream ended")]
    StreamEnded,
    #[error("capture device error: {0}")]
    Device(String),
}

impl CaptureError {
    /// Whether a retry with less strict constraints can succeed.
    ///
    /// Denied permission and insecure contexts fail the same way for any
    /// camera.
    pub fn is_transient(&self) -> bool {
        !matches!(self, CaptureError::PermissionDenied | CaptureError::InsecureContext)
    }
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    User,
    Environment,
}

/// What to ask the capture backend for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    /// `None` accepts any camera
    pub facing: Option<FacingMode>,
    /// Preferred frame size; backends may deliver something else
    pub ideal_size: Option<(u32, u32)>,
}

impl CaptureConstraints {
    /// First attempt: the front-facing camera
    pub fn preferred() -> Self {
        Self {
            facing: Some(FacingMode::User),
            ideal_size: Some((640, 480)),
        }
    }

    /// Fallback: any camera at any size
    pub fn relaxed() -> Self {
        Self {
            facing: None,
            ideal_size: None,
        }
    }
}

/// Opens capture streams
pub trait CaptureBackend {
    fn open(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream + Send>, CaptureError>;
}

/// An open camera
pub trait CaptureStream {
    /// Next frame. `Ok(None)` when no new frame is ready yet; `Err` when the
    /// stream has failed and will produce no more frames.
    fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError>;

    /// Stop every track and release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Owned open stream; stops it on drop
pub struct ActiveCapture {
    stream: Box<dyn CaptureStream + Send>,
}

impl ActiveCapture {
    pub fn new(stream: Box<dyn CaptureStream + Send>) -> Self {
        Self { stream }
    }

    pub fn read_frame(&mut self) -> Result<Option<VideoFrame>, CaptureError> {
        self.stream.read_frame()
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        self.stream.stop();
    }
}

impl std::fmt::Debug for ActiveCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveCapture").finish_non_exhaustive()
    }
}

/// Open a stream, preferring the front camera, with one relaxed retry
pub fn acquire_stream(backend: &mut dyn CaptureBackend) -> Result<ActiveCapture, CaptureError> {
    match backend.open(&CaptureConstraints::preferred()) {
        Ok(stream) => Ok(ActiveCapture::new(stream)),
        Err(e) if e.is_transient() => {
            log::warn!("Preferred camera unavailable ({}), retrying with any camera", e);
            backend
                .open(&CaptureConstraints::relaxed())
                .map(ActiveCapture::new)
        }
        Err(e) => Err(e),
    }
}
