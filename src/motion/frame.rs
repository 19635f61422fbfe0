//! Video frames from the capture device and the fixed-size analysis buffer.

/// Error type for malformed video frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("RGBA buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },
}

/// One RGBA8 frame as delivered by a capture stream
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(FrameError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Frame filled with a single opaque color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Result<Self, FrameError> {
        let pixels = [rgb[0], rgb[1], rgb[2], 255].repeat(width as usize * height as usize);
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB of the pixel at `(x, y)`; alpha is ignored by the detector
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 3].copy_from_slice(&rgb);
    }
}

/// Low-resolution RGB buffer the frame differencing runs on.
///
/// Allocated once at the analysis size and overwritten in place each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionFrame {
    width: usize,
    height: usize,
    rgb: Vec<[u8; 3]>,
}

impl MotionFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: vec![[0; 3]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.rgb[y * self.width + x]
    }

    /// Box-filter `frame` down (or up) to this buffer's size
    pub fn downsample_from(&mut self, frame: &VideoFrame) {
        let src_w = frame.width() as usize;
        let src_h = frame.height() as usize;

        for y in 0..self.height {
            let (y0, y1) = source_span(y, self.height, src_h);
            for x in 0..self.width {
                let (x0, x1) = source_span(x, self.width, src_w);

                let mut sum = [0u32; 3];
                for sy in y0..y1 {
                    for sx in x0..x1 {
                        let [r, g, b] = frame.rgb(sx as u32, sy as u32);
                        sum[0] += r as u32;
                        sum[1] += g as u32;
                        sum[2] += b as u32;
                    }
                }
                let count = ((y1 - y0) * (x1 - x0)) as u32;
                self.rgb[y * self.width + x] = [
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                ];
            }
        }
    }
}

// Source range covered by target cell `i`, never empty
fn source_span(i: usize, target: usize, source: usize) -> (usize, usize) {
    let start = (i * source / target).min(source - 1);
    let end = ((i + 1) * source / target).clamp(start + 1, source);
    (start, end)
}
