use glam::*;
use half::f16;

use crate::Error;

/// The encoding of samples in a [`DepthFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthFormat {
    /// Unsigned 16-bit integers in millimeters.
    U16Millimeters,

    /// Half precision floats in meters.
    F16Meters,

    /// Single precision floats in meters.
    F32Meters,
}

impl DepthFormat {
    /// Get the size of a single sample in bytes.
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::U16Millimeters | Self::F16Meters => 2,
            Self::F32Meters => 4,
        }
    }

    /// Get the factor converting a raw sample to meters.
    pub const fn meters_per_unit(&self) -> f32 {
        match self {
            Self::U16Millimeters => 0.001,
            Self::F16Meters | Self::F32Meters => 1.0,
        }
    }

    /// Decode a single native-endian sample.
    fn decode(&self, bytes: &[u8]) -> f32 {
        match self {
            Self::U16Millimeters => bytemuck::pod_read_unaligned::<u16>(bytes) as f32,
            Self::F16Meters => bytemuck::pod_read_unaligned::<f16>(bytes).to_f32(),
            Self::F32Meters => bytemuck::pod_read_unaligned::<f32>(bytes),
        }
    }
}

/// A single depth image from the sensor.
///
/// Samples are stored row-major in native byte order. Row 0 is the bottom row of the screen, so
/// the layout matches normalized screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFrame {
    /// Monotonic frame number assigned by the sensor feed.
    pub sequence: u64,
    /// The width in samples.
    pub width: u32,
    /// The height in samples.
    pub height: u32,
    /// The sample encoding.
    pub format: DepthFormat,
    /// The raw sample bytes.
    pub data: Vec<u8>,
}

impl DepthFrame {
    /// Create a frame from millimeter samples.
    pub fn from_millimeters(sequence: u64, width: u32, height: u32, samples: &[u16]) -> Self {
        Self {
            sequence,
            width,
            height,
            format: DepthFormat::U16Millimeters,
            data: bytemuck::cast_slice(samples).to_vec(),
        }
    }

    /// Create a frame from half precision meter samples.
    pub fn from_meters_f16(sequence: u64, width: u32, height: u32, samples: &[f16]) -> Self {
        Self {
            sequence,
            width,
            height,
            format: DepthFormat::F16Meters,
            data: bytemuck::cast_slice(samples).to_vec(),
        }
    }

    /// Create a frame from meter samples.
    pub fn from_meters(sequence: u64, width: u32, height: u32, samples: &[f32]) -> Self {
        Self {
            sequence,
            width,
            height,
            format: DepthFormat::F32Meters,
            data: bytemuck::cast_slice(samples).to_vec(),
        }
    }

    /// Get the size in samples.
    pub fn size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    /// Get the number of bytes the frame should hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_sample()
    }
}

/// The sensor feed providing depth frames.
pub trait DepthSource {
    /// Get the latest available frame, if any has arrived.
    ///
    /// This must never block waiting for a new frame. Returning the same frame again is fine,
    /// frames are only ingested once per [`DepthFrame::sequence`].
    fn latest_depth_frame(&mut self) -> Option<&DepthFrame>;
}

/// Samples metric depth from the latest ingested [`DepthFrame`].
#[derive(Debug, Default)]
pub struct DepthSampler {
    /// The sequence of the ingested frame.
    sequence: Option<u64>,
    /// The sequence of the last malformed frame.
    rejected: Option<u64>,
    /// The size of the sample buffer.
    size: UVec2,
    /// The format of the ingested frame.
    format: Option<DepthFormat>,
    /// Raw samples in the units of the format.
    samples: Vec<f32>,
}

impl DepthSampler {
    /// Create a new sampler without any frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sequence of the ingested frame.
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Get the size of the ingested frame.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    /// Check if a frame has been ingested.
    pub fn has_frame(&self) -> bool {
        self.sequence.is_some()
    }

    /// Ingest a frame.
    ///
    /// Frames with the same sequence as the ingested or the last rejected one are skipped. When
    /// the size or format changes, the sample buffer is reallocated before any sample is written.
    ///
    /// On error the sampler is invalidated, so sampling reports no data until the next valid
    /// frame.
    pub fn update(&mut self, frame: &DepthFrame) -> Result<(), Error> {
        if self.sequence == Some(frame.sequence) || self.rejected == Some(frame.sequence) {
            return Ok(());
        }

        let expected = frame.expected_len();
        if frame.data.len() != expected {
            self.invalidate();
            self.rejected = Some(frame.sequence);
            return Err(Error::DepthFrameSizeMismatch {
                width: frame.width,
                height: frame.height,
                format: frame.format,
                expected,
                actual: frame.data.len(),
            });
        }

        if self.size != frame.size() || self.format != Some(frame.format) {
            log::debug!(
                "Reallocating depth buffer for {}x{} {:?}",
                frame.width,
                frame.height,
                frame.format
            );

            self.samples = Vec::with_capacity(frame.width as usize * frame.height as usize);
            self.size = frame.size();
            self.format = Some(frame.format);
        }

        self.samples.clear();
        self.samples.extend(
            frame
                .data
                .chunks_exact(frame.format.bytes_per_sample())
                .map(|bytes| frame.format.decode(bytes)),
        );
        self.sequence = Some(frame.sequence);
        self.rejected = None;

        Ok(())
    }

    /// Drop the ingested frame.
    pub fn invalidate(&mut self) {
        self.sequence = None;
        self.format = None;
        self.size = UVec2::ZERO;
        self.samples.clear();
    }

    /// Sample the depth in meters at a normalized screen point.
    ///
    /// Uses the nearest sample at `floor(uv * (size - 1))`. Returns [`None`] when no frame is
    /// ingested, `uv` lies outside `[0, 1] x [0, 1]`, or the sample is not positive.
    pub fn sample(&self, uv: Vec2) -> Option<f32> {
        let format = self.format?;

        if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
            return None;
        }

        if self.size.x == 0 || self.size.y == 0 {
            return None;
        }

        let max_index = (self.size - UVec2::ONE).as_vec2();
        let x = (uv.x * max_index.x).floor() as usize;
        let y = (uv.y * max_index.y).floor() as usize;
        if x >= self.size.x as usize || y >= self.size.y as usize {
            return None;
        }

        let raw = *self.samples.get(y * self.size.x as usize + x)?;
        let meters = raw * format.meters_per_unit();

        (meters.is_finite() && meters > 0.0).then_some(meters)
    }
}
