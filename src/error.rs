use glam::*;
use thiserror::Error;

use crate::DepthFormat;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("snap threshold must be finite and non-negative, got {0}")]
    InvalidSnapThreshold(f32),
    #[error("snap change epsilon must be finite and non-negative, got {0}")]
    InvalidSnapChangeEpsilon(f32),
    #[error("smoothing rate must be non-negative, got {0}")]
    InvalidSmoothingRate(f32),
    #[error("crosshair must lie within [0, 1] x [0, 1], got {0}")]
    InvalidCrosshair(Vec2),
    #[error(
        "depth frame {width}x{height} ({format:?}) expects {expected} bytes, got {actual}"
    )]
    DepthFrameSizeMismatch {
        width: u32,
        height: u32,
        format: DepthFormat,
        expected: usize,
        actual: usize,
    },
}
