use bitflags::bitflags;
use glam::*;

use crate::Pose;

bitflags! {
    /// The kinds of tracked geometry a raycast may hit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackableType: u32 {
        /// Inside the boundary polygon of a detected plane.
        const PLANE_WITHIN_POLYGON = 1 << 0;
        /// Anywhere on the infinite extent of a detected plane.
        const PLANE_ESTIMATED = 1 << 1;
        /// A sparse tracked feature point.
        const FEATURE_POINT = 1 << 2;
        /// Scanned depth geometry.
        const DEPTH = 1 << 3;
    }
}

impl Default for TrackableType {
    fn default() -> Self {
        Self::FEATURE_POINT | Self::PLANE_WITHIN_POLYGON
    }
}

/// A single geometry intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryHit {
    /// The pose of the intersection, oriented to the surface.
    pub pose: Pose,
    /// The distance from the camera.
    pub distance: f32,
    /// The kind of geometry hit.
    pub trackable: TrackableType,
}

/// Raycasts against tracked planes and feature points.
pub trait GeometryRaycaster {
    /// Cast a ray through a normalized screen point and append the hits to `hits`.
    ///
    /// Hits should be nearest first, but callers do not rely on it.
    fn raycast(&mut self, screen_point: Vec2, trackables: TrackableType, hits: &mut Vec<GeometryHit>);
}

/// Get the hit with the smallest distance.
///
/// The first hit wins ties. Hits with a non-finite distance are ignored.
pub fn nearest_hit(hits: &[GeometryHit]) -> Option<&GeometryHit> {
    hits.iter()
        .filter(|hit| hit.distance.is_finite())
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
