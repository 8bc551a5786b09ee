use glam::*;

use crate::{Label, Segment};

/// An opaque handle to a visual owned by the [`MeasureRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// The visuals of a single [`MeasurementPair`](crate::MeasurementPair).
///
/// The pair is responsible for requesting destruction of every one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairVisuals {
    /// The marker at point A.
    pub point_a: VisualHandle,
    /// The marker at point B.
    pub point_b: VisualHandle,
    /// The connecting segment.
    pub segment: VisualHandle,
    /// The distance label.
    pub label: VisualHandle,
}

impl PairVisuals {
    /// Get all handles, in destruction order.
    pub const fn handles(&self) -> [VisualHandle; 4] {
        [self.point_a, self.point_b, self.segment, self.label]
    }
}

/// The rendering collaborator.
///
/// Visuals are independently owned display resources, they must be destroyed explicitly.
pub trait MeasureRenderer {
    /// Spawn a placement marker.
    fn spawn_marker(&mut self, position: Vec3) -> VisualHandle;

    /// Spawn a segment between two placed points.
    fn spawn_segment(&mut self, segment: Segment) -> VisualHandle;

    /// Spawn a distance label.
    fn spawn_label(&mut self, label: &Label) -> VisualHandle;

    /// Destroy a visual.
    fn destroy(&mut self, handle: VisualHandle);
}

/// The haptic feedback collaborator.
pub trait Haptics {
    /// Fire a vibration pulse. Fire-and-forget.
    fn pulse(&mut self, duration_ms: u32, intensity: u8);
}

/// A haptic pulse configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HapticPulse {
    /// The duration in milliseconds.
    pub duration_ms: u32,
    /// The intensity.
    pub intensity: u8,
}

impl HapticPulse {
    /// Fire the pulse on `haptics`.
    pub fn fire(&self, haptics: &mut dyn Haptics) {
        haptics.pulse(self.duration_ms, self.intensity);
    }
}

impl Default for HapticPulse {
    fn default() -> Self {
        Self {
            duration_ms: 25,
            intensity: 100,
        }
    }
}
