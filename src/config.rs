use glam::*;

use crate::{Error, HapticPulse, Label, ResolvePolicy, TrackableType};

/// The configuration of a [`MeasureController`](crate::MeasureController).
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    /// Distance in meters within which the marker snaps to existing features.
    ///
    /// Zero disables snapping.
    pub snap_threshold: f32,
    /// Minimum movement in meters of the snap target that counts as a new acquisition.
    pub snap_change_epsilon: f32,
    /// Exponential approach rate of the marker animation, per second.
    pub smoothing_rate: f32,
    /// The pulse fired on each new snap acquisition.
    pub haptic_pulse: HapticPulse,
    /// Upward offset in meters of label anchors from segment midpoints.
    pub label_bias: f32,
    /// The normalized screen point to resolve.
    pub crosshair: Vec2,
    /// The order of point resolution.
    pub resolve_policy: ResolvePolicy,
    /// The trackables the geometry raycast may hit.
    pub trackables: TrackableType,
    /// Marker rotation relative to the surface when not snapped.
    pub marker_rest_rotation: Quat,
}

impl MeasureConfig {
    /// The screen center.
    pub const SCREEN_CENTER: Vec2 = Vec2::splat(0.5);

    /// Set the snap threshold.
    pub fn with_snap_threshold(mut self, snap_threshold: f32) -> Self {
        self.snap_threshold = snap_threshold;
        self
    }

    /// Set the smoothing rate.
    pub fn with_smoothing_rate(mut self, smoothing_rate: f32) -> Self {
        self.smoothing_rate = smoothing_rate;
        self
    }

    /// Set the crosshair.
    pub fn with_crosshair(mut self, crosshair: Vec2) -> Self {
        self.crosshair = crosshair;
        self
    }

    /// Set the resolve policy.
    pub fn with_resolve_policy(mut self, resolve_policy: ResolvePolicy) -> Self {
        self.resolve_policy = resolve_policy;
        self
    }

    /// Set the trackables.
    pub fn with_trackables(mut self, trackables: TrackableType) -> Self {
        self.trackables = trackables;
        self
    }

    /// Set the haptic pulse.
    pub fn with_haptic_pulse(mut self, haptic_pulse: HapticPulse) -> Self {
        self.haptic_pulse = haptic_pulse;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(Error::InvalidSnapThreshold(self.snap_threshold));
        }

        if !self.snap_change_epsilon.is_finite() || self.snap_change_epsilon < 0.0 {
            return Err(Error::InvalidSnapChangeEpsilon(self.snap_change_epsilon));
        }

        if self.smoothing_rate.is_nan() || self.smoothing_rate < 0.0 {
            return Err(Error::InvalidSmoothingRate(self.smoothing_rate));
        }

        validate_crosshair(self.crosshair)
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 0.05,
            snap_change_epsilon: 0.001,
            smoothing_rate: 10.0,
            haptic_pulse: HapticPulse::default(),
            label_bias: Label::DEFAULT_BIAS,
            crosshair: Self::SCREEN_CENTER,
            resolve_policy: ResolvePolicy::default(),
            trackables: TrackableType::default(),
            marker_rest_rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
        }
    }
}

/// Check that a crosshair lies within `[0, 1] x [0, 1]`.
pub(crate) fn validate_crosshair(crosshair: Vec2) -> Result<(), Error> {
    match (0.0..=1.0).contains(&crosshair.x) && (0.0..=1.0).contains(&crosshair.y) {
        true => Ok(()),
        false => Err(Error::InvalidCrosshair(crosshair)),
    }
}
