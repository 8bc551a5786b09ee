use glam::*;

/// Get the fraction of the remaining gap to close this frame.
///
/// This is `1 - e^(-rate * dt)`, so repeated steps converge exponentially and independently of
/// the frame rate. Non-positive `rate` or `dt` gives 0, an infinite `rate` gives 1.
pub fn approach_factor(rate: f32, dt: f32) -> f32 {
    if rate.is_nan() || dt.is_nan() || rate <= 0.0 || dt <= 0.0 {
        return 0.0;
    }

    1.0 - (-rate * dt).exp()
}

/// A value that can be moved a fraction of the way toward a target.
pub trait Approach: Sized {
    /// Interpolate toward `target` by `t` in `[0, 1]`.
    fn interpolate(self, target: Self, t: f32) -> Self;

    /// Move toward `target` at `rate` over `dt` seconds.
    fn approach(self, target: Self, rate: f32, dt: f32) -> Self {
        self.interpolate(target, approach_factor(rate, dt))
    }
}

impl Approach for Vec3 {
    fn interpolate(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Approach for Quat {
    fn interpolate(self, target: Self, t: f32) -> Self {
        self.slerp(target, t).normalize()
    }
}
