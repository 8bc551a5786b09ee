use std::ops::Range;

use glam::*;

/// A tracked device camera.
///
/// The camera is right-handed and looks down its local -Z axis, matching [`Mat4::look_to_rh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The position of the camera.
    pub pos: Vec3,
    /// The rotation of the camera.
    pub rot: Quat,
    /// The vertical FOV.
    pub vertical_fov: f32,
    /// The aspect ratio of the screen, width over height.
    pub aspect_ratio: f32,
}

impl Camera {
    /// Up direction.
    pub const UP: Vec3 = Vec3::Y;

    /// Create a new camera at the origin looking down -Z.
    pub fn new(vertical_fov: f32, aspect_ratio: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            vertical_fov,
            aspect_ratio,
        }
    }

    /// Set the pose of the camera.
    pub fn with_pose(mut self, pos: Vec3, rot: Quat) -> Self {
        self.pos = pos;
        self.rot = rot;
        self
    }

    /// Get the forward vector.
    pub fn get_forward(&self) -> Vec3 {
        self.rot * Vec3::NEG_Z
    }

    /// Get the right vector.
    pub fn get_right(&self) -> Vec3 {
        self.rot * Vec3::X
    }

    /// Get the view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.pos, self.get_forward(), self.rot * Self::UP)
    }

    /// Get the projection matrix.
    pub fn projection(&self, z: Range<f32>) -> Mat4 {
        Mat4::perspective_rh(self.vertical_fov, self.aspect_ratio, z.start, z.end)
    }

    /// Convert a normalized screen point and a metric depth into a world position.
    ///
    /// `uv` has its origin at the bottom left of the screen. `depth` is the distance along the
    /// camera forward axis, not along the ray, which is what depth sensors report.
    pub fn unproject(&self, uv: Vec2, depth: f32) -> Vec3 {
        let pos_view = (self.uv_to_tangent(uv) * depth).extend(-depth);
        self.pos + self.rot * pos_view
    }

    /// Convert a world position into a normalized screen point.
    ///
    /// Returns [`None`] if the position is not in front of the camera.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let pos_view = self.rot.inverse() * (world - self.pos);
        let depth = -pos_view.z;
        if depth <= f32::EPSILON {
            return None;
        }

        let tangent = pos_view.xy() / depth;
        Some((tangent / self.tangent_scale() + Vec2::ONE) * 0.5)
    }

    /// Scale from NDC to the view-space tangent at unit depth.
    fn tangent_scale(&self) -> Vec2 {
        let tan_half_fov = (self.vertical_fov * 0.5).tan();
        vec2(tan_half_fov * self.aspect_ratio, tan_half_fov)
    }

    fn uv_to_tangent(&self, uv: Vec2) -> Vec2 {
        (uv * 2.0 - Vec2::ONE) * self.tangent_scale()
    }
}

/// Convert a pixel position to a normalized screen point.
///
/// Both the pixel position and the result have their origin at the bottom left of the screen.
pub fn normalize_screen_point(pixel: Vec2, screen_size: UVec2) -> Vec2 {
    pixel / screen_size.max(UVec2::ONE).as_vec2()
}
