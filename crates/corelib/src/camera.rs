use std::f32::consts::FRAC_PI_2;

use crate::{Mat4, Vec3};

/// Orthogonal-ish frame derived from a heading/pitch pair.
///
/// `right` stays in the horizontal plane regardless of pitch, so `up` is only
/// unit length while `vertical` is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub direction: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl CameraBasis {
    /// Spherical to Cartesian, with `vertical` as elevation above the XZ plane.
    pub fn from_angles(horizontal: f32, vertical: f32) -> Self {
        let direction = Vec3::new(
            vertical.cos() * horizontal.sin(),
            vertical.sin(),
            vertical.cos() * horizontal.cos(),
        );
        let right = Vec3::new((horizontal - FRAC_PI_2).sin(), 0.0, (horizontal - FRAC_PI_2).cos());
        // Operand order fixes handedness.
        let up = right.cross(direction);
        Self {
            direction,
            right,
            up,
        }
    }
}

/// View + projection pair for one frame (column-major, OpenGL clip space).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.projection * self.view
    }

    /// MVP for a model matrix, ready for a `mat4` uniform.
    #[inline]
    pub fn mvp(&self, model: Mat4) -> [f32; 16] {
        (self.proj_view() * model).to_cols_array()
    }
}

/// Simple perspective camera (right-handed) looking along `direction`.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.direction, self.up)
    }

    /// OpenGL-style projection (z in [-1, 1]).
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn matrices(&self) -> CameraMatrices {
        CameraMatrices {
            view: self.view(),
            projection: self.proj(),
        }
    }
}
