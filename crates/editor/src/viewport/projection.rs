//! Screen projection used by interactive gestures.
//!
//! The editor never reads the camera directly. Whoever owns the camera hands
//! the core a [`ScreenProjection`] and replaces it when the view changes.
//! Screen coordinates are normalized device coordinates: x and y in [-1, 1],
//! z is depth.

use glam::{Mat4, Vec3};

/// Maps between world space and normalized screen space
pub trait ScreenProjection {
    /// World point to screen; `None` if the point is behind the camera
    fn project(&self, world: Vec3) -> Option<Vec3>;
    /// Screen point (with depth) back to world space
    fn unproject(&self, screen: Vec3) -> Option<Vec3>;
    /// Direction the camera looks along, world space
    fn view_direction(&self) -> Vec3;
}

/// View + projection matrices of a camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLens {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraLens {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    pub fn orthographic(eye: Vec3, target: Vec3, up: Vec3, half_width: f32, half_height: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::orthographic_rh_gl(
                -half_width,
                half_width,
                -half_height,
                half_height,
                0.1,
                1000.0,
            ),
        }
    }

    pub fn perspective(eye: Vec3, target: Vec3, up: Vec3, fov_y: f32, aspect: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh_gl(fov_y, aspect, 0.1, 1000.0),
        }
    }

    /// Orthographic front view: looking along +Y with Z up, so screen x is
    /// world x and screen y is world z. One screen unit spans `half_extent`.
    pub fn front(half_extent: f32) -> Self {
        Self::orthographic(Vec3::new(0.0, -50.0, 0.0), Vec3::ZERO, Vec3::Z, half_extent, half_extent)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl ScreenProjection for CameraLens {
    fn project(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    fn unproject(&self, screen: Vec3) -> Option<Vec3> {
        let p = self.view_projection().inverse() * screen.extend(1.0);
        if p.w.abs() <= f32::EPSILON {
            return None;
        }
        Some(p.truncate() / p.w)
    }

    fn view_direction(&self) -> Vec3 {
        self.view
            .inverse()
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }
}
