use super::constants::{CAMERA_FAR, CAMERA_FOV_Y_DEG, CAMERA_NEAR, CAMERA_Z};
use super::pointer::{ease_toward, PointerTarget};
use glam::{Mat4, Vec3};

/// Perspective camera looking down -Z with no rotation; only its position moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            fov_y_deg: CAMERA_FOV_Y_DEG,
            aspect: sanitize_aspect(aspect),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    /// Move a fraction of the way toward the pointer. Screen-down pointer
    /// motion maps to world-down camera motion, hence the negated y.
    pub fn ease_toward_pointer(&mut self, target: PointerTarget, factor: f32) {
        self.position.x = ease_toward(self.position.x, target.x, factor);
        self.position.y = ease_toward(self.position.y, -target.y, factor);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}

#[inline]
fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}
