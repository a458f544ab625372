//! Fixed backdrop camera and screen-to-field projection.
//!
//! The camera never moves; only the aspect ratio follows viewport resizes.
//! These routines take raw dimensions instead of platform handles so they run
//! unchanged on web and native targets.

use crate::constants::*;
use glam::{Mat4, Vec3, Vec4};

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The fixed backdrop camera for a given viewport aspect ratio.
    pub fn backdrop(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_RADIANS,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Compute a world-space ray from screen-space pixel coordinates.
///
/// Returns `(ray_origin, ray_direction)` in world space.
#[inline]
pub fn screen_to_world_ray(
    camera: &Camera,
    width: f32,
    height: f32,
    sx: f32,
    sy: f32,
) -> (Vec3, Vec3) {
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    let inv = (camera.projection_matrix() * camera.view_matrix()).inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p1: Vec3 = p_far.truncate() / p_far.w;
    let rd = (p1 - camera.eye).normalize();
    (camera.eye, rd)
}

/// Intersect a ray with the plane `z = plane_z`. `None` when the ray runs
/// parallel to the plane or the hit lies behind the origin.
#[inline]
pub fn ray_plane_z(ray_origin: Vec3, ray_dir: Vec3, plane_z: f32) -> Option<Vec3> {
    if ray_dir.z.abs() <= 1e-6 {
        return None;
    }
    let t = (plane_z - ray_origin.z) / ray_dir.z;
    (t >= 0.0).then(|| ray_origin + ray_dir * t)
}

/// Project a viewport-pixel pointer position onto the field's z = 0 plane,
/// the coordinate space the particles live in.
#[inline]
pub fn pointer_to_field(camera: &Camera, width: f32, height: f32, sx: f32, sy: f32) -> Option<Vec3> {
    let (ro, rd) = screen_to_world_ray(camera, width, height, sx, sy);
    ray_plane_z(ro, rd, 0.0)
}
