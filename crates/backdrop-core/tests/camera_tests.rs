// Host-side tests for the fixed camera and screen-to-field projection.

use backdrop_core::{
    pointer_to_field, ray_plane_z, screen_to_world_ray, Camera, CAMERA_Z,
};
use glam::Vec3;

#[test]
fn backdrop_camera_sits_on_positive_z_looking_at_origin() {
    let cam = Camera::backdrop(16.0 / 9.0);
    assert_eq!(cam.eye, Vec3::new(0.0, 0.0, CAMERA_Z));
    assert_eq!(cam.target, Vec3::ZERO);
    assert!(cam.fovy_radians > 0.0 && cam.fovy_radians < std::f32::consts::PI);
}

#[test]
fn ray_through_screen_center_points_down_negative_z() {
    let cam = Camera::backdrop(1.0);
    let (origin, dir) = screen_to_world_ray(&cam, 800.0, 800.0, 400.0, 400.0);
    assert_eq!(origin, cam.eye);
    assert!(dir.z < -0.999);
    assert!(dir.x.abs() < 1e-4 && dir.y.abs() < 1e-4);
}

#[test]
fn rays_toward_screen_edges_diverge_in_the_right_direction() {
    let cam = Camera::backdrop(1.0);
    let (_, right) = screen_to_world_ray(&cam, 800.0, 800.0, 800.0, 400.0);
    let (_, top) = screen_to_world_ray(&cam, 800.0, 800.0, 400.0, 0.0);
    assert!(right.x > 0.0);
    assert!(top.y > 0.0);
}

#[test]
fn ray_plane_intersection_hits_in_front_only() {
    let hit = ray_plane_z(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 0.0);
    assert_eq!(hit, Some(Vec3::ZERO));
    // Plane behind the origin of a forward ray: no hit.
    assert_eq!(ray_plane_z(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 10.0), None);
}

#[test]
fn parallel_ray_misses_the_plane() {
    assert_eq!(ray_plane_z(Vec3::new(0.0, 0.0, 5.0), Vec3::X, 0.0), None);
}

#[test]
fn screen_center_projects_onto_the_field_origin() {
    let cam = Camera::backdrop(1.5);
    let hit = pointer_to_field(&cam, 1200.0, 800.0, 600.0, 400.0);
    let p = hit.unwrap();
    assert!(p.length() < 1e-3);
}

#[test]
fn field_projection_preserves_screen_handedness() {
    let cam = Camera::backdrop(1.0);
    // Right of center lands at positive x; below center (screen y grows
    // downward) lands at negative y.
    let right = pointer_to_field(&cam, 800.0, 800.0, 700.0, 400.0).unwrap();
    let below = pointer_to_field(&cam, 800.0, 800.0, 400.0, 700.0).unwrap();
    assert!(right.x > 0.0);
    assert!(below.y < 0.0);
    assert!(right.z.abs() < 1e-4 && below.z.abs() < 1e-4);
}
