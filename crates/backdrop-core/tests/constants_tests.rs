// Sanity checks on the shared tuning constants and their relationships.

use backdrop_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn scene_constants_are_within_reasonable_bounds() {
    assert!(CAMERA_Z > 0.0);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(CAMERA_FOV_RADIANS > 0.0 && CAMERA_FOV_RADIANS < std::f32::consts::PI);
    assert!(FOG_NEAR < FOG_FAR);
    // The whole field should fall inside the fog range and the far plane.
    assert!(FIELD_RADIUS + CAMERA_Z <= FOG_FAR);
    assert!(FOG_FAR <= CAMERA_ZFAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn field_constants_are_positive_and_bounded() {
    assert!(PARTICLE_COUNT > 0);
    assert!(FIELD_RADIUS > 0.0);
    assert!(PARTICLE_SIZE > 0.0);
    assert!(PARTICLE_OPACITY > 0.0 && PARTICLE_OPACITY <= 1.0);
    assert!(REPULSION_FALLOFF > 0.0);
    assert!(REPULSION_STRENGTH > 0.0);
    assert!(COLOR_MIX_MAX >= 0.0 && COLOR_MIX_MAX <= 1.0);
    for ch in 0..3 {
        assert!(BACKGROUND_COLOR[ch] >= 0.0 && BACKGROUND_COLOR[ch] <= 1.0);
        assert!(PARTICLE_COLOR_A[ch] >= 0.0 && PARTICLE_COLOR_A[ch] <= 1.0);
        assert!(PARTICLE_COLOR_B[ch] >= 0.0 && PARTICLE_COLOR_B[ch] <= 1.0);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn bloom_constants_are_valid() {
    assert!(BLOOM_INTENSITY > 0.0);
    assert!(BLOOM_THRESHOLD >= 0.0);
    assert!(BLOOM_SMOOTHING > 0.0 && BLOOM_SMOOTHING <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn cursor_and_trail_constants_are_consistent() {
    assert!(CURSOR_SPEED_GAIN > 0.0);
    assert!(CURSOR_MAX_SCALE >= 1.0);
    assert!(CURSOR_HOVER_SCALE >= 1.0);
    assert!(CURSOR_REVEAL_DELAY_MS > 0);
    assert!(TRAIL_COUNT > 0);
    assert!(TRAIL_DELAY_STEP_MS > 0);
    // Every segment must stay visible and sized.
    let last = (TRAIL_COUNT - 1) as f32;
    assert!(TRAIL_BASE_OPACITY - last * TRAIL_OPACITY_STEP > 0.0);
    assert!(TRAIL_BASE_SCALE - last * TRAIL_SCALE_STEP > 0.0);
    assert!(TRAIL_BASE_SIZE_PX - last > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn nebula_constants_are_valid() {
    assert!(NEBULA_SIZE > 0.0);
    assert!(NEBULA_OPACITY > 0.0 && NEBULA_OPACITY <= 1.0);
    assert!(NEBULA_ROTATION_RATE > 0.0);
    // The plane sits behind the field origin, inside the fog range.
    assert!(NEBULA_Z < 0.0);
    assert!(CAMERA_Z - NEBULA_Z <= FOG_FAR);
    for ch in 0..3 {
        assert!(NEBULA_COLOR[ch] >= 0.0 && NEBULA_COLOR[ch] <= 1.0);
    }
}

#[test]
fn nebula_angle_is_linear_in_elapsed_time() {
    assert_eq!(nebula_angle(0.0), 0.0);
    assert!((nebula_angle(2.0) - 2.0 * NEBULA_ROTATION_RATE).abs() < 1e-6);
    assert!((nebula_angle(10.0) - 0.5).abs() < 1e-6);
}

#[test]
fn background_helper_matches_the_array() {
    assert_eq!(background_vec3().to_array(), BACKGROUND_COLOR);
}
