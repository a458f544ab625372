use glam::Vec3;

// Shared visual tuning constants used by both web and native frontends.

// Scene layout
pub const CAMERA_Z: f32 = 5.0; // fixed eye position on +Z
pub const CAMERA_FOV_RADIANS: f32 = 60.0 * std::f32::consts::PI / 180.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Fog falloff matched to the field's spatial extent
pub const FOG_NEAR: f32 = 5.0;
pub const FOG_FAR: f32 = 30.0;
pub const BACKGROUND_COLOR: [f32; 3] = [0.102, 0.102, 0.102]; // #1a1a1a

// Particle field
pub const PARTICLE_COUNT: usize = 3000;
pub const FIELD_RADIUS: f32 = 20.0; // sphere-shell preset extent
pub const PARTICLE_SIZE: f32 = 0.06; // billboard edge, world units
pub const PARTICLE_OPACITY: f32 = 0.8;
pub const ROTATION_STEP: f32 = 0.0008; // radians per frame, not per second
pub const REPULSION_FALLOFF: f32 = 2.0; // pointer influence radius, world units
pub const REPULSION_STRENGTH: f32 = 0.02;
pub const COLOR_MIX_MAX: f32 = 0.5; // per-particle blend cap toward color_b

// Anchor colors: white blended toward violet
pub const PARTICLE_COLOR_A: [f32; 3] = [1.0, 1.0, 1.0];
pub const PARTICLE_COLOR_B: [f32; 3] = [0.439, 0.0, 1.0]; // #7000FF

// Nebula: a rotating color-wash plane behind the field
pub const NEBULA_SIZE: f32 = 30.0; // square edge, world units
pub const NEBULA_Z: f32 = -5.0;
pub const NEBULA_COLOR: [f32; 3] = [0.439, 0.0, 1.0]; // #7000FF
pub const NEBULA_OPACITY: f32 = 0.1;
pub const NEBULA_ROTATION_RATE: f32 = 0.05; // radians per second of elapsed time

// Bloom post-effect (fixed at construction, not runtime-tunable)
pub const BLOOM_INTENSITY: f32 = 0.5;
pub const BLOOM_THRESHOLD: f32 = 0.1;
pub const BLOOM_SMOOTHING: f32 = 0.9;

// Cursor glyph
pub const CURSOR_SPEED_GAIN: f32 = 0.01; // px of speed -> scale
pub const CURSOR_MAX_SCALE: f32 = 1.5;
pub const CURSOR_HOVER_SCALE: f32 = 1.5; // overrides speed scale over interactives
pub const CURSOR_REVEAL_DELAY_MS: i32 = 100;
pub const CURSOR_OFFSCREEN_PX: f32 = -100.0; // glyph park position before the first sample

// Trail segments; everything below is derived from the segment index and
// frozen for the segment's lifetime
pub const TRAIL_COUNT: usize = 5;
pub const TRAIL_DELAY_STEP_MS: i32 = 40;
pub const TRAIL_BASE_SCALE: f32 = 0.5;
pub const TRAIL_SCALE_STEP: f32 = 0.1;
pub const TRAIL_BASE_OPACITY: f32 = 0.5;
pub const TRAIL_OPACITY_STEP: f32 = 0.1;
pub const TRAIL_BASE_SIZE_PX: f32 = 6.0; // segment i is (6 - i) px wide

#[inline]
pub fn background_vec3() -> Vec3 {
    Vec3::from(BACKGROUND_COLOR)
}

/// Nebula plane rotation as a function of total elapsed time, so the angle is
/// independent of frame rate (unlike the field's per-frame rotation).
#[inline]
pub fn nebula_angle(elapsed_secs: f32) -> f32 {
    elapsed_secs * NEBULA_ROTATION_RATE
}
