// Host-side tests for the particle field: buffer invariants, the per-frame
// rotation/repulsion update, and the frozen-color guarantee.

use backdrop_core::{
    repulsion_displacement, FieldConfig, FieldError, FieldPreset, ParticleField,
};
use glam::Vec3;

fn small_config(count: usize) -> FieldConfig {
    FieldConfig {
        count,
        preset: FieldPreset::SphereShell { radius: 10.0 },
        ..FieldConfig::default()
    }
}

#[test]
fn build_produces_matched_buffer_lengths() {
    let field = ParticleField::build(small_config(128), 7).unwrap();
    assert_eq!(field.count(), 128);
    assert_eq!(field.positions().len(), 128);
    assert_eq!(field.colors().len(), 128);
}

#[test]
fn build_rejects_zero_count() {
    let cfg = small_config(0);
    assert!(matches!(
        ParticleField::build(cfg, 0),
        Err(FieldError::ZeroCount)
    ));
}

#[test]
fn build_rejects_non_positive_falloff() {
    let cfg = FieldConfig {
        falloff_radius: 0.0,
        ..small_config(10)
    };
    assert!(matches!(
        ParticleField::build(cfg, 0),
        Err(FieldError::NonPositiveFalloff(_))
    ));
}

#[test]
fn build_rejects_degenerate_preset_extents() {
    // A zero or negative extent would otherwise feed gen_range an empty range.
    let cube = FieldConfig {
        preset: FieldPreset::Cube { half_extent: 0.0 },
        ..small_config(10)
    };
    assert!(matches!(
        ParticleField::build(cube, 0),
        Err(FieldError::NonPositiveExtent(_))
    ));
    let shell = FieldConfig {
        preset: FieldPreset::SphereShell { radius: -1.0 },
        ..small_config(10)
    };
    assert!(matches!(
        ParticleField::build(shell, 0),
        Err(FieldError::NonPositiveExtent(_))
    ));
}

#[test]
fn build_is_deterministic_for_a_seed() {
    let a = ParticleField::build(small_config(64), 99).unwrap();
    let b = ParticleField::build(small_config(64), 99).unwrap();
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
}

#[test]
fn colors_stay_within_the_anchor_mix_range() {
    let field = ParticleField::build(small_config(500), 3).unwrap();
    let cfg = field.config();
    for c in field.colors() {
        for ch in 0..3 {
            let lo = cfg.color_a[ch].min(cfg.color_b[ch]);
            let hi = cfg.color_a[ch].max(cfg.color_b[ch]);
            assert!(c[ch] >= lo - 1e-6 && c[ch] <= hi + 1e-6);
        }
    }
}

#[test]
fn update_preserves_buffer_lengths_and_freezes_colors() {
    let mut field = ParticleField::build(small_config(200), 11).unwrap();
    let colors_before = field.colors().to_vec();
    for i in 0..50 {
        let pointer = (i % 3 != 0).then(|| Vec3::new(0.5, 0.0, 0.0));
        field.update(pointer);
    }
    assert_eq!(field.positions().len(), 200);
    assert_eq!(field.colors(), colors_before.as_slice());
}

#[test]
fn update_without_pointer_is_a_pure_rotation() {
    let cfg = FieldConfig {
        count: 1,
        ..small_config(1)
    };
    let mut field = ParticleField::from_positions(cfg, vec![Vec3::new(3.0, 1.5, 0.0)]).unwrap();
    let before = field.positions()[0];
    field.update(None);
    let after = field.positions()[0];
    // Length in the rotation plane is preserved, y untouched.
    let r_before = (before.x * before.x + before.z * before.z).sqrt();
    let r_after = (after.x * after.x + after.z * after.z).sqrt();
    assert!((r_before - r_after).abs() < 1e-5);
    assert_eq!(before.y, after.y);
    assert_ne!(before, after);
}

#[test]
fn take_dirty_clears_until_next_update() {
    let mut field = ParticleField::build(small_config(8), 1).unwrap();
    assert!(field.take_dirty());
    assert!(!field.take_dirty());
    field.update(None);
    assert!(field.take_dirty());
    assert!(!field.take_dirty());
}

#[test]
fn repulsion_is_zero_at_and_beyond_falloff() {
    let pointer = Vec3::ZERO;
    let at = repulsion_displacement(Vec3::new(2.0, 0.0, 0.0), pointer, 2.0, 1.0);
    let beyond = repulsion_displacement(Vec3::new(5.0, 0.0, 0.0), pointer, 2.0, 1.0);
    assert_eq!(at, Vec3::ZERO);
    assert_eq!(beyond, Vec3::ZERO);
}

#[test]
fn repulsion_magnitude_grows_toward_the_pointer() {
    let pointer = Vec3::ZERO;
    let near = repulsion_displacement(Vec3::new(0.5, 0.0, 0.0), pointer, 2.0, 1.0);
    let far = repulsion_displacement(Vec3::new(1.5, 0.0, 0.0), pointer, 2.0, 1.0);
    assert!(near.length() > far.length());
    // Both push directly away from the pointer.
    assert!(near.x > 0.0 && far.x > 0.0);
}

#[test]
fn repulsion_at_zero_distance_is_finite_zero() {
    let p = Vec3::new(1.0, 2.0, 3.0);
    let d = repulsion_displacement(p, p, 2.0, 1.0);
    assert_eq!(d, Vec3::ZERO);
    assert!(d.is_finite());
}

#[test]
fn four_particle_ring_is_pushed_outward_symmetrically() {
    // Unit-ring layout around a pointer at the origin with rotation disabled:
    // every particle moves radially outward by strength * (1 - d/falloff).
    let cfg = FieldConfig {
        count: 4,
        rotation_step: 0.0,
        falloff_radius: 2.0,
        repulsion_strength: 1.0,
        ..FieldConfig::default()
    };
    let ring = vec![
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    let mut field = ParticleField::from_positions(cfg, ring.clone()).unwrap();
    field.update(Some(Vec3::ZERO));

    let expected_push = (1.0 - 1.0 / 2.0) * 1.0; // 0.5 world units
    for (before, after) in ring.iter().zip(field.positions()) {
        let moved = *after - *before;
        assert!((moved.length() - expected_push).abs() < 1e-5);
        // Outward along the particle's own radial direction.
        assert!(moved.normalize().dot(before.normalize()) > 0.999);
        // Distance from the pointer strictly increased.
        assert!(after.length() > before.length());
    }
}

#[test]
fn from_positions_rejects_length_mismatch() {
    let cfg = small_config(3);
    let err = ParticleField::from_positions(cfg, vec![Vec3::ZERO]).unwrap_err();
    assert!(matches!(
        err,
        FieldError::PositionCountMismatch {
            expected: 3,
            got: 1
        }
    ));
}

#[test]
fn cube_preset_stays_inside_the_half_extent() {
    let cfg = FieldConfig {
        count: 300,
        preset: FieldPreset::Cube { half_extent: 4.0 },
        ..FieldConfig::default()
    };
    let field = ParticleField::build(cfg, 5).unwrap();
    for p in field.positions() {
        assert!(p.x.abs() <= 4.0 && p.y.abs() <= 4.0 && p.z.abs() <= 4.0);
    }
}

#[test]
fn sphere_preset_stays_inside_the_radius() {
    let cfg = FieldConfig {
        count: 300,
        preset: FieldPreset::SphereShell { radius: 6.0 },
        ..FieldConfig::default()
    };
    let field = ParticleField::build(cfg, 5).unwrap();
    for p in field.positions() {
        assert!(p.length() <= 6.0 + 1e-4);
    }
}
