use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use thiserror::Error;

/// Initial particle distribution.
///
/// Both variants ship: `Cube` samples uniformly inside an axis-aligned cube,
/// `SphereShell` samples a uniform direction with the radius scaled by a
/// uniform draw, which concentrates particles toward the origin.
#[derive(Clone, Copy, Debug)]
pub enum FieldPreset {
    Cube { half_extent: f32 },
    SphereShell { radius: f32 },
}

#[derive(Clone, Debug)]
pub struct FieldConfig {
    pub count: usize,
    pub preset: FieldPreset,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub color_mix_max: f32,
    /// Radians of (x, z) rotation applied per frame. Tied to achieved frame
    /// rate on purpose; there is no elapsed-time normalization.
    pub rotation_step: f32,
    pub falloff_radius: f32,
    pub repulsion_strength: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            preset: FieldPreset::SphereShell {
                radius: FIELD_RADIUS,
            },
            color_a: PARTICLE_COLOR_A,
            color_b: PARTICLE_COLOR_B,
            color_mix_max: COLOR_MIX_MAX,
            rotation_step: ROTATION_STEP,
            falloff_radius: REPULSION_FALLOFF,
            repulsion_strength: REPULSION_STRENGTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("particle count must be non-zero")]
    ZeroCount,
    #[error("falloff radius must be positive, got {0}")]
    NonPositiveFalloff(f32),
    #[error("preset extent must be positive, got {0}")]
    NonPositiveExtent(f32),
    #[error("expected {expected} seed positions, got {got}")]
    PositionCountMismatch { expected: usize, got: usize },
}

/// Fixed-size particle buffer: positions mutate every frame, colors are
/// assigned once at build and frozen.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    dirty: bool,
}

impl ParticleField {
    /// Phase one of the two-phase lifecycle: sample positions from the preset
    /// and freeze per-particle colors. `update` never revisits this output.
    pub fn build(config: FieldConfig, seed: u64) -> Result<Self, FieldError> {
        validate(&config)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = (0..config.count)
            .map(|_| sample_position(config.preset, &mut rng))
            .collect::<Vec<_>>();
        let colors = (0..config.count)
            .map(|_| {
                let mix = rng.gen::<f32>() * config.color_mix_max;
                lerp_rgb(config.color_a, config.color_b, mix)
            })
            .collect::<Vec<_>>();
        log::debug!("field built: {} particles", config.count);
        Ok(Self {
            config,
            positions,
            colors,
            dirty: true,
        })
    }

    /// Build over caller-supplied positions; used for deterministic layouts.
    /// Colors come from an even ramp over the anchor pair so they stay frozen
    /// and reproducible.
    pub fn from_positions(config: FieldConfig, positions: Vec<Vec3>) -> Result<Self, FieldError> {
        validate(&config)?;
        if positions.len() != config.count {
            return Err(FieldError::PositionCountMismatch {
                expected: config.count,
                got: positions.len(),
            });
        }
        let colors = (0..config.count)
            .map(|i| {
                let mix = config.color_mix_max * i as f32 / config.count.max(1) as f32;
                lerp_rgb(config.color_a, config.color_b, mix)
            })
            .collect::<Vec<_>>();
        Ok(Self {
            config,
            positions,
            colors,
            dirty: true,
        })
    }

    /// Advance one frame: constant (x, z) rotation plus pointer repulsion.
    /// `pointer` is the pointer position projected into field space; `None`
    /// means no sample yet, so the repulsion term is skipped entirely.
    pub fn update(&mut self, pointer: Option<Vec3>) {
        let (sin, cos) = self.config.rotation_step.sin_cos();
        for p in &mut self.positions {
            let (x, z) = (p.x, p.z);
            p.x = x * cos - z * sin;
            p.z = x * sin + z * cos;
        }
        if let Some(target) = pointer {
            let falloff = self.config.falloff_radius;
            let strength = self.config.repulsion_strength;
            for p in &mut self.positions {
                *p += repulsion_displacement(*p, target, falloff, strength);
            }
        }
        self.dirty = true;
    }

    pub fn count(&self) -> usize {
        self.config.count
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// True when the position buffer changed since the last call; the
    /// renderer clears the flag after re-uploading.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

fn validate(config: &FieldConfig) -> Result<(), FieldError> {
    if config.count == 0 {
        return Err(FieldError::ZeroCount);
    }
    if config.falloff_radius <= 0.0 {
        return Err(FieldError::NonPositiveFalloff(config.falloff_radius));
    }
    // A degenerate extent would make gen_range panic on an empty range.
    let extent = match config.preset {
        FieldPreset::Cube { half_extent } => half_extent,
        FieldPreset::SphereShell { radius } => radius,
    };
    if extent <= 0.0 {
        return Err(FieldError::NonPositiveExtent(extent));
    }
    Ok(())
}

fn sample_position(preset: FieldPreset, rng: &mut StdRng) -> Vec3 {
    match preset {
        FieldPreset::Cube { half_extent } => Vec3::new(
            rng.gen_range(-half_extent..half_extent),
            rng.gen_range(-half_extent..half_extent),
            rng.gen_range(-half_extent..half_extent),
        ),
        FieldPreset::SphereShell { radius } => {
            let r = rng.gen::<f32>() * radius;
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            )
        }
    }
}

/// Displacement pushing `particle` directly away from `pointer`, scaled by
/// `max(0, 1 - d/falloff) * strength`. Zero at or beyond the falloff radius.
/// Zero distance leaves the direction undefined, so the term is skipped
/// rather than dividing by zero.
#[inline]
pub fn repulsion_displacement(particle: Vec3, pointer: Vec3, falloff: f32, strength: f32) -> Vec3 {
    let away = particle - pointer;
    let dist = away.length();
    if dist >= falloff || dist <= f32::EPSILON {
        return Vec3::ZERO;
    }
    away * ((1.0 - dist / falloff) * strength / dist)
}

#[inline]
fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
