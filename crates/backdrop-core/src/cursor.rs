use crate::constants::*;
use glam::Vec2;
use smallvec::SmallVec;

/// One-way visibility state: the cursor reveals once after a short startup
/// delay and never hides again while mounted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorPhase {
    Hidden,
    Visible,
}

impl CursorPhase {
    pub fn reveal(&mut self) {
        *self = CursorPhase::Visible;
    }

    pub fn is_visible(self) -> bool {
        self == CursorPhase::Visible
    }
}

/// Outer-ring scale for a given pointer speed. Hovering an interactive
/// element overrides the speed term with a fixed scale.
#[inline]
pub fn outer_scale(speed: f32, over_interactive: bool) -> f32 {
    if over_interactive {
        return CURSOR_HOVER_SCALE;
    }
    (1.0 + speed * CURSOR_SPEED_GAIN).min(CURSOR_MAX_SCALE)
}

// Per-segment derivations. All of these are functions of the segment index
// only and constant for the segment's identity.

#[inline]
pub fn segment_scale(index: usize) -> f32 {
    TRAIL_BASE_SCALE - index as f32 * TRAIL_SCALE_STEP
}

#[inline]
pub fn segment_opacity(index: usize) -> f32 {
    TRAIL_BASE_OPACITY - index as f32 * TRAIL_OPACITY_STEP
}

#[inline]
pub fn segment_delay_ms(index: usize) -> i32 {
    index as i32 * TRAIL_DELAY_STEP_MS
}

#[inline]
pub fn segment_size_px(index: usize) -> f32 {
    TRAIL_BASE_SIZE_PX - index as f32
}

/// Where every glyph element sits until the first pointer sample arrives:
/// parked offscreen so the reveal never flashes them at an undefined spot.
#[inline]
pub fn initial_glyph_position() -> Vec2 {
    Vec2::splat(CURSOR_OFFSCREEN_PX)
}

/// The CSS transform for a glyph element at `pos` (viewport pixels), centered
/// on the point, optionally scaled.
pub fn glyph_transform(pos: Vec2, scale: Option<f32>) -> String {
    match scale {
        Some(s) => format!(
            "translate({}px, {}px) translate(-50%, -50%) scale({})",
            pos.x, pos.y, s
        ),
        None => format!("translate({}px, {}px) translate(-50%, -50%)", pos.x, pos.y),
    }
}

/// A scheduled trail write: segment `segment` moves to `position` after
/// `delay_ms`, reproducing where the pointer was that long ago.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailUpdate {
    pub segment: usize,
    pub delay_ms: i32,
    pub position: Vec2,
}

/// The trail schedule for one pointer-move event: one one-shot update per
/// segment, each carrying the position captured now, not at fire time.
/// Segment i always lags segment i-1 by exactly one delay step.
pub fn plan_updates(position: Vec2) -> SmallVec<[TrailUpdate; TRAIL_COUNT]> {
    (0..TRAIL_COUNT)
        .map(|segment| TrailUpdate {
            segment,
            delay_ms: segment_delay_ms(segment),
            position,
        })
        .collect()
}
