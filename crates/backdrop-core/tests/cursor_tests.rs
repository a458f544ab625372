// Host-side tests for cursor scale math, trail derivations, and the one-way
// reveal phase.

use backdrop_core::{
    glyph_transform, initial_glyph_position, outer_scale, plan_updates, segment_delay_ms,
    segment_opacity, segment_scale, segment_size_px, CursorPhase, CURSOR_HOVER_SCALE,
    CURSOR_MAX_SCALE, TRAIL_COUNT, TRAIL_DELAY_STEP_MS,
};
use glam::Vec2;

#[test]
fn outer_scale_grows_linearly_with_speed() {
    assert_eq!(outer_scale(0.0, false), 1.0);
    let s = outer_scale(20.0, false);
    assert!((s - 1.2).abs() < 1e-6);
}

#[test]
fn outer_scale_clamps_at_the_maximum() {
    assert_eq!(outer_scale(80.0, false), CURSOR_MAX_SCALE);
    assert_eq!(outer_scale(100000.0, false), CURSOR_MAX_SCALE);
}

#[test]
fn hover_overrides_the_speed_term() {
    assert_eq!(outer_scale(0.0, true), CURSOR_HOVER_SCALE);
    assert_eq!(outer_scale(100000.0, true), CURSOR_HOVER_SCALE);
}

#[test]
fn segment_derivations_step_down_with_index() {
    for i in 0..TRAIL_COUNT {
        let f = i as f32;
        assert!((segment_scale(i) - (0.5 - f * 0.1)).abs() < 1e-6);
        assert!((segment_opacity(i) - (0.5 - f * 0.1)).abs() < 1e-6);
        assert!((segment_size_px(i) - (6.0 - f)).abs() < 1e-6);
        assert_eq!(segment_delay_ms(i), i as i32 * TRAIL_DELAY_STEP_MS);
    }
    // The last segment is still visible and non-degenerate.
    assert!(segment_opacity(TRAIL_COUNT - 1) > 0.0);
    assert!(segment_scale(TRAIL_COUNT - 1) > 0.0);
}

#[test]
fn plan_updates_freezes_the_position_per_event() {
    let pos = Vec2::new(320.0, 240.0);
    let updates = plan_updates(pos);
    assert_eq!(updates.len(), TRAIL_COUNT);
    for (i, upd) in updates.iter().enumerate() {
        assert_eq!(upd.segment, i);
        assert_eq!(upd.delay_ms, i as i32 * TRAIL_DELAY_STEP_MS);
        // Every segment carries the position captured at the event.
        assert_eq!(upd.position, pos);
    }
}

#[test]
fn consecutive_segments_differ_by_one_delay_step() {
    let updates = plan_updates(Vec2::ZERO);
    for pair in updates.windows(2) {
        assert_eq!(pair[1].delay_ms - pair[0].delay_ms, TRAIL_DELAY_STEP_MS);
    }
}

#[test]
fn glyphs_park_offscreen_before_the_first_sample() {
    // The reveal timer can fire before any pointer event; glyphs created at
    // the parked position must not appear inside the viewport.
    let park = initial_glyph_position();
    assert!(park.x < 0.0 && park.y < 0.0);
    let t = glyph_transform(park, None);
    assert!(t.starts_with("translate(-100px, -100px)"));
}

#[test]
fn glyph_transform_centers_and_applies_scale() {
    let t = glyph_transform(Vec2::new(320.0, 240.0), Some(1.5));
    assert_eq!(t, "translate(320px, 240px) translate(-50%, -50%) scale(1.5)");
    let t = glyph_transform(Vec2::new(320.0, 240.0), None);
    assert_eq!(t, "translate(320px, 240px) translate(-50%, -50%)");
}

#[test]
fn reveal_is_one_way() {
    let mut phase = CursorPhase::Hidden;
    assert!(!phase.is_visible());
    phase.reveal();
    assert!(phase.is_visible());
    phase.reveal();
    assert!(phase.is_visible());
}
