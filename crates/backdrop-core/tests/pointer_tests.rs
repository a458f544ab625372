// Host-side tests for pointer sampling and hover classification.

use backdrop_core::{hoverable_tag, PointerState, HOVERABLE_CLASS};
use glam::Vec2;

#[test]
fn first_sample_sets_position_with_zero_velocity() {
    let mut state = PointerState::default();
    assert!(state.position().is_none());
    state.observe(100.0, 200.0);
    assert_eq!(state.position(), Some(Vec2::new(100.0, 200.0)));
    assert_eq!(state.velocity(), Vec2::ZERO);
    assert_eq!(state.speed(), 0.0);
}

#[test]
fn velocity_is_the_raw_displacement_between_samples() {
    let mut state = PointerState::default();
    state.observe(10.0, 10.0);
    state.observe(13.0, 6.0);
    assert_eq!(state.velocity(), Vec2::new(3.0, -4.0));
    assert_eq!(state.speed(), 5.0);
}

#[test]
fn velocity_tracks_only_the_latest_pair() {
    let mut state = PointerState::default();
    state.observe(0.0, 0.0);
    state.observe(50.0, 0.0);
    state.observe(51.0, 0.0);
    assert_eq!(state.velocity(), Vec2::new(1.0, 0.0));
}

#[test]
fn stationary_repeat_sample_yields_zero_velocity() {
    let mut state = PointerState::default();
    state.observe(7.0, 7.0);
    state.observe(7.0, 7.0);
    assert_eq!(state.velocity(), Vec2::ZERO);
}

#[test]
fn out_of_viewport_coordinates_pass_through_unclamped() {
    let mut state = PointerState::default();
    state.observe(-40.0, -10.0);
    assert_eq!(state.position(), Some(Vec2::new(-40.0, -10.0)));
    state.observe(10000.0, 9999.0);
    assert_eq!(state.position(), Some(Vec2::new(10000.0, 9999.0)));
}

#[test]
fn hover_reclassification_reports_changes_only() {
    let mut state = PointerState::default();
    assert!(!state.over_interactive());
    assert!(state.set_over_interactive(true));
    assert!(state.over_interactive());
    assert!(!state.set_over_interactive(true));
    assert!(state.set_over_interactive(false));
    assert!(!state.set_over_interactive(false));
}

#[test]
fn interactive_tags_match_case_insensitively() {
    assert!(hoverable_tag("a"));
    assert!(hoverable_tag("A"));
    assert!(hoverable_tag("button"));
    assert!(hoverable_tag("BUTTON"));
    assert!(!hoverable_tag("div"));
    assert!(!hoverable_tag("span"));
    assert!(!hoverable_tag("abbr"));
}

#[test]
fn marker_class_is_stable() {
    // The class name is public API for page authors; it must not drift.
    assert_eq!(HOVERABLE_CLASS, "hoverable");
}
