use glam::Vec2;

/// Last observed pointer sample plus derived velocity, shared by the particle
/// field and the cursor system.
///
/// Velocity is the raw displacement between consecutive sampled positions.
/// There is deliberately no division by elapsed time, so its magnitude
/// depends on the event rate; the cursor scale inherits that behavior.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerState {
    position: Option<Vec2>,
    velocity: Vec2,
    over_interactive: bool,
}

impl PointerState {
    /// Record a raw pointer-move sample in viewport pixels. Out-of-viewport
    /// coordinates pass through unclamped. The first sample leaves velocity
    /// at zero.
    pub fn observe(&mut self, x: f32, y: f32) {
        let next = Vec2::new(x, y);
        self.velocity = match self.position {
            Some(prev) => next - prev,
            None => Vec2::ZERO,
        };
        self.position = Some(next);
    }

    /// `None` until the first pointer event arrives; consumers render their
    /// idle state rather than computing against an undefined position.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn over_interactive(&self) -> bool {
        self.over_interactive
    }

    /// Reclassify hover state. Returns true when the classification actually
    /// changed so callers can skip redundant re-renders.
    pub fn set_over_interactive(&mut self, flag: bool) -> bool {
        let changed = self.over_interactive != flag;
        self.over_interactive = flag;
        changed
    }
}

/// Marker class that opts arbitrary elements into hover treatment.
pub const HOVERABLE_CLASS: &str = "hoverable";

const HOVERABLE_TAGS: [&str; 2] = ["a", "button"];

/// Whether a tag name counts as interactive for cursor-scale purposes.
/// Tag names from the DOM arrive uppercased; compare case-insensitively.
#[inline]
pub fn hoverable_tag(tag: &str) -> bool {
    HOVERABLE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}
