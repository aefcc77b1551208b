use crate::real::Real;
use crate::vec2::Vec2;
use crate::viewport::Axis;

/// The auxiliary parameter point of the Julia family.
///
/// Pointer motion steers the seed at `change_rate` plane units per pixel
/// unless it is frozen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuliaSeed {
    pub value: Vec2<f64>,
    pub change_rate: f64,
    pub frozen: bool,
}

impl JuliaSeed {
    /// A visually interesting default: `c = -0.7 + 0.27015i`.
    pub const DEFAULT_VALUE: Vec2<f64> = Vec2 {
        x: -0.7,
        y: 0.27015,
    };

    pub fn new(change_rate: f64) -> Self {
        Self {
            value: Self::DEFAULT_VALUE,
            change_rate,
            frozen: false,
        }
    }

    /// Follow a pointer movement of `delta` pixels (y down). Returns whether the seed moved.
    pub fn nudge(&mut self, delta: Vec2<f32>) -> bool {
        if self.frozen || (delta.x == 0.0 && delta.y == 0.0) {
            return false;
        }
        self.value += Vec2::new(delta.x as f64, -(delta.y as f64)) * self.change_rate;
        true
    }

    /// Multiply the change rate. Non-positive or non-finite factors are ignored.
    pub fn scale_rate(&mut self, factor: f64) {
        if factor > 0.0 && factor.is_finite() {
            self.change_rate *= factor;
        }
    }

    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
    }

    /// Set one component from typed text.
    pub fn set_component(&mut self, axis: Axis, text: &str) -> crate::Result<()> {
        let v = f64::parse_input(text)?;
        match axis {
            Axis::X => self.value.x = v,
            Axis::Y => self.value.y = v,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_follows_pointer_with_y_inverted() {
        let mut s = JuliaSeed::new(0.01);
        s.value = Vec2::ZERO;
        assert!(s.nudge(Vec2::new(10.0, 10.0)));
        assert!(s.value.max_abs_diff(Vec2::new(0.1, -0.1)) < 1e-12);
    }

    #[test]
    fn frozen_seed_ignores_motion() {
        let mut s = JuliaSeed::new(0.01);
        s.toggle_freeze();
        assert!(!s.nudge(Vec2::new(10.0, 10.0)));
        assert_eq!(s.value, JuliaSeed::DEFAULT_VALUE);
    }

    #[test]
    fn rate_scaling() {
        let mut s = JuliaSeed::new(1e-4);
        s.scale_rate(0.5);
        assert!((s.change_rate - 5e-5).abs() < 1e-18);
        s.scale_rate(-2.0);
        s.scale_rate(0.0);
        assert!((s.change_rate - 5e-5).abs() < 1e-18);
    }

    #[test]
    fn typed_component() {
        let mut s = JuliaSeed::new(1e-4);
        s.set_component(Axis::Y, "0.5").unwrap();
        assert_eq!(s.value.y, 0.5);
        assert!(s.set_component(Axis::X, "nope").is_err());
        assert_eq!(s.value.x, -0.7);
    }
}
