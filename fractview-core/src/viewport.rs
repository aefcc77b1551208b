use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::mapper::Bounds;
use crate::precision::Precision;
use crate::real::Real;
use crate::vec2::Vec2;

/// One axis of the fractal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Per-axis freeze flags. A frozen axis ignores center deltas coming from gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLock {
    pub x: bool,
    pub y: bool,
}

impl AxisLock {
    pub fn toggle(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = !self.x,
            Axis::Y => self.y = !self.y,
        }
    }

    pub fn is_locked(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Zero the components of `delta` that belong to frozen axes.
    pub fn filter<T: Real>(&self, delta: Vec2<T>) -> Vec2<T> {
        Vec2::new(
            if self.x { T::ZERO } else { delta.x },
            if self.y { T::ZERO } else { delta.y },
        )
    }
}

/// Camera parameters for one precision: the rendered values and the values
/// they are animating toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera<T> {
    pub center: Vec2<T>,
    pub target_center: Vec2<T>,
    pub side: T,
    pub target_side: T,
}

impl<T: Real> Camera<T> {
    pub fn new(center: Vec2<T>, side: T) -> Self {
        Self {
            center,
            target_center: center,
            side,
            target_side: side,
        }
    }

    /// Bounds of what is currently on screen.
    pub fn bounds(&self, aspect: T) -> Bounds<T> {
        Bounds::around(self.center, self.side, aspect)
    }

    /// Bounds the camera is heading to.
    pub fn target_bounds(&self, aspect: T) -> Bounds<T> {
        Bounds::around(self.target_center, self.target_side, aspect)
    }

    /// Set current and target together, skipping the animation.
    pub fn jump_to(&mut self, center: Vec2<T>, side: T) {
        self.center = center;
        self.target_center = center;
        self.side = side;
        self.target_side = side;
    }

    /// Smallest side length the type can still resolve around the target center.
    ///
    /// Below this, neighbouring pixels map to the same plane coordinate and
    /// repeated division drifts into subnormals that multiplication cannot
    /// recover from.
    pub fn min_side(&self) -> T {
        let scale = self
            .target_center
            .x
            .abs()
            .max(self.target_center.y.abs())
            .max(T::ONE);
        T::EPSILON * scale
    }

    /// Whether `side` is usable as a side length for this camera.
    pub fn accepts_side(&self, side: T) -> bool {
        side.is_finite() && side >= self.min_side()
    }

    /// Move current values a fraction `alpha` (clamped to `[0, 1]`) of the way to the targets.
    pub fn approach(&mut self, alpha: T) {
        if alpha >= T::ONE {
            self.center = self.target_center;
            self.side = self.target_side;
            return;
        }
        let alpha = alpha.max(T::ZERO);
        self.center += (self.target_center - self.center) * alpha;
        self.side = self.side + (self.target_side - self.side) * alpha;
    }

    /// Same camera in another precision, converted by value.
    pub fn converted<U: Real>(&self) -> Camera<U> {
        Camera {
            center: self.center.cast(),
            target_center: self.target_center.cast(),
            side: U::from_f64(self.side.to_f64()),
            target_side: U::from_f64(self.target_side.to_f64()),
        }
    }

    /// Distance between current and target, as the largest of the center
    /// components and the side length.
    pub fn remaining(&self) -> T {
        self.center
            .max_abs_diff(self.target_center)
            .max((self.target_side - self.side).abs())
    }
}

/// An operation on whichever camera is active, written once for both precisions.
pub trait CameraVisitor {
    type Output;

    fn visit<T: Real>(self, camera: &mut Camera<T>, lock: AxisLock) -> Self::Output;
}

/// Read-only snapshot for readout labels, taken from the active precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub precision: Precision,
    pub center: [f64; 2],
    pub center_text: [String; 2],
    pub side: f64,
    pub side_text: String,
    /// Degrees.
    pub rotation: f32,
    pub axis_lock: AxisLock,
}

/// Camera state in both precisions plus rotation.
///
/// Only the camera matching `precision` is animated and rendered. The other
/// one is refreshed from the active camera whenever the precision changes,
/// so switching never makes the view jump.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    low: Camera<f32>,
    high: Camera<f64>,
    /// Degrees.
    rotation: f32,
    target_rotation: f32,
    precision: Precision,
    axis_lock: AxisLock,
    smoothing_rate: f32,
    initial_side: f64,
}

impl ViewportState {
    pub fn new(config: &ViewConfig) -> Self {
        let side = if config.initial_side > 0.0 && config.initial_side.is_finite() {
            config.initial_side
        } else {
            ViewConfig::default().initial_side
        };
        Self {
            low: Camera::new(Vec2::ZERO, side as f32),
            high: Camera::new(Vec2::ZERO, side),
            rotation: 0.0,
            target_rotation: 0.0,
            precision: Precision::default(),
            axis_lock: AxisLock::default(),
            smoothing_rate: config.smoothing_rate as f32,
            initial_side: side,
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn low(&self) -> &Camera<f32> {
        &self.low
    }

    pub fn high(&self) -> &Camera<f64> {
        &self.high
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn target_rotation(&self) -> f32 {
        self.target_rotation
    }

    pub fn axis_lock(&self) -> AxisLock {
        self.axis_lock
    }

    pub fn toggle_axis_lock(&mut self, axis: Axis) {
        self.axis_lock.toggle(axis);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.target_rotation += degrees;
        }
    }

    pub fn set_target_rotation(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.target_rotation = degrees;
        }
    }

    /// Run `visitor` against the active camera.
    pub fn with_active<V: CameraVisitor>(&mut self, visitor: V) -> V::Output {
        let lock = self.axis_lock;
        match self.precision {
            Precision::Low => visitor.visit(&mut self.low, lock),
            Precision::High => visitor.visit(&mut self.high, lock),
        }
    }

    /// Switch precision, carrying the active camera over by value.
    pub fn set_precision(&mut self, precision: Precision) {
        if precision == self.precision {
            return;
        }
        match precision {
            Precision::High => self.high = self.low.converted(),
            Precision::Low => self.low = self.high.converted(),
        }
        self.precision = precision;
    }

    /// Advance the animation by `dt` seconds.
    ///
    /// Non-positive or non-finite `dt` (paused clock) leaves the state untouched.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let alpha = (self.smoothing_rate * dt).clamp(0.0, 1.0);
        match self.precision {
            Precision::Low => self.low.approach(alpha),
            Precision::High => self.high.approach(alpha as f64),
        }
        if alpha >= 1.0 {
            self.rotation = self.target_rotation;
        } else {
            self.rotation += (self.target_rotation - self.rotation) * alpha;
        }
    }

    /// Restore the startup camera: origin, initial side, no rotation.
    pub fn reset(&mut self) {
        self.low = Camera::new(Vec2::ZERO, self.initial_side as f32);
        self.high = Camera::new(Vec2::ZERO, self.initial_side);
        self.rotation = 0.0;
        self.target_rotation = 0.0;
    }

    /// Current (rendered) center and side of the active precision, widened to `f64`.
    pub fn current_f64(&self) -> (Vec2<f64>, f64) {
        match self.precision {
            Precision::Low => (self.low.center.cast(), self.low.side as f64),
            Precision::High => (self.high.center, self.high.side),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let (center, side, center_text, side_text) = match self.precision {
            Precision::Low => describe(&self.low),
            Precision::High => describe(&self.high),
        };
        ViewSnapshot {
            precision: self.precision,
            center,
            center_text,
            side,
            side_text,
            rotation: self.rotation,
            axis_lock: self.axis_lock,
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

fn describe<T: Real>(camera: &Camera<T>) -> ([f64; 2], f64, [String; 2], String) {
    (
        camera.center.to_array_f64(),
        camera.side.to_f64(),
        [camera.center.x.display(), camera.center.y.display()],
        camera.side.display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_target(state: &mut ViewportState, center: Vec2<f64>, side: f64) {
        struct SetTarget(Vec2<f64>, f64);
        impl CameraVisitor for SetTarget {
            type Output = ();
            fn visit<T: Real>(self, camera: &mut Camera<T>, _lock: AxisLock) {
                camera.target_center = self.0.cast();
                camera.target_side = T::from_f64(self.1);
            }
        }
        state.with_active(SetTarget(center, side));
    }

    #[test]
    fn starts_at_origin_with_default_side() {
        let s = ViewportState::default();
        assert_eq!(s.precision(), Precision::Low);
        assert_eq!(s.low().center, Vec2::ZERO);
        assert!((s.low().side - 3.4).abs() < 1e-6);
        assert!((s.high().side - 3.4).abs() < 1e-12);
    }

    #[test]
    fn tick_converges_monotonically() {
        for precision in Precision::ALL {
            let mut s = ViewportState::default();
            s.set_precision(precision);
            with_target(&mut s, Vec2::new(-0.75, 0.1), 0.5);
            s.rotate_by(45.0);

            let mut last = f64::INFINITY;
            for _ in 0..400 {
                s.tick(1.0 / 60.0);
                let remaining = match precision {
                    Precision::Low => s.low().remaining() as f64,
                    Precision::High => s.high().remaining(),
                };
                assert!(remaining <= last, "distance grew: {remaining} > {last}");
                last = remaining;
            }
            assert!(last < 1e-5, "{precision:?} did not converge: {last}");
            assert!((s.rotation() - 45.0).abs() < 1e-3);
        }
    }

    #[test]
    fn large_step_lands_exactly_without_overshoot() {
        let mut s = ViewportState::default();
        with_target(&mut s, Vec2::new(1.0, -1.0), 1.0);
        s.tick(10.0);
        assert_eq!(s.low().center, Vec2::new(1.0, -1.0));
        assert_eq!(s.low().side, 1.0);
    }

    #[test]
    fn zero_or_negative_dt_is_noop() {
        let mut s = ViewportState::default();
        with_target(&mut s, Vec2::new(1.0, 1.0), 1.0);
        let before = s.clone();
        s.tick(0.0);
        s.tick(-0.5);
        s.tick(f32::NAN);
        assert_eq!(s, before);
    }

    #[test]
    fn precision_round_trip_preserves_center() {
        let mut s = ViewportState::default();
        with_target(&mut s, Vec2::new(-0.743_643_9, 0.131_825_9), 0.01);
        s.tick(10.0);
        let original = s.low().center;

        s.set_precision(Precision::High);
        assert_eq!(s.high().center, original.cast());
        s.set_precision(Precision::Low);
        assert_eq!(s.low().center, original);
    }

    #[test]
    fn switching_to_same_precision_keeps_other_camera() {
        let mut s = ViewportState::default();
        s.set_precision(Precision::High);
        with_target(&mut s, Vec2::new(0.25, 0.0), 1.0);
        s.tick(10.0);
        let low_before = *s.low();
        s.set_precision(Precision::High);
        assert_eq!(*s.low(), low_before);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = ViewportState::default();
        with_target(&mut s, Vec2::new(2.0, 2.0), 0.1);
        s.rotate_by(30.0);
        s.tick(10.0);
        s.reset();
        assert_eq!(s.low().center, Vec2::ZERO);
        assert_eq!(s.low().target_side, 3.4f32);
        assert_eq!(s.rotation(), 0.0);
        assert_eq!(s.target_rotation(), 0.0);
    }

    #[test]
    fn snapshot_reports_active_precision() {
        let mut s = ViewportState::default();
        s.set_precision(Precision::High);
        let snap = s.snapshot();
        assert_eq!(snap.precision, Precision::High);
        assert_eq!(snap.center_text[0], "0.000000000000");
        assert_eq!(snap.side_text, "3.400000000000");
    }

    #[test]
    fn axis_lock_filters_deltas() {
        let mut lock = AxisLock::default();
        lock.toggle(Axis::Y);
        assert_eq!(lock.filter(Vec2::new(1.0f64, 2.0)), Vec2::new(1.0, 0.0));
        assert!(lock.is_locked(Axis::Y));
        assert!(!lock.is_locked(Axis::X));
    }
}
