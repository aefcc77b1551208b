//! Gesture handling: turns abstract pointer/keyboard input into viewport targets.
//!
//! The camera math (zoom to cursor, pan, selection zoom, nudges, typed values)
//! lives in [`CameraVisitor`] implementations, so each algorithm exists once
//! and runs in whichever precision is active.

use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::CoreError;
use crate::fractal::{FractalKind, FractalSpec};
use crate::mapper::{aspect_ratio, rotate_about, screen_to_fractal};
use crate::precision::Precision;
use crate::real::Real;
use crate::seed::JuliaSeed;
use crate::selection::SelectionRect;
use crate::vec2::Vec2;
use crate::viewport::{Axis, AxisLock, Camera, CameraVisitor, ViewportState};

/// Arrow-key direction, in fractal-plane orientation (y up).
///
/// A nudge pushes the picture that way: the camera moves the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn unit(self) -> Vec2<f32> {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Up => Vec2::new(0.0, 1.0),
            Self::Down => Vec2::new(0.0, -1.0),
        }
    }
}

/// Input events accepted by the engine. Pixel positions are relative to the
/// canvas top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Pan { delta: Vec2<f32> },
    /// Positive `scroll` zooms in; only the sign matters.
    Zoom { scroll: f32, cursor: Vec2<f32> },
    BeginSelect(Vec2<f32>),
    UpdateSelect(Vec2<f32>),
    CommitSelect,
    CancelSelect,
    Rotate { degrees: f32 },
    SetRotation(String),
    Nudge(Direction),
    SetCenter { axis: Axis, text: String },
    SetSide(String),
    ToggleAxisLock(Axis),
    PointerMoved { delta: Vec2<f32> },
    ScaleSeedRate(f64),
    ToggleSeedFreeze,
    SetSeed { axis: Axis, text: String },
    SetIterations(u32),
    SetPower(f32),
    SetPrecision(Precision),
    SetFractalKind(FractalKind),
    SetPalette(String),
    Reset,
}

/// What the engine has to do after a gesture, beyond the state change itself.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Applied,
    Ignored,
    /// Fractal kind or precision changed; a different shader program is needed.
    ProgramChanged,
    PaletteRequested(String),
}

/// Owns every piece of state gestures can touch.
#[derive(Debug, Clone)]
pub struct GestureController {
    viewport: ViewportState,
    selection: SelectionRect,
    spec: FractalSpec,
    seed: JuliaSeed,
    screen: Vec2<f32>,
    config: ViewConfig,
}

impl GestureController {
    /// An invalid `config` is logged and replaced by the defaults.
    pub fn new(config: ViewConfig, spec: FractalSpec) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("{e}, using default view settings");
                ViewConfig::default()
            }
        };
        Self {
            viewport: ViewportState::new(&config),
            selection: SelectionRect::default(),
            spec,
            seed: JuliaSeed::new(config.seed_change_rate),
            screen: Vec2::new(0.0, 0.0),
            config,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionRect {
        &self.selection
    }

    pub fn spec(&self) -> &FractalSpec {
        &self.spec
    }

    pub fn seed(&self) -> &JuliaSeed {
        &self.seed
    }

    pub fn screen_size(&self) -> Vec2<f32> {
        self.screen
    }

    pub fn set_screen_size(&mut self, size: Vec2<f32>) {
        self.screen = size;
    }

    /// Force the program-affecting state back, e.g. after a failed shader switch.
    pub fn restore_program(&mut self, kind: FractalKind, precision: Precision) {
        self.spec.kind = kind;
        self.viewport.set_precision(precision);
    }

    pub fn tick(&mut self, dt: f32) {
        self.viewport.tick(dt);
    }

    pub fn apply(&mut self, gesture: Gesture) -> GestureOutcome {
        debug!(?gesture, "Applying gesture");
        match gesture {
            Gesture::Zoom { scroll, cursor } => {
                if scroll == 0.0 || !scroll.is_finite() || !self.has_screen() {
                    return GestureOutcome::Ignored;
                }
                let zoomed = self.viewport.with_active(ZoomToCursor {
                    cursor,
                    size: self.screen,
                    zoom_in: scroll > 0.0,
                    factor: self.config.zoom_factor,
                });
                if !zoomed {
                    debug!("Zoom limit of {} reached", self.viewport.precision().label());
                    return GestureOutcome::Ignored;
                }
            }
            Gesture::Pan { delta } => {
                if !self.has_screen() {
                    return GestureOutcome::Ignored;
                }
                self.viewport.with_active(PanBy {
                    delta,
                    size: self.screen,
                });
            }
            Gesture::BeginSelect(pixel) => self.selection.start(pixel),
            Gesture::UpdateSelect(pixel) => self.selection.drag_to(pixel),
            Gesture::CancelSelect => self.selection.clear(),
            Gesture::CommitSelect => {
                let result = self.commit_selection();
                self.selection.clear();
                if let Err(e) = result {
                    debug!("Selection discarded: {e}");
                    return GestureOutcome::Ignored;
                }
            }
            Gesture::Rotate { degrees } => self.viewport.rotate_by(degrees),
            Gesture::SetRotation(text) => match f32::parse_input(&text) {
                Ok(deg) => self.viewport.set_target_rotation(deg),
                Err(e) => return rejected(e),
            },
            Gesture::Nudge(direction) => {
                self.viewport.with_active(Nudge {
                    direction: direction.unit(),
                    fraction: self.config.nudge_fraction,
                    rotation: self.viewport.target_rotation(),
                });
            }
            Gesture::SetCenter { axis, text } => {
                if let Err(e) = self.viewport.with_active(SetCenterComponent { axis, text: &text }) {
                    return rejected(e);
                }
            }
            Gesture::SetSide(text) => {
                if let Err(e) = self.viewport.with_active(SetSide { text: &text }) {
                    return rejected(e);
                }
            }
            Gesture::ToggleAxisLock(axis) => self.viewport.toggle_axis_lock(axis),
            Gesture::PointerMoved { delta } => {
                if !self.spec.kind.needs_seed() || !self.seed.nudge(delta) {
                    return GestureOutcome::Ignored;
                }
            }
            Gesture::ScaleSeedRate(factor) => self.seed.scale_rate(factor),
            Gesture::ToggleSeedFreeze => self.seed.toggle_freeze(),
            Gesture::SetSeed { axis, text } => {
                if let Err(e) = self.seed.set_component(axis, &text) {
                    return rejected(e);
                }
            }
            Gesture::SetIterations(n) => match FractalSpec::check_iterations(n) {
                Ok(n) => self.spec.max_iterations = n,
                Err(e) => return rejected(e),
            },
            Gesture::SetPower(p) => match FractalSpec::check_power(p) {
                Ok(p) => self.spec.power = p,
                Err(e) => return rejected(e),
            },
            Gesture::SetPrecision(precision) => {
                if precision == self.viewport.precision() {
                    return GestureOutcome::Ignored;
                }
                self.viewport.set_precision(precision);
                return GestureOutcome::ProgramChanged;
            }
            Gesture::SetFractalKind(kind) => {
                if kind == self.spec.kind {
                    return GestureOutcome::Ignored;
                }
                self.spec.kind = kind;
                return GestureOutcome::ProgramChanged;
            }
            Gesture::SetPalette(name) => return GestureOutcome::PaletteRequested(name),
            Gesture::Reset => {
                self.viewport.reset();
                self.selection.clear();
            }
        }
        GestureOutcome::Applied
    }

    fn has_screen(&self) -> bool {
        self.screen.x > 0.0 && self.screen.y > 0.0
    }

    fn commit_selection(&mut self) -> crate::Result<()> {
        if !self.selection.active {
            return Err(CoreError::SelectionTooSmall {
                width: 0.0,
                height: 0.0,
                min: self.config.min_selection_px,
            });
        }
        apply_selection_zoom(
            &mut self.viewport,
            &self.selection,
            self.screen,
            self.config.min_selection_px,
        )
    }
}

fn rejected(e: CoreError) -> GestureOutcome {
    warn!("Ignoring input: {e}");
    GestureOutcome::Ignored
}

/// Zoom the view onto a pixel rectangle.
///
/// The new center is the middle of the selected region; the new side fits
/// the selection into the window aspect ratio, by width when the selection
/// is relatively wider than the window and by height otherwise. Current and
/// target values are both set so the jump is not animated a second time.
pub fn apply_selection_zoom(
    viewport: &mut ViewportState,
    selection: &SelectionRect,
    size: Vec2<f32>,
    min_px: f32,
) -> crate::Result<()> {
    if !selection.is_large_enough(min_px) || size.x <= 0.0 || size.y <= 0.0 {
        return Err(CoreError::SelectionTooSmall {
            width: selection.width(),
            height: selection.height(),
            min: min_px,
        });
    }
    let (top_left, bottom_right) = selection.corners();
    viewport.with_active(SelectionZoom {
        top_left,
        bottom_right,
        size,
    })
}

// ---------------------------------------------------------------------------
// Camera operations
// ---------------------------------------------------------------------------

struct ZoomToCursor {
    cursor: Vec2<f32>,
    size: Vec2<f32>,
    zoom_in: bool,
    factor: f64,
}

impl CameraVisitor for ZoomToCursor {
    /// `false` when the step would leave the resolvable side range.
    type Output = bool;

    fn visit<T: Real>(self, camera: &mut Camera<T>, lock: AxisLock) -> bool {
        let aspect = T::from_f32(aspect_ratio(self.size));
        let before = screen_to_fractal(self.cursor, self.size, &camera.target_bounds(aspect));

        let step = T::ONE + T::from_f64(self.factor);
        let side = if self.zoom_in {
            camera.target_side / step
        } else {
            camera.target_side * step
        };
        if !camera.accepts_side(side) {
            return false;
        }
        camera.target_side = side;

        let after = screen_to_fractal(self.cursor, self.size, &camera.target_bounds(aspect));
        camera.target_center += lock.filter(before - after);
        true
    }
}

struct PanBy {
    delta: Vec2<f32>,
    size: Vec2<f32>,
}

impl CameraVisitor for PanBy {
    type Output = ();

    fn visit<T: Real>(self, camera: &mut Camera<T>, lock: AxisLock) {
        let dx = -T::from_f32(self.delta.x / self.size.x) * camera.side;
        let dy = T::from_f32(self.delta.y / self.size.y) * camera.side;
        camera.target_center += lock.filter(Vec2::new(dx, dy));
    }
}

struct SelectionZoom {
    top_left: Vec2<f32>,
    bottom_right: Vec2<f32>,
    size: Vec2<f32>,
}

impl CameraVisitor for SelectionZoom {
    type Output = crate::Result<()>;

    fn visit<T: Real>(self, camera: &mut Camera<T>, lock: AxisLock) -> Self::Output {
        let window_aspect = T::from_f32(aspect_ratio(self.size));
        let bounds = camera.bounds(window_aspect);

        // Bottom-left pixel corner is the fractal minimum because y is inverted.
        let min = screen_to_fractal(
            Vec2::new(self.top_left.x, self.bottom_right.y),
            self.size,
            &bounds,
        );
        let max = screen_to_fractal(
            Vec2::new(self.bottom_right.x, self.top_left.y),
            self.size,
            &bounds,
        );

        let width = max.x - min.x;
        let height = max.y - min.y;
        let midpoint = Vec2::new((min.x + max.x) / T::TWO, (min.y + max.y) / T::TWO);

        let side = if width / height > window_aspect {
            width / window_aspect
        } else {
            height
        };
        if !camera.accepts_side(side) {
            return Err(CoreError::InvalidSideLength(side.to_f64()));
        }
        let center = camera.center + lock.filter(midpoint - camera.center);
        camera.jump_to(center, side);
        Ok(())
    }
}

struct Nudge {
    direction: Vec2<f32>,
    fraction: f64,
    rotation: f32,
}

impl CameraVisitor for Nudge {
    type Output = ();

    fn visit<T: Real>(self, camera: &mut Camera<T>, lock: AxisLock) {
        let rotated = rotate_about(self.direction, Vec2::ZERO, self.rotation).cast::<T>();
        let distance = camera.target_side * T::from_f64(self.fraction);
        camera.target_center -= lock.filter(rotated * distance);
    }
}

struct SetCenterComponent<'a> {
    axis: Axis,
    text: &'a str,
}

impl CameraVisitor for SetCenterComponent<'_> {
    type Output = crate::Result<()>;

    fn visit<T: Real>(self, camera: &mut Camera<T>, _lock: AxisLock) -> Self::Output {
        let value = T::parse_input(self.text)?;
        match self.axis {
            Axis::X => camera.target_center.x = value,
            Axis::Y => camera.target_center.y = value,
        }
        Ok(())
    }
}

struct SetSide<'a> {
    text: &'a str,
}

impl CameraVisitor for SetSide<'_> {
    type Output = crate::Result<()>;

    fn visit<T: Real>(self, camera: &mut Camera<T>, _lock: AxisLock) -> Self::Output {
        let side = T::parse_input(self.text)?;
        if !camera.accepts_side(side) {
            return Err(CoreError::InvalidSideLength(side.to_f64()));
        }
        camera.side = side;
        camera.target_side = side;
        Ok(())
    }
}
