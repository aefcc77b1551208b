use std::borrow::Cow;

use fractview_core::mapper::{aspect_ratio, pixel_to_ndc};
use fractview_core::{Bounds, GestureController, Precision, Vec2};

use crate::composer::{BOUNDS_UNIFORMS, SEED_UNIFORM};
use crate::device::{Device, Uniform};
use crate::palette::Palette;

/// Per-frame uniform upload and the single quad draw.
///
/// Bounds come from the *current* camera of the active precision; targets
/// are never rendered directly.
#[derive(Debug, Clone)]
pub struct RenderPass {
    palette: Vec<[f32; 3]>,
    border_px: f32,
}

impl RenderPass {
    pub fn new(palette: &Palette, border_px: f32) -> Self {
        Self {
            palette: palette.normalized(),
            border_px,
        }
    }

    pub fn set_palette(&mut self, palette: &Palette) {
        self.palette = palette.normalized();
    }

    pub fn palette(&self) -> &[[f32; 3]] {
        &self.palette
    }

    pub fn draw<D: Device>(
        &self,
        device: &mut D,
        program: &D::Program,
        state: &GestureController,
    ) -> crate::Result<()> {
        let screen = state.screen_size();
        let viewport = state.viewport();
        let precision = viewport.precision();

        device.use_program(program)?;

        let bounds = current_bounds(state, aspect_ratio(screen));
        let values = [bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y];
        for (name, value) in BOUNDS_UNIFORMS.into_iter().zip(values) {
            device.set_uniform(program, name, real_uniform(precision, value));
        }

        let spec = state.spec();
        device.set_uniform(program, "N_POWER", Uniform::Float(spec.power));
        device.set_uniform(
            program,
            "MAX_ITERATIONS",
            Uniform::Float(spec.max_iterations as f32),
        );
        device.set_uniform(
            program,
            "rotation_angle",
            Uniform::Float(viewport.rotation().to_radians()),
        );

        if spec.kind.needs_seed() {
            let seed = state.seed().value;
            let value = match precision {
                Precision::Low => Uniform::Vec2([seed.x as f32, seed.y as f32]),
                Precision::High => Uniform::DVec2([seed.x, seed.y]),
            };
            device.set_uniform(program, SEED_UNIFORM, value);
        }

        device.set_uniform(
            program,
            "palette",
            Uniform::Vec3Array(Cow::Borrowed(&self.palette)),
        );
        device.set_uniform(
            program,
            "palette_size",
            Uniform::Int(self.palette.len() as i32),
        );

        self.upload_selection(device, program, state, screen);

        device.draw_quad()
    }

    fn upload_selection<D: Device>(
        &self,
        device: &mut D,
        program: &D::Program,
        state: &GestureController,
        screen: Vec2<f32>,
    ) {
        let selection = state.selection();
        if !selection.active {
            device.set_uniform(program, "drawRectangle", Uniform::Float(0.0));
            return;
        }
        let (top_left, bottom_right) = selection.corners();
        let begin = pixel_to_ndc(Vec2::new(top_left.x, bottom_right.y), screen);
        let end = pixel_to_ndc(Vec2::new(bottom_right.x, top_left.y), screen);
        let border = (self.border_px / screen.x * 2.0).max(self.border_px / screen.y * 2.0);

        device.set_uniform(program, "beginRect", Uniform::Vec2([begin.x, begin.y]));
        device.set_uniform(program, "endRect", Uniform::Vec2([end.x, end.y]));
        device.set_uniform(program, "drawRectangle", Uniform::Float(1.0));
        device.set_uniform(program, "u_borderWidth", Uniform::Float(border));
    }
}

fn current_bounds(state: &GestureController, aspect: f32) -> Bounds<f64> {
    let viewport = state.viewport();
    match viewport.precision() {
        Precision::Low => {
            let b = viewport.low().bounds(aspect);
            Bounds {
                min: b.min.cast(),
                max: b.max.cast(),
            }
        }
        Precision::High => viewport.high().bounds(aspect as f64),
    }
}

/// Low-precision values were computed in `f32`, so narrowing back is exact.
fn real_uniform(precision: Precision, value: f64) -> Uniform<'static> {
    match precision {
        Precision::Low => Uniform::Float(value as f32),
        Precision::High => Uniform::Double(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RecordingDevice;
    use crate::palette::PaletteStore;
    use fractview_core::{FractalKind, FractalSpec, Gesture, ViewConfig};

    fn setup() -> (RenderPass, RecordingDevice, u32, GestureController) {
        let store = PaletteStore::with_builtins();
        let pass = RenderPass::new(store.get("Classic").unwrap(), 3.0);
        let mut device = RecordingDevice::new();
        let program = device.compile("", "").unwrap();
        let mut state = GestureController::new(ViewConfig::default(), FractalSpec::default());
        state.set_screen_size(Vec2::new(800.0, 600.0));
        (pass, device, program, state)
    }

    fn float(device: &RecordingDevice, name: &str) -> f32 {
        match device.uniform(name) {
            Some(Uniform::Float(v)) => *v,
            other => panic!("{name}: {other:?}"),
        }
    }

    #[test]
    fn uploads_low_precision_bounds_and_parameters() {
        let (pass, mut device, program, state) = setup();
        pass.draw(&mut device, &program, &state).unwrap();

        assert!((float(&device, "minx") + 3.4 * 4.0 / 6.0).abs() < 1e-6);
        assert!((float(&device, "maxy") - 1.7).abs() < 1e-6);
        assert_eq!(float(&device, "N_POWER"), 2.0);
        assert_eq!(float(&device, "MAX_ITERATIONS"), 1500.0);
        assert_eq!(float(&device, "drawRectangle"), 0.0);
        assert_eq!(device.uniform("palette_size"), Some(&Uniform::Int(9)));
        assert!(device.uniform(SEED_UNIFORM).is_none());
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn high_precision_uses_doubles() {
        let (pass, mut device, program, mut state) = setup();
        state.apply(Gesture::SetPrecision(Precision::High));
        state.apply(Gesture::SetFractalKind(FractalKind::Julia));
        pass.draw(&mut device, &program, &state).unwrap();

        match device.uniform("miny") {
            Some(Uniform::Double(v)) => assert!((v + 1.7).abs() < 1e-12),
            other => panic!("miny: {other:?}"),
        }
        assert_eq!(
            device.uniform(SEED_UNIFORM),
            Some(&Uniform::DVec2([-0.7, 0.27015]))
        );
    }

    #[test]
    fn selection_overlay_in_ndc() {
        let (pass, mut device, program, mut state) = setup();
        state.apply(Gesture::BeginSelect(Vec2::new(300.0, 200.0)));
        state.apply(Gesture::UpdateSelect(Vec2::new(100.0, 100.0)));
        pass.draw(&mut device, &program, &state).unwrap();

        assert_eq!(float(&device, "drawRectangle"), 1.0);
        // Begin is the bottom-left corner, end the top-right one.
        assert_eq!(
            device.uniform("beginRect"),
            Some(&Uniform::Vec2([-0.75, 1.0 - 400.0 / 600.0]))
        );
        assert_eq!(
            device.uniform("endRect"),
            Some(&Uniform::Vec2([-0.25, 1.0 - 200.0 / 600.0]))
        );
        assert!((float(&device, "u_borderWidth") - 0.01).abs() < 1e-7);
    }

    #[test]
    fn rotation_is_uploaded_in_radians() {
        let (pass, mut device, program, mut state) = setup();
        state.apply(Gesture::Rotate { degrees: 90.0 });
        state.tick(10.0);
        pass.draw(&mut device, &program, &state).unwrap();
        assert!((float(&device, "rotation_angle") - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
