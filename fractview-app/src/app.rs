use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use eframe::{egui, glow};
use tracing::{info, warn};

use fractview_core::{Axis, FractalKind, Gesture, JuliaSeed, Precision, Real, ViewSnapshot};
use fractview_render::{Engine, EngineEvent, EngineHandle, PerformanceSample};

use crate::gl_renderer::GlRenderer;
use crate::settings::AppSettings;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Degrees per Q/E key press or rotate button click.
pub(crate) const ROTATION_STEP: f32 = 10.0;
/// Julia seed rate multiplier for the T/Y keys.
pub(crate) const SEED_RATE_STEP: f64 = 2.0;

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// Text fields
// ---------------------------------------------------------------------------

/// Editable text mirrored from engine readouts while not being edited.
#[derive(Debug, Default)]
pub(crate) struct ValueFields {
    pub(crate) center: [String; 2],
    pub(crate) side: String,
    pub(crate) rotation: String,
    pub(crate) seed: [String; 2],
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub(crate) struct FractViewApp {
    pub(crate) settings: AppSettings,
    pub(crate) handle: EngineHandle,
    events: Receiver<EngineEvent>,
    pub(crate) renderer: Arc<Mutex<GlRenderer>>,

    // Mirrors of engine state, updated from events or by our own gestures.
    pub(crate) kind: FractalKind,
    pub(crate) precision: Precision,
    pub(crate) max_iterations: u32,
    pub(crate) power: f32,
    pub(crate) palette: String,
    pub(crate) palette_names: Vec<String>,
    pub(crate) view: Option<ViewSnapshot>,
    pub(crate) seed: JuliaSeed,
    pub(crate) performance: Option<PerformanceSample>,
    pub(crate) last_error: Option<String>,

    pub(crate) fields: ValueFields,
    pub(crate) show_controls: bool,
    /// A rectangle selection drag is in progress.
    pub(crate) selecting: bool,
    device_lost: bool,
}

impl FractViewApp {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Result<Self, String> {
        let gl = cc
            .gl
            .as_ref()
            .ok_or("OpenGL context unavailable; FractView needs the glow renderer")?;

        let source = settings.engine.fragment_source();
        let (mut engine, handle) = Engine::<glow::Program>::new(settings.engine.clone(), source);
        load_custom_palettes(&mut engine, &settings);

        let palette_names = engine.palettes().names().map(str::to_string).collect();
        let palette = engine.palette_name().to_string();
        let spec = *engine.controller().spec();
        let seed = *engine.controller().seed();
        let events = handle.subscribe();

        let renderer = GlRenderer::new(gl, engine)?;
        info!("FractView ready");

        Ok(Self {
            show_controls: settings.show_controls,
            settings,
            handle,
            events,
            renderer: Arc::new(Mutex::new(renderer)),
            kind: spec.kind,
            precision: Precision::default(),
            max_iterations: spec.max_iterations,
            power: spec.power,
            palette,
            palette_names,
            view: None,
            seed,
            performance: None,
            last_error: None,
            fields: ValueFields::default(),
            selecting: false,
            device_lost: false,
        })
    }

    pub(crate) fn send(&self, gesture: Gesture) {
        if !self.handle.send(gesture) {
            warn!("Renderer is gone; input dropped");
        }
    }

    /// Apply everything the engine published since the last UI frame.
    fn poll_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EngineEvent::View(view) => self.view = Some(view),
                EngineEvent::Performance(sample) => self.performance = Some(sample),
                EngineEvent::ProgramChanged { kind, precision } => {
                    self.kind = kind;
                    self.precision = precision;
                }
                EngineEvent::CompileFailed {
                    kind,
                    precision,
                    log,
                } => {
                    self.last_error = Some(format!(
                        "{} ({}) failed to compile:\n{log}",
                        kind.label(),
                        precision.label()
                    ));
                }
                EngineEvent::Seed(seed) => self.seed = seed,
                EngineEvent::PaletteChanged(name) => self.palette = name,
            }
        }
    }

    /// Refresh text fields that are not being edited.
    fn sync_fields(&mut self, ctx: &egui::Context) {
        let editing = ctx.memory(|m| m.focused().is_some());
        if editing {
            return;
        }
        if let Some(view) = &self.view {
            self.fields.center = view.center_text.clone();
            self.fields.side = view.side_text.clone();
            self.fields.rotation = format!("{:.1}", view.rotation);
        }
        self.fields.seed = [self.seed.value.x.display(), self.seed.value.y.display()];
    }

    pub(crate) fn axis_locked(&self, axis: Axis) -> bool {
        self.view
            .as_ref()
            .is_some_and(|v| v.axis_lock.is_locked(axis))
    }

    fn check_renderer(&mut self, ctx: &egui::Context) {
        if self.device_lost {
            return;
        }
        let lost = self.renderer.lock().map(|r| r.is_lost()).unwrap_or(true);
        if lost {
            self.device_lost = true;
            self.last_error = Some("Graphics device lost; closing.".to_string());
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

fn load_custom_palettes(engine: &mut Engine<glow::Program>, settings: &AppSettings) {
    let path = settings.palettes_path();
    if !path.exists() {
        return;
    }
    match std::fs::read_to_string(&path) {
        Ok(json) => {
            if let Err(e) = engine.palettes_mut().add_from_json(&json) {
                warn!("Ignoring {}: {e}", path.display());
            }
        }
        Err(e) => warn!("Failed to read {}: {e}", path.display()),
    }
}

impl eframe::App for FractViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.check_renderer(ctx);
        self.sync_fields(ctx);
        self.handle_keyboard(ctx);

        if self.show_controls {
            self.show_controls_panel(ctx);
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.show_canvas(ui));
        self.show_hud(ctx);

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_width = rect.width();
            self.settings.window_height = rect.height();
        }
        // Render loop runs in lockstep with display refresh.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        if let Some(gl) = gl {
            if let Ok(mut renderer) = self.renderer.lock() {
                renderer.destroy(gl);
            }
        }
        self.settings.show_controls = self.show_controls;
        self.settings.save();
        info!("FractView closed");
    }
}
