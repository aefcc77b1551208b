//! The render-thread side of the viewer.
//!
//! The [`Engine`] owns all mutable view state. Other threads talk to it only
//! through an [`EngineHandle`]: gestures go in over one channel, snapshots
//! come back over per-subscriber channels.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use fractview_core::{
    FractalKind, FractalSpec, Gesture, GestureController, GestureOutcome, JuliaSeed, Precision,
    Vec2, ViewConfig, ViewSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::clock::{FrameClock, PerformanceSample};
use crate::composer::{ProgramKey, ShaderComposer};
use crate::device::Device;
use crate::error::RenderError;
use crate::fragments::{BuiltinFragments, DirectoryFragments, FragmentSource};
use crate::palette::{Palette, PaletteStore, DEFAULT_PALETTE};
use crate::pass::RenderPass;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine settings. Every field is defaulted so partial files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub view: ViewConfig,
    /// Selection outline thickness in pixels.
    pub border_px: f32,
    pub max_iterations: u32,
    pub power: f32,
    pub palette: String,
    /// Read shader fragments from this directory instead of the built-in ones.
    pub fragment_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            border_px: 3.0,
            max_iterations: FractalSpec::DEFAULT_MAX_ITERATIONS,
            power: FractalSpec::DEFAULT_POWER,
            palette: DEFAULT_PALETTE.to_string(),
            fragment_dir: None,
        }
    }
}

impl EngineConfig {
    /// The fragment provider this configuration asks for.
    pub fn fragment_source(&self) -> Box<dyn FragmentSource + Send> {
        match &self.fragment_dir {
            Some(dir) => {
                info!("Loading shader fragments from {}", dir.display());
                Box::new(DirectoryFragments::new(dir))
            }
            None => Box::new(BuiltinFragments),
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Published to subscribers. Consumers run on their own threads and must not
/// assume when they are delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Sent every rendered tick.
    View(ViewSnapshot),
    /// Sent about once per second.
    Performance(PerformanceSample),
    /// The active program changed (also after a failed switch was reverted).
    ProgramChanged {
        kind: FractalKind,
        precision: Precision,
    },
    CompileFailed {
        kind: FractalKind,
        precision: Precision,
        log: String,
    },
    Seed(JuliaSeed),
    PaletteChanged(String),
}

enum Command {
    Gesture(Gesture),
    Subscribe(Sender<EngineEvent>),
}

/// Cloneable, `Send` access to a running engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gesture(g) => f.debug_tuple("Gesture").field(g).finish(),
            Self::Subscribe(_) => f.write_str("Subscribe"),
        }
    }
}

impl EngineHandle {
    /// Queue a gesture for the next frame. Returns `false` once the engine is gone.
    pub fn send(&self, gesture: Gesture) -> bool {
        self.commands.send(Command::Gesture(gesture)).is_ok()
    }

    /// Receive engine events from the next frame on.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        if self.commands.send(Command::Subscribe(tx)).is_err() {
            debug!("Subscribing to a stopped engine");
        }
        rx
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine<P> {
    controller: GestureController,
    composer: ShaderComposer<P>,
    pass: RenderPass,
    palettes: PaletteStore,
    palette_name: String,
    clock: FrameClock,
    commands: Receiver<Command>,
    subscribers: Vec<Sender<EngineEvent>>,
    program_dirty: bool,
    standby_pending: bool,
}

impl<P: Clone + PartialEq + std::fmt::Debug> Engine<P> {
    pub fn new(
        config: EngineConfig,
        source: Box<dyn FragmentSource + Send>,
    ) -> (Self, EngineHandle) {
        let spec = FractalSpec::new(FractalKind::default(), config.power, config.max_iterations)
            .unwrap_or_else(|e| {
                warn!("Invalid fractal settings ({e}), using defaults");
                FractalSpec::default()
            });

        let palettes = PaletteStore::with_builtins();
        let (palette_name, palette) = match palettes.get(&config.palette) {
            Ok(p) => (config.palette.clone(), p.clone()),
            Err(e) => {
                warn!("{e}, using {DEFAULT_PALETTE}");
                (DEFAULT_PALETTE.to_string(), Palette::default())
            }
        };
        let pass = RenderPass::new(&palette, config.border_px);

        let (tx, rx) = mpsc::channel();
        let engine = Self {
            controller: GestureController::new(config.view, spec),
            composer: ShaderComposer::new(source),
            pass,
            palettes,
            palette_name,
            clock: FrameClock::new(),
            commands: rx,
            subscribers: Vec::new(),
            program_dirty: true,
            standby_pending: false,
        };
        info!("Engine created");
        (engine, EngineHandle { commands: tx })
    }

    pub fn controller(&self) -> &GestureController {
        &self.controller
    }

    pub fn composer(&self) -> &ShaderComposer<P> {
        &self.composer
    }

    pub fn palettes(&self) -> &PaletteStore {
        &self.palettes
    }

    /// For registering custom palettes before or between frames.
    pub fn palettes_mut(&mut self) -> &mut PaletteStore {
        &mut self.palettes
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_name
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Run one tick: drain gestures, switch programs if needed, animate, draw.
    ///
    /// Only a lost device is returned as an error; the caller should then
    /// call [`shutdown`](Self::shutdown) and stop.
    pub fn frame<D>(&mut self, device: &mut D, dt: f32, size: Vec2<f32>) -> crate::Result<()>
    where
        D: Device<Program = P>,
    {
        self.controller.set_screen_size(size);

        let seed_before = *self.controller.seed();
        self.drain_commands();
        let seed_after = *self.controller.seed();
        if seed_after != seed_before {
            self.publish(EngineEvent::Seed(seed_after));
        }

        if self.program_dirty {
            self.program_dirty = false;
            self.switch_program(device)?;
        } else if self.standby_pending {
            self.standby_pending = false;
            self.composer.prepare_standby(device);
        }

        self.controller.tick(dt);

        if size.x >= 1.0 && size.y >= 1.0 {
            if let Some(program) = self.composer.active() {
                if let Err(e) = self.pass.draw(device, program, &self.controller) {
                    error!("Render pass failed: {e}");
                    return Err(e);
                }
            }
        }

        if let Some(sample) = self.clock.record(dt) {
            debug!(fps = sample.fps, frame_ms = sample.frame_time_ms, "Frame stats");
            self.publish(EngineEvent::Performance(sample));
        }
        let snapshot = self.controller.viewport().snapshot();
        self.publish(EngineEvent::View(snapshot));
        Ok(())
    }

    /// Release every device resource the engine holds.
    pub fn shutdown<D>(&mut self, device: &mut D)
    where
        D: Device<Program = P>,
    {
        self.composer.release_all(device);
        info!("Engine shut down");
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Subscribe(tx) => self.subscribers.push(tx),
                Command::Gesture(gesture) => match self.controller.apply(gesture) {
                    GestureOutcome::ProgramChanged => self.program_dirty = true,
                    GestureOutcome::PaletteRequested(name) => self.set_palette(&name),
                    GestureOutcome::Applied | GestureOutcome::Ignored => {}
                },
            }
        }
    }

    fn set_palette(&mut self, name: &str) {
        match self.palettes.get(name) {
            Ok(palette) => {
                self.pass.set_palette(palette);
                self.palette_name = name.to_string();
                info!("Palette set to {name}");
                self.publish(EngineEvent::PaletteChanged(self.palette_name.clone()));
            }
            Err(e) => warn!("{e}; keeping {}", self.palette_name),
        }
    }

    fn switch_program<D>(&mut self, device: &mut D) -> crate::Result<()>
    where
        D: Device<Program = P>,
    {
        let key = ProgramKey::new(
            self.controller.spec().kind,
            self.controller.viewport().precision(),
        );
        match self.composer.request(device, key) {
            Ok(changed) => {
                if changed {
                    self.standby_pending = true;
                    self.publish(EngineEvent::ProgramChanged {
                        kind: key.kind,
                        precision: key.precision,
                    });
                }
                Ok(())
            }
            Err(RenderError::DeviceLost) => Err(RenderError::DeviceLost),
            Err(e) => {
                if let RenderError::Compile {
                    kind,
                    precision,
                    log,
                } = &e
                {
                    self.publish(EngineEvent::CompileFailed {
                        kind: *kind,
                        precision: *precision,
                        log: log.clone(),
                    });
                } else {
                    error!("Cannot build {:?} program: {e}", key);
                }
                if let Some(active) = self.composer.active_key() {
                    warn!(
                        "Staying on {} ({})",
                        active.kind.label(),
                        active.precision.label()
                    );
                    self.controller.restore_program(active.kind, active.precision);
                    self.publish(EngineEvent::ProgramChanged {
                        kind: active.kind,
                        precision: active.precision,
                    });
                }
                Ok(())
            }
        }
    }

    fn publish(&mut self, event: EngineEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
