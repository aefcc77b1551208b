//! Builds fragment programs from text fragments and manages the compiled handles.
//!
//! A program is identified by its [`ProgramKey`]. One program is active; the
//! other precision of the same fractal kind may be kept on standby so that a
//! precision toggle is a handle swap instead of a recompile.

use std::collections::HashMap;

use fractview_core::{FractalKind, Precision};
use tracing::{debug, error, info, warn};

use crate::device::Device;
use crate::error::RenderError;
use crate::fragments::{FragmentRole, FragmentSource};

/// Uniforms holding the fractal-plane bounds of the current camera.
pub const BOUNDS_UNIFORMS: [&str; 4] = ["minx", "maxx", "miny", "maxy"];

/// Uniform holding the Julia seed.
pub const SEED_UNIFORM: &str = "juliaSeed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    pub kind: FractalKind,
    pub precision: Precision,
}

impl ProgramKey {
    pub fn new(kind: FractalKind, precision: Precision) -> Self {
        Self { kind, precision }
    }

    /// Same kind, other precision.
    pub fn sibling(self) -> Self {
        Self::new(self.kind, self.precision.other())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Idle,
    Composing,
    Compiled,
    Active,
}

pub struct ShaderComposer<P> {
    source: Box<dyn FragmentSource + Send>,
    composed: HashMap<ProgramKey, String>,
    vertex: Option<String>,
    active: Option<(ProgramKey, P)>,
    standby: Option<(ProgramKey, P)>,
    state: ComposerState,
}

impl<P: Clone + PartialEq + std::fmt::Debug> ShaderComposer<P> {
    pub fn new(source: Box<dyn FragmentSource + Send>) -> Self {
        Self {
            source,
            composed: HashMap::new(),
            vertex: None,
            active: None,
            standby: None,
            state: ComposerState::Idle,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn active(&self) -> Option<&P> {
        self.active.as_ref().map(|(_, p)| p)
    }

    pub fn active_key(&self) -> Option<ProgramKey> {
        self.active.as_ref().map(|(k, _)| *k)
    }

    pub fn standby_key(&self) -> Option<ProgramKey> {
        self.standby.as_ref().map(|(k, _)| *k)
    }

    /// Fragment program text for `key`. Cached; identical keys always give
    /// byte-identical text.
    pub fn compose(&mut self, key: ProgramKey) -> crate::Result<&str> {
        if !self.composed.contains_key(&key) {
            let text = compose_fragment(self.source.as_ref(), key)?;
            debug!(?key, bytes = text.len(), "Composed fragment program");
            self.composed.insert(key, text);
        }
        Ok(self.composed[&key].as_str())
    }

    /// Make `key` the active program. Returns whether the active program changed.
    ///
    /// On failure the previous active program stays active.
    pub fn request<D>(&mut self, device: &mut D, key: ProgramKey) -> crate::Result<bool>
    where
        D: Device<Program = P>,
    {
        if self.active_key() == Some(key) {
            return Ok(false);
        }

        if self.standby_key() == Some(key) {
            std::mem::swap(&mut self.active, &mut self.standby);
            info!(
                "Switched to standby {} program ({})",
                key.kind.label(),
                key.precision.label()
            );
            return Ok(true);
        }

        let fallback = self.resting_state();
        self.state = ComposerState::Composing;
        let program = match self.build(device, key) {
            Ok(p) => p,
            Err(e) => {
                self.state = fallback;
                if matches!(e, RenderError::Compile { .. }) {
                    error!("{e}");
                }
                return Err(e);
            }
        };
        self.state = ComposerState::Compiled;

        let previous = [self.active.take(), self.standby.take()];
        self.active = Some((key, program));
        self.state = ComposerState::Active;
        for (old_key, old) in previous.into_iter().flatten() {
            if old_key == key.sibling() && self.standby.is_none() {
                self.standby = Some((old_key, old));
            } else {
                debug!(?old_key, "Releasing program");
                device.release(old);
            }
        }
        info!(
            "Activated {} program ({})",
            key.kind.label(),
            key.precision.label()
        );
        Ok(true)
    }

    /// Compile the other precision of the active kind in advance.
    ///
    /// Returns whether a standby program is available afterwards. Failure is
    /// not an error for the caller: the toggle will simply compile on demand.
    pub fn prepare_standby<D>(&mut self, device: &mut D) -> bool
    where
        D: Device<Program = P>,
    {
        let Some(active) = self.active_key() else {
            return false;
        };
        let key = active.sibling();
        if self.standby_key() == Some(key) {
            return true;
        }
        match self.build(device, key) {
            Ok(program) => {
                if let Some((_, old)) = self.standby.replace((key, program)) {
                    device.release(old);
                }
                debug!(?key, "Standby program ready");
                true
            }
            Err(e) => {
                warn!("No standby program: {e}");
                false
            }
        }
    }

    /// Release every compiled program.
    pub fn release_all<D>(&mut self, device: &mut D)
    where
        D: Device<Program = P>,
    {
        for (key, program) in [self.active.take(), self.standby.take()].into_iter().flatten() {
            debug!(?key, "Releasing program");
            device.release(program);
        }
        self.state = ComposerState::Idle;
    }

    fn resting_state(&self) -> ComposerState {
        if self.active.is_some() {
            ComposerState::Active
        } else {
            ComposerState::Idle
        }
    }

    fn build<D>(&mut self, device: &mut D, key: ProgramKey) -> crate::Result<P>
    where
        D: Device<Program = P>,
    {
        if self.vertex.is_none() {
            let text = self.source.fragment(FragmentRole::Vertex)?.into_owned();
            self.vertex = Some(text);
        }
        self.compose(key)?;
        let vertex = self.vertex.as_deref().unwrap_or_default();
        let fragment = self.composed[&key].as_str();
        device
            .compile(vertex, fragment)
            .map_err(|log| RenderError::Compile {
                kind: key.kind,
                precision: key.precision,
                log,
            })
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

struct PrecisionTypes {
    version: &'static str,
    scalar: &'static str,
    vector: &'static str,
}

fn precision_types(precision: Precision) -> PrecisionTypes {
    match precision {
        Precision::Low => PrecisionTypes {
            version: "#version 330 core",
            scalar: "float",
            vector: "vec2",
        },
        // Double uniforms and dvec2 need GLSL 4.00.
        Precision::High => PrecisionTypes {
            version: "#version 400 core",
            scalar: "double",
            vector: "dvec2",
        },
    }
}

/// Concatenate, in order: header and declarations, helpers, coloring, the
/// kind's kernel, and a generated `main`.
pub fn compose_fragment(source: &dyn FragmentSource, key: ProgramKey) -> crate::Result<String> {
    let types = precision_types(key.precision);
    let mut text = String::with_capacity(4096);

    text.push_str(types.version);
    text.push('\n');
    text.push_str(&format!("#define REAL {}\n", types.scalar));
    text.push_str(&format!("#define REAL2 {}\n\n", types.vector));

    push_section(&mut text, &source.fragment(FragmentRole::Variables)?);
    for name in BOUNDS_UNIFORMS {
        text.push_str(&format!("uniform {} {name};\n", types.scalar));
    }
    if key.kind.needs_seed() {
        text.push_str(&format!("uniform {} {SEED_UNIFORM};\n", types.vector));
    }
    text.push('\n');

    push_section(&mut text, &source.fragment(FragmentRole::Helpers)?);
    push_section(&mut text, &source.fragment(FragmentRole::Coloring)?);
    push_section(&mut text, &source.fragment(FragmentRole::Kernel(key.kind))?);
    text.push_str(&entry_point(key.kind));
    Ok(text)
}

fn push_section(text: &mut String, fragment: &str) {
    text.push_str(fragment);
    if !fragment.ends_with('\n') {
        text.push('\n');
    }
    text.push('\n');
}

fn entry_point(kind: FractalKind) -> String {
    format!(
        "void main()
{{
    REAL2 uv = REAL2(vPos * 0.5 + 0.5);
    REAL2 c = REAL2(mix(minx, maxx, uv.x), mix(miny, maxy, uv.y));
    REAL2 pivot = REAL2((minx + maxx) * 0.5, (miny + maxy) * 0.5);
    c = applyRotation(c, pivot, rotation_angle);
    float iterations = iterate{}(c);
    FragColor = drawSelection(colorFractal(iterations));
}}
",
        kind.label()
    )
}
