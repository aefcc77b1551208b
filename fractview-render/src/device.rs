//! The GPU as seen by the engine: compile programs, set named uniforms, draw a quad.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use crate::error::RenderError;

/// A value for a named uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum Uniform<'a> {
    Float(f32),
    Double(f64),
    Int(i32),
    Vec2([f32; 2]),
    DVec2([f64; 2]),
    Vec3Array(Cow<'a, [[f32; 3]]>),
}

impl Uniform<'_> {
    pub fn into_owned(self) -> Uniform<'static> {
        match self {
            Self::Float(v) => Uniform::Float(v),
            Self::Double(v) => Uniform::Double(v),
            Self::Int(v) => Uniform::Int(v),
            Self::Vec2(v) => Uniform::Vec2(v),
            Self::DVec2(v) => Uniform::DVec2(v),
            Self::Vec3Array(v) => Uniform::Vec3Array(Cow::Owned(v.into_owned())),
        }
    }
}

/// Graphics backend. Borrowed by the engine for the duration of a frame and
/// only ever used from the render thread.
pub trait Device {
    type Program: Clone + PartialEq + Debug;

    /// Compile and link a program. The error is the compiler/linker log.
    fn compile(&mut self, vertex: &str, fragment: &str) -> Result<Self::Program, String>;

    fn use_program(&mut self, program: &Self::Program) -> crate::Result<()>;

    /// Unknown names are ignored, as GL does for optimized-out uniforms.
    fn set_uniform(&mut self, program: &Self::Program, name: &str, value: Uniform<'_>);

    /// Draw the full-screen quad with the program in use.
    fn draw_quad(&mut self) -> crate::Result<()>;

    fn release(&mut self, program: Self::Program);
}

// ---------------------------------------------------------------------------
// Recording device
// ---------------------------------------------------------------------------

/// One recorded device interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Compile(u32),
    CompileFailed,
    Use(u32),
    Draw,
    Release(u32),
}

/// Headless [`Device`] that records every call.
///
/// Used by tests and benchmarks to drive the engine without a GPU. Programs
/// are plain ids; uniform values are kept per program.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    next_id: u32,
    live: HashSet<u32>,
    current: Option<u32>,
    uniforms: HashMap<u32, HashMap<String, Uniform<'static>>>,
    sources: HashMap<u32, String>,
    calls: Vec<DeviceCall>,
    /// Fragment sources containing this text fail to compile.
    pub fail_when_contains: Option<String>,
    /// When set, `draw_quad` reports a lost device.
    pub lost: bool,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Programs compiled and not yet released.
    pub fn live_programs(&self) -> usize {
        self.live.len()
    }

    pub fn compile_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Compile(_)))
            .count()
    }

    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == DeviceCall::Draw).count()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current
    }

    pub fn fragment_source(&self, program: u32) -> Option<&str> {
        self.sources.get(&program).map(String::as_str)
    }

    /// Last value set for `name` on the program currently in use.
    pub fn uniform(&self, name: &str) -> Option<&Uniform<'static>> {
        self.uniforms.get(&self.current?)?.get(name)
    }
}

impl Device for RecordingDevice {
    type Program = u32;

    fn compile(&mut self, _vertex: &str, fragment: &str) -> Result<u32, String> {
        if let Some(marker) = &self.fail_when_contains {
            if fragment.contains(marker.as_str()) {
                self.calls.push(DeviceCall::CompileFailed);
                return Err(format!("0:1(1): error: rejected `{marker}`"));
            }
        }
        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id);
        self.sources.insert(id, fragment.to_string());
        self.calls.push(DeviceCall::Compile(id));
        Ok(id)
    }

    fn use_program(&mut self, program: &u32) -> crate::Result<()> {
        if self.lost {
            return Err(RenderError::DeviceLost);
        }
        self.current = Some(*program);
        self.calls.push(DeviceCall::Use(*program));
        Ok(())
    }

    fn set_uniform(&mut self, program: &u32, name: &str, value: Uniform<'_>) {
        self.uniforms
            .entry(*program)
            .or_default()
            .insert(name.to_string(), value.into_owned());
    }

    fn draw_quad(&mut self) -> crate::Result<()> {
        if self.lost {
            return Err(RenderError::DeviceLost);
        }
        self.calls.push(DeviceCall::Draw);
        Ok(())
    }

    fn release(&mut self, program: u32) {
        self.live.remove(&program);
        self.uniforms.remove(&program);
        if self.current == Some(program) {
            self.current = None;
        }
        self.calls.push(DeviceCall::Release(program));
    }
}
