pub mod clock;
pub mod composer;
pub mod device;
pub mod engine;
pub mod error;
pub mod fragments;
pub mod palette;
pub mod pass;

pub use clock::{FrameClock, PerformanceSample};
pub use composer::{compose_fragment, ComposerState, ProgramKey, ShaderComposer};
pub use device::{Device, DeviceCall, RecordingDevice, Uniform};
pub use engine::{Engine, EngineConfig, EngineEvent, EngineHandle};
pub use error::RenderError;
pub use fragments::{BuiltinFragments, DirectoryFragments, FragmentRole, FragmentSource};
pub use palette::{builtin_palettes, Palette, PaletteStore, DEFAULT_PALETTE, MAX_PALETTE_COLORS};
pub use pass::RenderPass;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
