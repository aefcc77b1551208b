use std::path::PathBuf;

use fractview_core::{FractalKind, Precision};
use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The device rejected the composed program. The previous program stays active.
    #[error("{} program ({}) failed to compile: {log}", kind.label(), precision.label())]
    Compile {
        kind: FractalKind,
        precision: Precision,
        log: String,
    },

    #[error("failed to read shader fragment {}: {source}", path.display())]
    Fragment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("palette not found: {0}")]
    PaletteNotFound(String),

    #[error("invalid palette {name:?}: {reason}")]
    InvalidPalette { name: String, reason: String },

    /// Unrecoverable; the engine must shut down.
    #[error("graphics device lost")]
    DeviceLost,

    #[error(transparent)]
    Core(#[from] fractview_core::CoreError),
}

impl RenderError {
    /// Whether the render loop can keep going after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DeviceLost)
    }
}
