pub mod config;
pub mod error;
pub mod fractal;
pub mod gesture;
pub mod mapper;
pub mod precision;
pub mod real;
pub mod seed;
pub mod selection;
pub mod vec2;
pub mod viewport;

// Re-export primary types for convenience.
pub use config::ViewConfig;
pub use error::CoreError;
pub use fractal::{FractalKind, FractalSpec};
pub use gesture::{Direction, Gesture, GestureController, GestureOutcome};
pub use mapper::Bounds;
pub use precision::Precision;
pub use real::Real;
pub use seed::JuliaSeed;
pub use selection::SelectionRect;
pub use vec2::Vec2;
pub use viewport::{Axis, AxisLock, Camera, CameraVisitor, ViewSnapshot, ViewportState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
