use thiserror::Error;

/// Errors originating from viewport math and gesture handling.
///
/// None of these are fatal: the caller logs them and leaves the affected
/// state untouched.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be within 1..=65536)")]
    InvalidIterations(u32),

    #[error("invalid power: {0} (must be finite and >= 1)")]
    InvalidPower(f32),

    #[error("invalid side length: {0} (must be positive and finite)")]
    InvalidSideLength(f64),

    #[error("could not parse {input:?} as a number")]
    InvalidNumericInput { input: String },

    #[error("invalid view setting {field}: {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    #[error("selection {width}×{height} px is below the {min} px minimum")]
    SelectionTooSmall { width: f32, height: f32, min: f32 },
}
