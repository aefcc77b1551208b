use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The escape-time fractal family being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FractalKind {
    #[default]
    Mandelbrot,
    Julia,
}

impl FractalKind {
    pub const ALL: [FractalKind; 2] = [FractalKind::Mandelbrot, FractalKind::Julia];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }

    /// Whether the kernel reads an auxiliary parameter point (the Julia seed).
    pub fn needs_seed(self) -> bool {
        matches!(self, Self::Julia)
    }
}

/// Per-frame fractal parameters.
///
/// `kind` selects the shader program; `power` and `max_iterations` are plain
/// uniforms. Range checks happen at the input boundary through
/// [`check_iterations`](Self::check_iterations) and
/// [`check_power`](Self::check_power).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalSpec {
    pub kind: FractalKind,
    pub power: f32,
    pub max_iterations: u32,
}

impl FractalSpec {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 1500;
    pub const DEFAULT_POWER: f32 = 2.0;
    pub const MAX_ITERATIONS_LIMIT: u32 = 65_536;

    pub fn new(kind: FractalKind, power: f32, max_iterations: u32) -> crate::Result<Self> {
        Ok(Self {
            kind,
            power: Self::check_power(power)?,
            max_iterations: Self::check_iterations(max_iterations)?,
        })
    }

    pub fn check_iterations(n: u32) -> crate::Result<u32> {
        if (1..=Self::MAX_ITERATIONS_LIMIT).contains(&n) {
            Ok(n)
        } else {
            Err(CoreError::InvalidIterations(n))
        }
    }

    pub fn check_power(p: f32) -> crate::Result<f32> {
        if p.is_finite() && p >= 1.0 {
            Ok(p)
        } else {
            Err(CoreError::InvalidPower(p))
        }
    }
}

impl Default for FractalSpec {
    fn default() -> Self {
        Self {
            kind: FractalKind::default(),
            power: Self::DEFAULT_POWER,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec() {
        let s = FractalSpec::default();
        assert_eq!(s.kind, FractalKind::Mandelbrot);
        assert_eq!(s.max_iterations, 1500);
        assert!((s.power - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn iteration_bounds() {
        assert!(FractalSpec::check_iterations(0).is_err());
        assert!(FractalSpec::check_iterations(1).is_ok());
        assert!(FractalSpec::check_iterations(65_536).is_ok());
        assert!(FractalSpec::check_iterations(65_537).is_err());
    }

    #[test]
    fn power_bounds() {
        assert!(FractalSpec::check_power(0.5).is_err());
        assert!(FractalSpec::check_power(f32::NAN).is_err());
        assert!(FractalSpec::check_power(f32::INFINITY).is_err());
        assert_eq!(FractalSpec::check_power(3.0), Ok(3.0));
    }

    #[test]
    fn only_julia_needs_seed() {
        assert!(!FractalKind::Mandelbrot.needs_seed());
        assert!(FractalKind::Julia.needs_seed());
    }

    #[test]
    fn spec_serializes() {
        let s = FractalSpec::new(FractalKind::Julia, 3.0, 200).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        let back: FractalSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
