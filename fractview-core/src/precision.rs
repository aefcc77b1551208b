use serde::{Deserialize, Serialize};

/// Which floating-point width drives viewport math and shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Single precision (`f32` uniforms).
    #[default]
    Low,
    /// Double precision (`f64` uniforms, requires fp64 shader support).
    High,
}

impl Precision {
    pub const ALL: [Precision; 2] = [Precision::Low, Precision::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "GPU32",
            Self::High => "GPU64",
        }
    }

    /// The other precision.
    pub fn other(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}
