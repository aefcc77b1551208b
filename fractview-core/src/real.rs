use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::CoreError;

/// Scalar type used for viewport math.
///
/// Implemented for `f32` (low precision) and `f64` (high precision). All
/// viewport, mapping and gesture algorithms are written once against this
/// trait and instantiated for both widths, so the two precisions can never
/// drift apart in behaviour.
pub trait Real:
    Copy
    + PartialOrd
    + Debug
    + Display
    + FromStr
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    /// Machine epsilon of the type.
    const EPSILON: Self;

    /// Fractional digits shown in readouts. Matches the meaningful digits of the type.
    const DISPLAY_DECIMALS: usize;

    fn from_f64(v: f64) -> Self;
    fn from_f32(v: f32) -> Self;
    fn to_f64(self) -> f64;
    fn abs(self) -> Self;
    fn is_finite(self) -> bool;

    #[inline]
    fn min(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }

    /// Fixed-point text for readout labels.
    fn display(self) -> String {
        format!("{:.*}", Self::DISPLAY_DECIMALS, self)
    }

    /// Parse user-entered text. Rejects anything that is not a finite number.
    fn parse_input(text: &str) -> crate::Result<Self> {
        text.trim()
            .parse::<Self>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CoreError::InvalidNumericInput {
                input: text.to_string(),
            })
    }
}

impl Real for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;
    const EPSILON: Self = f32::EPSILON;
    const DISPLAY_DECIMALS: usize = 7;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Real for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;
    const EPSILON: Self = f64::EPSILON;
    const DISPLAY_DECIMALS: usize = 12;

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v as f64
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}
