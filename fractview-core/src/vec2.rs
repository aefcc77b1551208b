use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::real::Real;

/// A 2-component vector, used both for pixel positions (`Vec2<f32>`) and
/// fractal-plane points (`Vec2<f32>` or `Vec2<f64>` depending on precision).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Real> Vec2<T> {
    pub const ZERO: Self = Self {
        x: T::ZERO,
        y: T::ZERO,
    };

    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Convert to another precision by value.
    #[inline]
    pub fn cast<U: Real>(self) -> Vec2<U> {
        Vec2 {
            x: U::from_f64(self.x.to_f64()),
            y: U::from_f64(self.y.to_f64()),
        }
    }

    #[inline]
    pub fn to_array_f64(self) -> [f64; 2] {
        [self.x.to_f64(), self.y.to_f64()]
    }

    /// Largest per-component distance to `other`.
    #[inline]
    pub fn max_abs_diff(self, other: Self) -> T {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// -- Arithmetic operators --

impl<T: Real> Add for Vec2<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Real> AddAssign for Vec2<T> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Real> Sub for Vec2<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Real> SubAssign for Vec2<T> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Real> Mul<T> for Vec2<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl<T: Real> Neg for Vec2<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
