//! Conversions between pixels, normalized device coordinates and the fractal plane.
//!
//! Pixel space has its origin at the top-left with y growing downward; the
//! fractal plane has y growing upward. Every conversion here applies that
//! inversion, so callers never flip y themselves.

use crate::real::Real;
use crate::vec2::Vec2;

/// Axis-aligned region of the fractal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Vec2<T>,
    pub max: Vec2<T>,
}

impl<T: Real> Bounds<T> {
    /// Region visible for a camera at `center` with the given side length.
    ///
    /// The side length is the vertical extent; the horizontal extent is
    /// stretched by `aspect` (width / height).
    pub fn around(center: Vec2<T>, side: T, aspect: T) -> Self {
        let half = side / T::TWO;
        Self {
            min: Vec2::new(center.x - half * aspect, center.y - half),
            max: Vec2::new(center.x + half * aspect, center.y + half),
        }
    }

    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2<T> {
        Vec2::new(
            (self.min.x + self.max.x) / T::TWO,
            (self.min.y + self.max.y) / T::TWO,
        )
    }
}

/// Width / height of the screen. Degenerate sizes (minimized window) yield 1.
#[inline]
pub fn aspect_ratio(size: Vec2<f32>) -> f32 {
    if size.x > 0.0 && size.y > 0.0 {
        size.x / size.y
    } else {
        1.0
    }
}

#[inline]
fn normalized(v: f32, extent: f32) -> f32 {
    if extent > 0.0 {
        v / extent
    } else {
        0.0
    }
}

/// Fractal-plane point under a pixel.
pub fn screen_to_fractal<T: Real>(pixel: Vec2<f32>, size: Vec2<f32>, bounds: &Bounds<T>) -> Vec2<T> {
    let nx = T::from_f32(normalized(pixel.x, size.x));
    let ny = T::from_f32(normalized(pixel.y, size.y));
    Vec2::new(
        bounds.min.x + nx * bounds.width(),
        bounds.max.y - ny * bounds.height(),
    )
}

/// Pixel position of a fractal-plane point. Inverse of [`screen_to_fractal`].
pub fn fractal_to_screen<T: Real>(point: Vec2<T>, size: Vec2<f32>, bounds: &Bounds<T>) -> Vec2<f64> {
    let w = bounds.width().to_f64();
    let h = bounds.height().to_f64();
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let nx = (point.x - bounds.min.x).to_f64() / w;
    let ny = (bounds.max.y - point.y).to_f64() / h;
    Vec2::new(nx * size.x as f64, ny * size.y as f64)
}

/// Pixel position to normalized device coordinates (`[-1, 1]`, y up).
pub fn pixel_to_ndc(pixel: Vec2<f32>, size: Vec2<f32>) -> Vec2<f32> {
    Vec2::new(
        normalized(pixel.x, size.x) * 2.0 - 1.0,
        1.0 - normalized(pixel.y, size.y) * 2.0,
    )
}

/// Rigid rotation of `point` about `pivot` by `degrees` (counter-clockwise).
///
/// This is the CPU twin of the shader's `applyRotation`. The angle stays
/// single precision in both paths.
pub fn rotate_about<T: Real>(point: Vec2<T>, pivot: Vec2<T>, degrees: f32) -> Vec2<T> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (s, c) = (T::from_f32(sin), T::from_f32(cos));
    let d = point - pivot;
    pivot + Vec2::new(d.x * c - d.y * s, d.x * s + d.y * c)
}
