use crate::vec2::Vec2;

/// Rubber-band rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub active: bool,
    pub begin: Vec2<f32>,
    pub end: Vec2<f32>,
}

impl SelectionRect {
    pub fn start(&mut self, pixel: Vec2<f32>) {
        self.active = true;
        self.begin = pixel;
        self.end = pixel;
    }

    /// Move the free corner. Ignored when no selection is in progress.
    pub fn drag_to(&mut self, pixel: Vec2<f32>) {
        if self.active {
            self.end = pixel;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Normalized corners: `(top-left, bottom-right)` in pixel space.
    pub fn corners(&self) -> (Vec2<f32>, Vec2<f32>) {
        (
            Vec2::new(self.begin.x.min(self.end.x), self.begin.y.min(self.end.y)),
            Vec2::new(self.begin.x.max(self.end.x), self.begin.y.max(self.end.y)),
        )
    }

    pub fn width(&self) -> f32 {
        (self.end.x - self.begin.x).abs()
    }

    pub fn height(&self) -> f32 {
        (self.end.y - self.begin.y).abs()
    }

    pub fn is_large_enough(&self, min_px: f32) -> bool {
        self.width() >= min_px && self.height() >= min_px
    }
}
