//! Slide-space rectangles used during interactive manipulation.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in un-scaled slide units.
///
/// Width and height are stored directly; `right()` and `bottom()` are derived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Frame {
    /// Create a new frame.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A frame covering a whole canvas of the given size.
    pub fn from_canvas(canvas: Size) -> Self {
        Self::new(0.0, 0.0, canvas.width, canvas.height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width divided by height, or `None` for a degenerate frame.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }

    /// Move the frame by `delta` without changing its size.
    pub fn translate(self, delta: Vec2) -> Self {
        Self {
            left: self.left + delta.x,
            top: self.top + delta.y,
            ..self
        }
    }
}

impl From<Rect> for Frame {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<Frame> for Rect {
    fn from(frame: Frame) -> Self {
        Rect::from_origin_size(frame.origin(), frame.size())
    }
}
