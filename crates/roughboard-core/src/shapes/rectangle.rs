//! Rectangle shape.

use super::{Edges, ShapeId, ShapeStyle, ShapeTrait};
use crate::render::{ResolvedStyle, RoughBackend};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
    seed: u32,
}

impl Rectangle {
    /// Largest corner radius used for `Edges::Angle`.
    pub const DEFAULT_ADAPTIVE_RADIUS: f64 = 32.0;

    /// Create a new rectangle with the default style.
    pub fn new(id: ShapeId, seed: u32, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            position,
            width,
            height,
            style: ShapeStyle::default(),
            seed,
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Change the size, keeping the top-left corner.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Corner radius implied by the `edges` style.
    pub fn corner_radius(&self) -> f64 {
        match self.style.edges {
            Edges::Right => 0.0,
            Edges::Angle => (self.width.abs().min(self.height.abs()) / 4.0)
                .min(Self::DEFAULT_ADAPTIVE_RADIUS),
        }
    }

    /// Submit the rectangle to the hand-drawn backend.
    pub fn draw<B: RoughBackend + ?Sized>(&self, backend: &mut B) {
        let style = ResolvedStyle::resolve(&self.style, self.seed, self.corner_radius());
        backend.rectangle(self.as_rect(), &style);
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn seed(&self) -> u32 {
        self.seed
    }

    fn bounds(&self) -> Rect {
        self.as_rect().abs()
    }

    fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
