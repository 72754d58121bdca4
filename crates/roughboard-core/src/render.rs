//! Rendering seams between the engine and its host.
//!
//! The engine never rasterizes anything itself. Drawables hand a geometric
//! primitive plus a [`ResolvedStyle`] to a [`RoughBackend`]; the engine's frame
//! pass drives a [`Surface`], which is a backend that can also clear, set the
//! current transform and stroke plain overlay rectangles.

use crate::shapes::{FillStyle, SerializableColor, ShapeStyle};
use kurbo::{Affine, Rect};

/// Style handed to the hand-drawn backend, with every enum already mapped to
/// the numbers the backend draws with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Fill color; fully transparent when the shape has no background.
    pub fill: SerializableColor,
    pub fill_style: FillStyle,
    /// Outline color; fully transparent when the shape has no stroke.
    pub stroke: SerializableColor,
    /// On/off dash lengths; empty for a continuous outline.
    pub stroke_line_dash: Vec<f64>,
    pub stroke_width: f64,
    /// Jitter magnitude (0 = clean lines).
    pub roughness: f64,
    pub corner_radius: f64,
    /// Clamped to `[0, 1]`.
    pub opacity: f64,
    /// Fixed per-object seed for the hand-drawn jitter.
    pub seed: u32,
}

impl ResolvedStyle {
    /// Resolve a shape style for drawing.
    pub fn resolve(style: &ShapeStyle, seed: u32, corner_radius: f64) -> Self {
        let opacity = if style.opacity.is_nan() {
            1.0
        } else {
            style.opacity.clamp(0.0, 1.0)
        };
        Self {
            fill: style.background.unwrap_or(SerializableColor::transparent()),
            fill_style: style.fill_style,
            stroke: style.stroke.unwrap_or(SerializableColor::transparent()),
            stroke_line_dash: style.stroke_style.dash_pattern(),
            stroke_width: style.stroke_width.value(),
            roughness: style.sloppiness.roughness(),
            corner_radius,
            opacity,
            seed,
        }
    }

    pub fn has_fill(&self) -> bool {
        self.fill.a > 0
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke.a > 0 && self.stroke_width > 0.0
    }
}

/// The hand-drawn rendering service.
pub trait RoughBackend {
    /// Draw a rectangle given in the current (world) transform.
    fn rectangle(&mut self, rect: Rect, style: &ResolvedStyle);
}

/// A drawing target the engine paints a frame onto.
pub trait Surface: RoughBackend {
    /// Clear every pixel, regardless of the current transform.
    fn clear(&mut self);

    /// Replace the current transform (user space → backing-store pixels).
    fn set_transform(&mut self, transform: Affine);

    /// Stroke a plain, non-sketchy rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: SerializableColor, line_width: f64);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetTransform(Affine),
    Rectangle { rect: Rect, style: ResolvedStyle },
    StrokeRect { rect: Rect, color: SerializableColor, line_width: f64 },
}

/// A surface that records calls instead of drawing.
///
/// Useful for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Clear` calls, i.e. painted frames.
    pub fn clear_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    /// Rectangles submitted to the backend, in order.
    pub fn rectangles(&self) -> Vec<(Rect, &ResolvedStyle)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rectangle { rect, style } => Some((*rect, style)),
                _ => None,
            })
            .collect()
    }

    /// Overlay outlines, in order.
    pub fn outlines(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl RoughBackend for RecordingSurface {
    fn rectangle(&mut self, rect: Rect, style: &ResolvedStyle) {
        self.commands.push(DrawCommand::Rectangle {
            rect,
            style: style.clone(),
        });
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn stroke_rect(&mut self, rect: Rect, color: SerializableColor, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }
}
