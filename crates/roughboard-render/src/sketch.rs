//! Turning resolved rectangles into drawable sketch operations.

use crate::hachure::{HACHURE_ANGLE, hachure_gap, hachure_lines};
use crate::rough::apply_hand_drawn_effect;
use kurbo::{BezPath, Line, Rect, RoundedRect, Shape};
use peniko::Color;
use roughboard_core::render::{ResolvedStyle, RoughBackend};
use roughboard_core::shapes::FillStyle;

/// Path flattening tolerance in world units.
const TOLERANCE: f64 = 0.1;

/// Pass index of the first hachure line; lower indices belong to outlines.
const HACHURE_PASS_BASE: u32 = 16;

/// One paint operation, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchOp {
    Fill {
        path: BezPath,
        color: Color,
    },
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        /// On/off dash lengths; empty for continuous.
        dash: Vec<f64>,
    },
}

/// Everything needed to paint one shape, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    pub ops: Vec<SketchOp>,
}

impl Sketch {
    pub fn strokes(&self) -> impl Iterator<Item = &SketchOp> {
        self.ops.iter().filter(|op| matches!(op, SketchOp::Stroke { .. }))
    }

    pub fn fills(&self) -> impl Iterator<Item = &SketchOp> {
        self.ops.iter().filter(|op| matches!(op, SketchOp::Fill { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Clean outline of a rectangle with optional rounded corners.
pub fn outline_path(rect: Rect, corner_radius: f64) -> BezPath {
    let rect = rect.abs();
    if corner_radius > 0.0 {
        RoundedRect::from_rect(rect, corner_radius).to_path(TOLERANCE)
    } else {
        rect.to_path(TOLERANCE)
    }
}

fn line_path(line: Line) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(line.p0);
    path.line_to(line.p1);
    path
}

/// Sketch a rectangle: fill first, then a double hand-drawn outline.
pub fn sketch_rectangle(rect: Rect, style: &ResolvedStyle) -> Sketch {
    let mut sketch = Sketch::default();
    let opacity = style.opacity as f32;
    let outline = outline_path(rect, style.corner_radius);

    if style.has_fill() {
        let color = Color::from(style.fill).multiply_alpha(opacity);
        match style.fill_style {
            FillStyle::Solid => {
                sketch.ops.push(SketchOp::Fill {
                    path: apply_hand_drawn_effect(&outline, style.roughness * 0.3, style.seed, 0),
                    color,
                });
            }
            FillStyle::Hachure | FillStyle::CrossHatch => {
                let gap = hachure_gap(style.stroke_width);
                let mut lines = hachure_lines(rect, HACHURE_ANGLE, gap);
                if style.fill_style == FillStyle::CrossHatch {
                    lines.extend(hachure_lines(rect, HACHURE_ANGLE + 90.0, gap));
                }
                for (i, line) in lines.into_iter().enumerate() {
                    let pass = HACHURE_PASS_BASE.wrapping_add(i as u32);
                    sketch.ops.push(SketchOp::Stroke {
                        path: apply_hand_drawn_effect(&line_path(line), style.roughness, style.seed, pass),
                        color,
                        width: style.stroke_width / 2.0,
                        dash: Vec::new(),
                    });
                }
            }
        }
    }

    if style.has_stroke() {
        let color = Color::from(style.stroke).multiply_alpha(opacity);
        // Hand-drawn outlines are traced twice with independent jitter
        let passes = if style.roughness > 0.0 { 2 } else { 1 };
        for pass in 0..passes {
            sketch.ops.push(SketchOp::Stroke {
                path: apply_hand_drawn_effect(&outline, style.roughness, style.seed, pass),
                color,
                width: style.stroke_width,
                dash: style.stroke_line_dash.clone(),
            });
        }
    }

    sketch
}

/// A [`RoughBackend`] that collects sketches instead of painting them.
#[derive(Debug, Clone, Default)]
pub struct SketchRecorder {
    pub sketches: Vec<Sketch>,
}

impl SketchRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoughBackend for SketchRecorder {
    fn rectangle(&mut self, rect: Rect, style: &ResolvedStyle) {
        self.sketches.push(sketch_rectangle(rect, style));
    }
}
