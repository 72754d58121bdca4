//! Painting sketches onto an immediate-mode 2D context.

use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use roughboard_render::{Sketch, SketchOp};

/// The subset of a 2D context the shell paints with.
pub trait PaintTarget {
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quad_to(&mut self, c: Point, p: Point);
    fn curve_to(&mut self, c1: Point, c2: Point, p: Point);
    fn close_path(&mut self);
    fn fill(&mut self, color: &str);
    fn stroke(&mut self, color: &str, width: f64, dash: &[f64]);
}

/// CSS `rgba()` string for a color.
pub fn css_color(color: Color) -> String {
    let c = color.to_rgba8();
    let alpha = (f64::from(c.a) / 255.0 * 1000.0).round() / 1000.0;
    format!("rgba({}, {}, {}, {alpha})", c.r, c.g, c.b)
}

/// Replay a path as context path commands.
pub fn trace_path<T: PaintTarget + ?Sized>(path: &BezPath, target: &mut T) {
    target.begin_path();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => target.move_to(p),
            PathEl::LineTo(p) => target.line_to(p),
            PathEl::QuadTo(c, p) => target.quad_to(c, p),
            PathEl::CurveTo(c1, c2, p) => target.curve_to(c1, c2, p),
            PathEl::ClosePath => target.close_path(),
        }
    }
}

/// Paint every operation of a sketch in order.
pub fn paint_sketch<T: PaintTarget + ?Sized>(sketch: &Sketch, target: &mut T) {
    for op in &sketch.ops {
        match op {
            SketchOp::Fill { path, color } => {
                trace_path(path, target);
                target.fill(&css_color(*color));
            }
            SketchOp::Stroke {
                path,
                color,
                width,
                dash,
            } => {
                trace_path(path, target);
                target.stroke(&css_color(*color), *width, dash);
            }
        }
    }
}
