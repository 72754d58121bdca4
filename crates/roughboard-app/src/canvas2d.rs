//! Canvas 2D surface.

use crate::error::{AppError, AppResult};
use crate::paint::{PaintTarget, paint_sketch};
use kurbo::{Affine, Point, Rect};
use roughboard_core::shapes::SerializableColor;
use roughboard_core::{ResolvedStyle, RoughBackend, Surface};
use roughboard_render::sketch_rectangle;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Paints engine frames onto a `<canvas>` through its 2D context.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> AppResult<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(AppError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AppError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    fn reset_transform(&self) {
        if let Err(err) = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0) {
            log::warn!("Failed to reset canvas transform: {err:?}");
        }
    }
}

impl RoughBackend for Canvas2dSurface {
    fn rectangle(&mut self, rect: Rect, style: &ResolvedStyle) {
        let sketch = sketch_rectangle(rect, style);
        paint_sketch(&sketch, self);
    }
}

impl Surface for Canvas2dSurface {
    fn clear(&mut self) {
        self.reset_transform();
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        if let Err(err) = self.ctx.set_transform(a, b, c, d, e, f) {
            log::warn!("Failed to set canvas transform: {err:?}");
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: SerializableColor, line_width: f64) {
        self.ctx.set_line_dash(&js_sys::Array::new()).ok();
        self.ctx.set_stroke_style_str(&crate::paint::css_color(color.into()));
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }
}

impl PaintTarget for Canvas2dSurface {
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn quad_to(&mut self, c: Point, p: Point) {
        self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y);
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke(&mut self, color: &str, width: f64, dash: &[f64]) {
        let segments: js_sys::Array = dash.iter().map(|d| JsValue::from_f64(*d)).collect();
        if let Err(err) = self.ctx.set_line_dash(&segments) {
            log::warn!("Failed to set line dash: {err:?}");
        }
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.stroke();
    }
}
