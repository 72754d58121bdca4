//! Hachure line generation for sketchy fills.

use kurbo::{Line, Point, Rect, Vec2};

/// Default hachure angle in degrees.
pub const HACHURE_ANGLE: f64 = -41.0;

/// Gap between hachure lines for a given outline width.
pub fn hachure_gap(stroke_width: f64) -> f64 {
    (stroke_width * 4.0).max(1.0)
}

/// Parallel lines at `angle_deg` spaced `gap` apart, clipped to `rect`.
pub fn hachure_lines(rect: Rect, angle_deg: f64, gap: f64) -> Vec<Line> {
    let rect = rect.abs();
    if rect.width() <= 0.0 || rect.height() <= 0.0 || gap <= 0.0 || !gap.is_finite() {
        return Vec::new();
    }

    let angle = angle_deg.to_radians();
    let dir = Vec2::new(angle.cos(), angle.sin());
    let normal = Vec2::new(-dir.y, dir.x);

    // Range of the rect along the normal
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let (lo, hi) = corners
        .iter()
        .map(|c| c.to_vec2().dot(normal))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
            (lo.min(t), hi.max(t))
        });

    let mut lines = Vec::new();
    let mut t = lo + gap / 2.0;
    while t < hi {
        let origin = (normal * t).to_point();
        if let Some(line) = clip_line(origin, dir, rect) {
            lines.push(line);
        }
        t += gap;
    }
    lines
}

/// Clip the infinite line `origin + s * dir` to `rect`.
fn clip_line(origin: Point, dir: Vec2, rect: Rect) -> Option<Line> {
    let mut s_min = f64::NEG_INFINITY;
    let mut s_max = f64::INFINITY;

    for (o, d, min, max) in [
        (origin.x, dir.x, rect.x0, rect.x1),
        (origin.y, dir.y, rect.y0, rect.y1),
    ] {
        if d.abs() < 1e-12 {
            if o < min || o > max {
                return None;
            }
            continue;
        }
        let a = (min - o) / d;
        let b = (max - o) / d;
        s_min = s_min.max(a.min(b));
        s_max = s_max.min(a.max(b));
    }

    (s_max - s_min > 1e-9).then(|| Line::new(origin + dir * s_min, origin + dir * s_max))
}
