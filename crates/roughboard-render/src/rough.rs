//! Seeded jitter for hand-drawn paths.

use kurbo::{BezPath, PathEl, Point};

/// Simple seeded random number generator (xorshift32).
/// Used for deterministic hand-drawn effects.
#[derive(Debug, Clone)]
pub struct SketchRng {
    state: u32,
}

impl SketchRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [-1, 1]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Random offset scaled by amount
    pub fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }

    fn jitter(&mut self, p: Point, amount: f64) -> Point {
        Point::new(p.x + self.offset(amount), p.y + self.offset(amount))
    }
}

/// Seed for one pass over a shape. Different passes get unrelated sequences.
pub fn pass_seed(seed: u32, pass: u32) -> u32 {
    seed.wrapping_add(pass.wrapping_mul(99991))
}

/// Roughen a path the way a hand would draw it.
///
/// End points are offset (lines overshoot at corners) and straight segments
/// bow slightly around their midpoint. `roughness` 0 returns the path as is.
/// `pass` selects an independent random sequence for multi-stroke outlines.
pub fn apply_hand_drawn_effect(path: &BezPath, roughness: f64, seed: u32, pass: u32) -> BezPath {
    if roughness <= 0.0 {
        return path.clone();
    }

    let max_randomness_offset = roughness * 2.0;
    let bowing = roughness;
    let mut rng = SketchRng::new(pass_seed(seed, pass));

    let mut result = BezPath::new();
    let mut last_point = Point::ZERO;
    let mut subpath_start = Point::ZERO;

    let bowed_line = |rng: &mut SketchRng, result: &mut BezPath, from: Point, to: Point| {
        let d = to - from;
        let len = d.hypot();
        let bow = rng.offset(bowing * roughness * len / 200.0);
        let perp = if len > 0.001 {
            kurbo::Vec2::new(-d.y / len, d.x / len)
        } else {
            kurbo::Vec2::ZERO
        };
        let control = from.midpoint(to) + perp * bow;
        result.quad_to(control, rng.jitter(to, max_randomness_offset));
    };

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(rng.jitter(p, max_randomness_offset));
                last_point = p;
                subpath_start = p;
            }
            PathEl::LineTo(p) => {
                bowed_line(&mut rng, &mut result, last_point, p);
                last_point = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(
                    rng.jitter(p1, max_randomness_offset * 0.7),
                    rng.jitter(p2, max_randomness_offset),
                );
                last_point = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    rng.jitter(p1, max_randomness_offset * 0.5),
                    rng.jitter(p2, max_randomness_offset * 0.5),
                    rng.jitter(p3, max_randomness_offset),
                );
                last_point = p3;
            }
            PathEl::ClosePath => {
                // Draw the closing edge by hand so the corner can overshoot
                if last_point != subpath_start {
                    bowed_line(&mut rng, &mut result, last_point, subpath_start);
                }
                last_point = subpath_start;
            }
        }
    }

    result
}
