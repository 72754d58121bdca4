//! Small vector helpers on top of kurbo's `Point`/`Vec2`.
//!
//! Points are positions, vectors are displacements. Everything is a value
//! type; nothing here mutates its inputs.

pub use kurbo::{Point, Vec2};

/// Build a vector.
#[inline]
pub fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Translate a point.
#[inline]
pub fn add(point: Point, delta: Vec2) -> Point {
    point + delta
}

/// Displacement from `b` to `a`.
#[inline]
pub fn sub(a: Point, b: Point) -> Vec2 {
    a - b
}

#[inline]
pub fn mul_scalar(v: Vec2, scalar: f64) -> Vec2 {
    v * scalar
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Component-wise absolute displacement between two points.
#[inline]
pub fn abs_delta(a: Point, b: Point) -> Vec2 {
    Vec2::new((a.x - b.x).abs(), (a.y - b.y).abs())
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_sub() {
        let p = add(Point::new(1.0, 2.0), vec2(3.0, -1.0));
        assert_eq!(p, Point::new(4.0, 1.0));
        assert_eq!(sub(p, Point::new(1.0, 2.0)), vec2(3.0, -1.0));
    }

    #[test]
    fn test_mul_scalar() {
        assert_eq!(mul_scalar(vec2(2.0, -3.0), -1.0), vec2(-2.0, 3.0));
    }

    #[test]
    fn test_distance() {
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < f64::EPSILON);
        assert!(distance(Point::new(2.0, 2.0), Point::new(2.0, 2.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_abs_delta() {
        assert_eq!(abs_delta(Point::new(0.0, 10.0), Point::new(5.0, 4.0)), vec2(5.0, 6.0));
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(1.23456, 2) - 1.23).abs() < 1e-12);
        assert!((round_to(1.1 * 1.1, 2) - 1.21).abs() < 1e-12);
    }
}
