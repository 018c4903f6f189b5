pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Coordinates are millimetres, so this is far below manufacturing
/// precision while staying well above f64 noise at building scale.
pub const TOLERANCE: f64 = 1e-9;

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::from((a.coords + b.coords) * 0.5)
}
