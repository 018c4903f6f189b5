use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Whether the polygon winds clockwise.
#[must_use]
pub fn is_clockwise(points: &[Point2]) -> bool {
    signed_area_2d(points) < 0.0
}

/// Whether a closed polygon is simple (no self-intersection).
///
/// Non-adjacent edges must not cross or touch; zero-length edges and
/// colinear overlaps of non-adjacent edges count as self-intersection.
#[must_use]
pub fn is_simple_polygon(points: &[Point2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        if (points[(i + 1) % n] - points[i]).norm() < TOLERANCE {
            return false;
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent edges share a vertex by construction.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a0, a1) = (points[i], points[(i + 1) % n]);
            let (b0, b1) = (points[j], points[(j + 1) % n]);
            if segments_touch(&a0, &a1, &b0, &b1) {
                return false;
            }
        }
    }
    true
}

/// Whether two segments cross, touch, or overlap colinearly.
fn segments_touch(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    if segment_segment_intersect_2d(a0, a1, b0, b1).is_some() {
        return true;
    }

    // Parallel case: colinear overlap.
    let eps = TOLERANCE * 100.0;
    let da = a1 - a0;
    let len_a = da.norm();
    if len_a < TOLERANCE {
        return false;
    }
    let dir = da / len_a;
    let off_b0 = (dir.x * (b0.y - a0.y) - dir.y * (b0.x - a0.x)).abs();
    let off_b1 = (dir.x * (b1.y - a0.y) - dir.y * (b1.x - a0.x)).abs();
    if off_b0 > eps || off_b1 > eps {
        return false;
    }
    let t0 = (b0 - a0).dot(&dir);
    let t1 = (b1 - a0).dot(&dir);
    let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
    hi >= -eps && lo <= len_a + eps
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
///
/// For a clockwise reference polygon this is the outward normal of an edge.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_ccw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let area = signed_area_2d(&pts);
        assert!((area - 1.0).abs() < TOLERANCE);
        assert!(!is_clockwise(&pts));
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
        assert!(is_clockwise(&pts));
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point2::new(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn simple_convex_polygon() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 3.0),
            Point2::new(0.0, 3.0),
        ];
        assert!(is_simple_polygon(&pts));
    }

    #[test]
    fn simple_concave_polygon() {
        // U shape.
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(7.0, 0.0),
            Point2::new(7.0, 9.0),
            Point2::new(3.0, 9.0),
            Point2::new(3.0, 0.0),
        ];
        assert!(is_simple_polygon(&pts));
    }

    #[test]
    fn bowtie_is_not_simple() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(!is_simple_polygon(&pts));
    }

    #[test]
    fn touching_edges_are_not_simple() {
        // A spike whose tip lands on the opposite edge.
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(!is_simple_polygon(&pts));
    }

    #[test]
    fn zero_length_edge_is_not_simple() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(!is_simple_polygon(&pts));
    }

    #[test]
    fn segment_direction_basic() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        let dir = segment_direction(&a, &b).unwrap();
        assert!((dir.x - 0.6).abs() < TOLERANCE);
        assert!((dir.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &b).is_err());
    }

    #[test]
    fn left_normal_basic() {
        let dir = Vector2::new(1.0, 0.0);
        let n = left_normal(&dir);
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }
}
