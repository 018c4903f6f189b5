use crate::error::{Result, TopologyError};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::{left_normal, segment_direction};
use crate::math::{midpoint, Point2, Vector2, TOLERANCE};
use crate::topology::{
    CornerId, EntityId, PerimeterId, PerimeterStore, ReferenceSide, WallId,
};

use super::{CornerGeometry, EntityGeometry, PerimeterGeometry, WallGeometry};

/// Complete derived geometry of one perimeter, produced in a single pass.
///
/// Pure value output of [`derive_perimeter`]; the model swaps it into the
/// cache atomically so readers never see a partial derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPerimeter {
    pub perimeter: PerimeterGeometry,
    pub walls: Vec<(WallId, WallGeometry)>,
    pub corners: Vec<(CornerId, CornerGeometry)>,
    pub entities: Vec<(EntityId, EntityGeometry)>,
}

/// Per-wall offset-line frame, relative to the reference edge.
struct WallFrame {
    ref_start: Point2,
    ref_end: Point2,
    dir: Vector2,
    thickness: f64,
    /// Offset from a reference point to the inside line.
    off_in: Vector2,
    /// Offset from a reference point to the outside line.
    off_out: Vector2,
}

impl WallFrame {
    fn inside_origin(&self) -> Point2 {
        self.ref_start + self.off_in
    }

    fn outside_origin(&self) -> Point2 {
        self.ref_start + self.off_out
    }
}

/// Recomputes all derived geometry for one perimeter from its current
/// topology, reference-side flag, and wall thicknesses.
///
/// # Errors
///
/// Returns `TopologyError::InvalidTopology` if the perimeter's parallel ID
/// arrays are malformed, and `GeometryError::Degenerate` for zero-length
/// reference edges. Both indicate corrupted topology; validated edits never
/// produce them.
pub fn derive_perimeter(store: &PerimeterStore, id: PerimeterId) -> Result<DerivedPerimeter> {
    let per = store.perimeter(id)?;
    let n = per.corner_ids.len();
    if n < 3 || per.wall_ids.len() != n {
        return Err(TopologyError::InvalidTopology(format!(
            "perimeter has {} walls and {} corners",
            per.wall_ids.len(),
            n
        ))
        .into());
    }

    let mut refs = Vec::with_capacity(n);
    for &corner_id in &per.corner_ids {
        refs.push(store.corner(corner_id)?.reference_point);
    }

    let side = per.reference_side;
    let mut frames = Vec::with_capacity(n);
    for i in 0..n {
        let ref_start = refs[i];
        let ref_end = refs[(i + 1) % n];
        let dir = segment_direction(&ref_start, &ref_end)?;
        let thickness = store.wall(per.wall_ids[i])?.thickness;
        // With clockwise winding the left normal points outward.
        let out = left_normal(&dir);
        let (off_in, off_out) = match side {
            ReferenceSide::Inside => (Vector2::zeros(), out * thickness),
            ReferenceSide::Outside => (-out * thickness, Vector2::zeros()),
        };
        frames.push(WallFrame {
            ref_start,
            ref_end,
            dir,
            thickness,
            off_in,
            off_out,
        });
    }

    // Corner points: the reference-side point is the reference point itself;
    // the other side is the mitre intersection of the adjacent offset lines.
    let mut inside_points = Vec::with_capacity(n);
    let mut outside_points = Vec::with_capacity(n);
    let mut angles = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &frames[(i + n - 1) % n];
        let next = &frames[i];
        let (inside, outside) = corner_points(side, &refs[i], prev, next);
        inside_points.push(inside);
        outside_points.push(outside);
        angles.push(corner_angles(
            &refs[(i + n - 1) % n],
            &refs[i],
            &refs[(i + 1) % n],
        ));
    }

    let mut walls = Vec::with_capacity(n);
    let mut entities = Vec::new();
    for i in 0..n {
        let frame = &frames[i];
        let j = (i + 1) % n;
        let mid = midpoint(&frame.ref_start, &frame.ref_end);

        // Each endpoint, independently per side, is whichever of the
        // unmitred boundary projection and the corner mitre point lies
        // closer to the wall's own midpoint. This keeps wall polygons
        // from overlapping themselves at sharp or reflex corners.
        let start_in = closer_to(frame.inside_origin(), inside_points[i], &mid);
        let end_in = closer_to(frame.ref_end + frame.off_in, inside_points[j], &mid);
        let start_out = closer_to(frame.outside_origin(), outside_points[i], &mid);
        let end_out = closer_to(frame.ref_end + frame.off_out, outside_points[j], &mid);

        let inside_length = (end_in - start_in).norm();
        let outside_length = (end_out - start_out).norm();
        let outside_direction = if outside_length < TOLERANCE {
            frame.dir
        } else {
            (end_out - start_out) / outside_length
        };

        let wall_id = per.wall_ids[i];
        let geometry = WallGeometry {
            inside_line: [start_in, end_in],
            outside_line: [start_out, end_out],
            wall_length: inside_length,
            inside_length,
            outside_length,
            direction: frame.dir,
            outside_direction,
            polygon: vec![start_in, end_in, end_out, start_out],
        };

        let wall = store.wall(wall_id)?;
        let across = frame.off_out - frame.off_in;
        for &entity_id in &wall.entity_ids {
            let entity = store.entity(entity_id)?;
            let (s0, s1) = entity.span();
            let in0 = point_at(&start_in, &frame.dir, s0);
            let in1 = point_at(&start_in, &frame.dir, s1);
            let out0 = in0 + across;
            let out1 = in1 + across;
            let center = Point2::from((in0.coords + in1.coords + out0.coords + out1.coords) / 4.0);
            entities.push((
                entity_id,
                EntityGeometry {
                    inside_line: [in0, in1],
                    outside_line: [out0, out1],
                    polygon: vec![in0, in1, out1, out0],
                    center,
                },
            ));
        }

        walls.push((wall_id, geometry));
    }

    // Corner polygons fill the gap between adjacent trimmed wall quads.
    let mut corners = Vec::with_capacity(n);
    for i in 0..n {
        let prev_geometry = &walls[(i + n - 1) % n].1;
        let next_geometry = &walls[i].1;
        let (ref_point, derived_point, prev_end, next_start) = match side {
            ReferenceSide::Inside => (
                inside_points[i],
                outside_points[i],
                prev_geometry.outside_line[1],
                next_geometry.outside_line[0],
            ),
            ReferenceSide::Outside => (
                outside_points[i],
                inside_points[i],
                prev_geometry.inside_line[1],
                next_geometry.inside_line[0],
            ),
        };
        let mut polygon = dedup_ring(vec![ref_point, prev_end, derived_point, next_start]);
        if polygon.len() < 3 {
            polygon = Vec::new();
        }
        let (interior_angle, exterior_angle) = angles[i];
        corners.push((
            per.corner_ids[i],
            CornerGeometry {
                inside_point: inside_points[i],
                outside_point: outside_points[i],
                interior_angle,
                exterior_angle,
                polygon,
            },
        ));
    }

    Ok(DerivedPerimeter {
        perimeter: PerimeterGeometry {
            inner_polygon: inside_points,
            outer_polygon: outside_points,
        },
        walls,
        corners,
        entities,
    })
}

/// Inside and outside points of one corner.
///
/// The derived-side point is the intersection of the adjacent walls' offset
/// lines; colinear walls have no intersection, so the reference point is
/// projected by `max` thickness outward or `min` thickness inward instead.
fn corner_points(
    side: ReferenceSide,
    reference: &Point2,
    prev: &WallFrame,
    next: &WallFrame,
) -> (Point2, Point2) {
    let out = left_normal(&next.dir);
    match side {
        ReferenceSide::Inside => {
            let outside = line_line_intersect_2d(
                &prev.outside_origin(),
                &prev.dir,
                &next.outside_origin(),
                &next.dir,
            )
            .map_or_else(
                || reference + out * prev.thickness.max(next.thickness),
                |(t, _)| point_at(&prev.outside_origin(), &prev.dir, t),
            );
            (*reference, outside)
        }
        ReferenceSide::Outside => {
            let inside = line_line_intersect_2d(
                &prev.inside_origin(),
                &prev.dir,
                &next.inside_origin(),
                &next.dir,
            )
            .map_or_else(
                || reference - out * prev.thickness.min(next.thickness),
                |(t, _)| point_at(&prev.inside_origin(), &prev.dir, t),
            );
            (inside, *reference)
        }
    }
}

/// Interior and exterior angle of a corner in rounded integer degrees.
///
/// The sign of the cross product of the corner-to-neighbour vectors
/// distinguishes convex (≤ 180°) from reflex (> 180°) corners.
#[allow(clippy::cast_possible_truncation)]
fn corner_angles(prev_ref: &Point2, reference: &Point2, next_ref: &Point2) -> (i32, i32) {
    let v_prev = prev_ref - reference;
    let v_next = next_ref - reference;
    let dot = v_prev.dot(&v_next);
    let cross = v_prev.x * v_next.y - v_prev.y * v_next.x;
    let raw = (dot / (v_prev.norm() * v_next.norm()))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees();
    let interior = if cross >= 0.0 { raw } else { 360.0 - raw };
    let interior = interior.round() as i32;
    (interior, 360 - interior)
}

fn closer_to(a: Point2, b: Point2, mid: &Point2) -> Point2 {
    if (a - mid).norm_squared() <= (b - mid).norm_squared() {
        a
    } else {
        b
    }
}

/// Removes cyclically-consecutive duplicate points.
fn dedup_ring(points: Vec<Point2>) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out
            .last()
            .is_some_and(|q| (p - q).norm_squared() < TOLERANCE)
        {
            continue;
        }
        out.push(p);
    }
    while out.len() > 1 {
        let first = out[0];
        let last = out[out.len() - 1];
        if (first - last).norm_squared() < TOLERANCE {
            out.pop();
        } else {
            break;
        }
    }
    out
}
