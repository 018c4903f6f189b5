use crate::error::{OperationError, Result};
use crate::math::polygon_2d::{is_clockwise, is_simple_polygon};
use crate::math::{Point2, TOLERANCE};
use crate::model::Model;
use crate::topology::{
    AssemblyId, ConstructedBy, CornerData, CornerId, PerimeterData, PerimeterId, ReferenceSide,
    StoreyId, WallData, WallId,
};

/// Creates a closed perimeter from a boundary polygon.
///
/// Allocates N walls and N corners in cyclic linkage, one wall per boundary
/// edge, all with the same assembly and thickness. The boundary winding is
/// normalized to clockwise; a self-intersecting boundary is rejected.
#[derive(Debug)]
pub struct AddPerimeter {
    storey: StoreyId,
    boundary: Vec<Point2>,
    assembly: AssemblyId,
    thickness: f64,
    ring_beams: Vec<AssemblyId>,
    reference_side: ReferenceSide,
}

impl AddPerimeter {
    /// Creates a new `AddPerimeter` operation with the inside reference side
    /// and no ring beams.
    #[must_use]
    pub fn new(storey: StoreyId, boundary: Vec<Point2>, assembly: AssemblyId, thickness: f64) -> Self {
        Self {
            storey,
            boundary,
            assembly,
            thickness,
            ring_beams: Vec::new(),
            reference_side: ReferenceSide::Inside,
        }
    }

    /// Sets the ring-beam assemblies carried by every wall.
    #[must_use]
    pub fn with_ring_beams(mut self, ring_beams: Vec<AssemblyId>) -> Self {
        self.ring_beams = ring_beams;
        self
    }

    /// Sets which side the boundary polygon describes.
    #[must_use]
    pub fn with_reference_side(mut self, side: ReferenceSide) -> Self {
        self.reference_side = side;
        self
    }

    /// Executes the operation, returning the new perimeter's ID, or `None`
    /// if the boundary is self-intersecting.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for fewer than 3 boundary
    /// points, a non-positive thickness, or consecutive duplicate points.
    pub fn execute(&self, model: &mut Model) -> Result<Option<PerimeterId>> {
        if self.boundary.len() < 3 {
            return Err(OperationError::InvalidInput(
                "perimeter boundary requires at least 3 points".into(),
            )
            .into());
        }
        if self.thickness <= TOLERANCE {
            return Err(
                OperationError::InvalidInput("wall thickness must be positive".into()).into(),
            );
        }
        let n = self.boundary.len();
        for i in 0..n {
            if ((self.boundary[(i + 1) % n]) - self.boundary[i]).norm() < TOLERANCE {
                return Err(OperationError::InvalidInput(
                    "perimeter boundary contains a zero-length edge".into(),
                )
                .into());
            }
        }

        let mut boundary = self.boundary.clone();
        if !is_clockwise(&boundary) {
            boundary.reverse();
        }
        if !is_simple_polygon(&boundary) {
            return Ok(None);
        }

        let pid = model.store.add_perimeter(PerimeterData {
            storey: self.storey,
            reference_side: self.reference_side,
            wall_ids: Vec::new(),
            corner_ids: Vec::new(),
        });

        // Corners first with placeholder wall links, walls next, link-up last.
        let corner_ids: Vec<CornerId> = boundary
            .iter()
            .map(|&point| {
                model.store.add_corner(CornerData {
                    perimeter: pid,
                    previous_wall: WallId::default(),
                    next_wall: WallId::default(),
                    reference_point: point,
                    constructed_by: ConstructedBy::PreviousWall,
                })
            })
            .collect();
        let wall_ids: Vec<WallId> = (0..n)
            .map(|i| {
                model.store.add_wall(WallData {
                    perimeter: pid,
                    start_corner: corner_ids[i],
                    end_corner: corner_ids[(i + 1) % n],
                    thickness: self.thickness,
                    assembly: self.assembly,
                    entity_ids: Vec::new(),
                    ring_beams: self.ring_beams.clone(),
                })
            })
            .collect();
        for i in 0..n {
            let corner = model.store.corner_mut(corner_ids[i])?;
            corner.previous_wall = wall_ids[(i + n - 1) % n];
            corner.next_wall = wall_ids[i];
        }
        let per = model.store.perimeter_mut(pid)?;
        per.wall_ids = wall_ids;
        per.corner_ids = corner_ids;

        model.rederive(pid)?;
        Ok(Some(pid))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::test_support::assert_model_invariants;

    #[test]
    fn rectangle_scenario() {
        let mut model = Model::new();
        let boundary = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10000.0, 0.0),
            Point2::new(10000.0, 5000.0),
            Point2::new(0.0, 5000.0),
        ];
        let pid = AddPerimeter::new(StoreyId(1), boundary, AssemblyId(3), 420.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        let per = model.perimeter(pid).unwrap();
        assert_eq!(per.wall_ids.len(), 4);
        assert_eq!(per.corner_ids.len(), 4);
        for &corner_id in &per.corner_ids {
            let geometry = model.corner_geometry(corner_id).unwrap();
            assert_eq!(geometry.interior_angle, 90);
            assert_eq!(geometry.exterior_angle, 270);
        }
        assert_model_invariants(&model);
    }

    #[test]
    fn winding_is_normalized_to_clockwise() {
        let mut model = Model::new();
        // Counter-clockwise input.
        let boundary = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10000.0, 0.0),
            Point2::new(10000.0, 5000.0),
            Point2::new(0.0, 5000.0),
        ];
        let pid = AddPerimeter::new(StoreyId(1), boundary, AssemblyId(3), 420.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();
        let geometry = model.perimeter_geometry(pid).unwrap();
        assert!(crate::math::polygon_2d::is_clockwise(&geometry.inner_polygon));
        // Outer polygon surrounds the reference rectangle.
        let outer_area =
            crate::math::polygon_2d::signed_area_2d(&geometry.outer_polygon).abs();
        assert_relative_eq!(outer_area, 10840.0 * 5840.0, epsilon = 1e-3);
    }

    #[test]
    fn self_intersecting_boundary_is_rejected() {
        let mut model = Model::new();
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 1000.0),
            Point2::new(1000.0, 0.0),
            Point2::new(0.0, 1000.0),
        ];
        let result = AddPerimeter::new(StoreyId(1), bowtie, AssemblyId(3), 420.0)
            .execute(&mut model)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(model.store().perimeter_ids().count(), 0);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let mut model = Model::new();
        let two_points = vec![Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0)];
        assert!(AddPerimeter::new(StoreyId(1), two_points, AssemblyId(3), 420.0)
            .execute(&mut model)
            .is_err());

        let triangle = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            Point2::new(0.0, 1000.0),
        ];
        assert!(
            AddPerimeter::new(StoreyId(1), triangle.clone(), AssemblyId(3), 0.0)
                .execute(&mut model)
                .is_err()
        );
        assert!(
            AddPerimeter::new(StoreyId(1), triangle, AssemblyId(3), -5.0)
                .execute(&mut model)
                .is_err()
        );
    }
}
