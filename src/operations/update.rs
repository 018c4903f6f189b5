//! Attribute and boundary updates that do not change the wall/corner count.

use crate::error::{OperationError, Result};
use crate::math::polygon_2d::{is_clockwise, is_simple_polygon};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::model::Model;
use crate::topology::{
    AssemblyId, ConstructedBy, CornerId, PerimeterId, ReferenceSide, WallId,
};

/// Sets a single wall's thickness and re-derives its perimeter.
#[derive(Debug)]
pub struct UpdateWallThickness {
    wall: WallId,
    thickness: f64,
}

impl UpdateWallThickness {
    #[must_use]
    pub fn new(wall: WallId, thickness: f64) -> Self {
        Self { wall, thickness }
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive thickness
    /// and `TopologyError::EntityNotFound` for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        if self.thickness <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "wall thickness must be positive, got {}",
                self.thickness
            ))
            .into());
        }
        let perimeter = model.store.wall(self.wall)?.perimeter;
        model.store.wall_mut(self.wall)?.thickness = self.thickness;
        model.rederive(perimeter)
    }
}

/// Sets every wall of a perimeter to the same thickness.
#[derive(Debug)]
pub struct UpdatePerimeterThickness {
    perimeter: PerimeterId,
    thickness: f64,
}

impl UpdatePerimeterThickness {
    #[must_use]
    pub fn new(perimeter: PerimeterId, thickness: f64) -> Self {
        Self { perimeter, thickness }
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive thickness
    /// and `TopologyError::EntityNotFound` for a dead perimeter ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        if self.thickness <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "wall thickness must be positive, got {}",
                self.thickness
            ))
            .into());
        }
        let wall_ids = model.store.perimeter(self.perimeter)?.wall_ids.clone();
        for wall_id in wall_ids {
            model.store.wall_mut(wall_id)?.thickness = self.thickness;
        }
        model.rederive(self.perimeter)
    }
}

/// Sets a wall's assembly. Pure attribute write, no geometry change.
#[derive(Debug)]
pub struct UpdateWallAssembly {
    wall: WallId,
    assembly: AssemblyId,
}

impl UpdateWallAssembly {
    #[must_use]
    pub fn new(wall: WallId, assembly: AssemblyId) -> Self {
        Self { wall, assembly }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        model.store.wall_mut(self.wall)?.assembly = self.assembly;
        Ok(())
    }
}

/// Replaces a wall's ring beam assemblies. Pure attribute write.
#[derive(Debug)]
pub struct UpdateWallRingBeams {
    wall: WallId,
    ring_beams: Vec<AssemblyId>,
}

impl UpdateWallRingBeams {
    #[must_use]
    pub fn new(wall: WallId, ring_beams: Vec<AssemblyId>) -> Self {
        Self { wall, ring_beams }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        model.store.wall_mut(self.wall)?.ring_beams = self.ring_beams.clone();
        Ok(())
    }
}

/// Reassigns which adjacent wall owns a corner's construction.
///
/// Ownership only matters for post placement: a post may reach into the
/// corner extension zone of the wall that constructs the corner. The switch
/// is refused while such a post exists, since it would be left outside its
/// wall's placement bounds.
#[derive(Debug)]
pub struct UpdateCornerConstructedBy {
    corner: CornerId,
    constructed_by: ConstructedBy,
}

impl UpdateCornerConstructedBy {
    #[must_use]
    pub fn new(corner: CornerId, constructed_by: ConstructedBy) -> Self {
        Self { corner, constructed_by }
    }

    /// Returns `Ok(false)` if the currently constructing wall has a post
    /// occupying the corner extension zone. Geometry is unaffected either
    /// way, so no re-derivation happens.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead corner ID.
    pub fn execute(&self, model: &mut Model) -> Result<bool> {
        let corner = model.store.corner(self.corner)?.clone();
        if corner.constructed_by == self.constructed_by {
            return Ok(true);
        }

        let owner = match corner.constructed_by {
            ConstructedBy::PreviousWall => corner.previous_wall,
            ConstructedBy::NextWall => corner.next_wall,
        };
        let wall_length = model.wall_geometry(owner)?.wall_length;
        for &entity_id in &model.store.wall(owner)?.entity_ids {
            let entity = model.store.entity(entity_id)?;
            if !entity.is_post() {
                continue;
            }
            let (start, end) = entity.span();
            let protrudes = match corner.constructed_by {
                // The corner sits at the owner's end or start respectively.
                ConstructedBy::PreviousWall => end > wall_length + TOLERANCE,
                ConstructedBy::NextWall => start < -TOLERANCE,
            };
            if protrudes {
                return Ok(false);
            }
        }

        model.store.corner_mut(self.corner)?.constructed_by = self.constructed_by;
        Ok(true)
    }
}

/// Translates a whole perimeter rigidly.
#[derive(Debug)]
pub struct MovePerimeter {
    perimeter: PerimeterId,
    offset: Vector2,
}

impl MovePerimeter {
    #[must_use]
    pub fn new(perimeter: PerimeterId, offset: Vector2) -> Self {
        Self { perimeter, offset }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead perimeter ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        let corner_ids = model.store.perimeter(self.perimeter)?.corner_ids.clone();
        for corner_id in corner_ids {
            model.store.corner_mut(corner_id)?.reference_point += self.offset;
        }
        model.rederive(self.perimeter)
    }
}

/// Replaces every corner's reference point at once.
///
/// Points map positionally onto the existing corners, so the count must
/// match and the replacement must keep the stored clockwise winding.
#[derive(Debug)]
pub struct UpdateBoundary {
    perimeter: PerimeterId,
    points: Vec<Point2>,
}

impl UpdateBoundary {
    #[must_use]
    pub fn new(perimeter: PerimeterId, points: Vec<Point2>) -> Self {
        Self { perimeter, points }
    }

    /// Returns `Ok(false)` for a counter-clockwise or self-intersecting
    /// replacement.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the point count does not
    /// match the corner count and `TopologyError::EntityNotFound` for a
    /// dead perimeter ID.
    pub fn execute(&self, model: &mut Model) -> Result<bool> {
        let corner_ids = model.store.perimeter(self.perimeter)?.corner_ids.clone();
        if self.points.len() != corner_ids.len() {
            return Err(OperationError::InvalidInput(format!(
                "boundary has {} points but the perimeter has {} corners",
                self.points.len(),
                corner_ids.len()
            ))
            .into());
        }
        if !is_clockwise(&self.points) || !is_simple_polygon(&self.points) {
            return Ok(false);
        }
        for (corner_id, &point) in corner_ids.iter().zip(&self.points) {
            model.store.corner_mut(*corner_id)?.reference_point = point;
        }
        model.rederive(self.perimeter)?;
        Ok(true)
    }
}

/// Switches which side of the walls the stored boundary describes.
///
/// The new reference points are taken from the other side's currently
/// derived corner points, so the built geometry is identical before and
/// after the switch.
#[derive(Debug)]
pub struct SetReferenceSide {
    perimeter: PerimeterId,
    side: ReferenceSide,
}

impl SetReferenceSide {
    #[must_use]
    pub fn new(perimeter: PerimeterId, side: ReferenceSide) -> Self {
        Self { perimeter, side }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead perimeter ID or
    /// a missing geometry cache entry.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        let per = model.store.perimeter(self.perimeter)?.clone();
        if per.reference_side == self.side {
            return Ok(());
        }

        let mut new_points = Vec::with_capacity(per.corner_ids.len());
        for &corner_id in &per.corner_ids {
            let geometry = model.corner_geometry(corner_id)?;
            new_points.push(match self.side {
                ReferenceSide::Inside => geometry.inside_point,
                ReferenceSide::Outside => geometry.outside_point,
            });
        }
        for (&corner_id, point) in per.corner_ids.iter().zip(new_points) {
            model.store.corner_mut(corner_id)?.reference_point = point;
        }
        model.store.perimeter_mut(self.perimeter)?.reference_side = self.side;
        model.rederive(self.perimeter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::operations::AddPost;
    use crate::test_support::{assert_model_invariants, rect_model};

    #[test]
    fn wall_thickness_update_rederives() {
        let (mut model, pid) = rect_model();
        let wall = model.walls_of(pid).unwrap()[1];
        UpdateWallThickness::new(wall, 600.0).execute(&mut model).unwrap();
        assert_relative_eq!(model.wall(wall).unwrap().thickness, 600.0, epsilon = 1e-12);
        // Outside face of the far wall moved from y = 5420 to y = 5600.
        let outside = model.wall_geometry(wall).unwrap().outside_line;
        assert_relative_eq!(outside[0].y, 5600.0, epsilon = 1e-6);
        assert!(UpdateWallThickness::new(wall, 0.0).execute(&mut model).is_err());
        assert_model_invariants(&model);
    }

    #[test]
    fn perimeter_thickness_update_covers_all_walls() {
        let (mut model, pid) = rect_model();
        UpdatePerimeterThickness::new(pid, 300.0).execute(&mut model).unwrap();
        for &wall in model.walls_of(pid).unwrap() {
            assert_relative_eq!(model.wall(wall).unwrap().thickness, 300.0, epsilon = 1e-12);
        }
        let outer = &model.perimeter_geometry(pid).unwrap().outer_polygon;
        assert_relative_eq!(signed_area_2d(outer).abs(), 10600.0 * 5600.0, epsilon = 1e-3);
    }

    #[test]
    fn assembly_and_ring_beam_updates_write_through() {
        let (mut model, pid) = rect_model();
        let wall = model.walls_of(pid).unwrap()[0];
        UpdateWallAssembly::new(wall, AssemblyId(9)).execute(&mut model).unwrap();
        UpdateWallRingBeams::new(wall, vec![AssemblyId(4), AssemblyId(5)])
            .execute(&mut model)
            .unwrap();
        let data = model.wall(wall).unwrap();
        assert_eq!(data.assembly, AssemblyId(9));
        assert_eq!(data.ring_beams, vec![AssemblyId(4), AssemblyId(5)]);
    }

    #[test]
    fn move_perimeter_translates_without_resizing() {
        let (mut model, pid) = rect_model();
        let wall = model.walls_of(pid).unwrap()[1];
        let length_before = model.wall_geometry(wall).unwrap().wall_length;
        MovePerimeter::new(pid, Vector2::new(250.0, -100.0))
            .execute(&mut model)
            .unwrap();
        let corner = model.corners_of(pid).unwrap()[0];
        let reference = model.corner(corner).unwrap().reference_point;
        assert_relative_eq!(reference.x, 250.0, epsilon = 1e-9);
        assert_relative_eq!(reference.y, -100.0, epsilon = 1e-9);
        assert_relative_eq!(
            model.wall_geometry(wall).unwrap().wall_length,
            length_before,
            epsilon = 1e-6
        );
    }

    #[test]
    fn boundary_update_validates_count_winding_and_simplicity() {
        let (mut model, pid) = rect_model();
        assert!(UpdateBoundary::new(pid, vec![Point2::new(0.0, 0.0)])
            .execute(&mut model)
            .is_err());

        // Counter-clockwise replacement is refused, not an error.
        let ccw = vec![
            Point2::new(0.0, 0.0),
            Point2::new(8000.0, 0.0),
            Point2::new(8000.0, 4000.0),
            Point2::new(0.0, 4000.0),
        ];
        assert!(!UpdateBoundary::new(pid, ccw).execute(&mut model).unwrap());

        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(8000.0, 4000.0),
            Point2::new(8000.0, 0.0),
            Point2::new(0.0, 4000.0),
        ];
        assert!(!UpdateBoundary::new(pid, bowtie).execute(&mut model).unwrap());

        let resized = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 4000.0),
            Point2::new(8000.0, 4000.0),
            Point2::new(8000.0, 0.0),
        ];
        assert!(UpdateBoundary::new(pid, resized).execute(&mut model).unwrap());
        let wall = model.walls_of(pid).unwrap()[1];
        assert_relative_eq!(
            model.wall_geometry(wall).unwrap().wall_length,
            8000.0,
            epsilon = 1e-6
        );
        assert_model_invariants(&model);
    }

    #[test]
    fn reference_side_switch_keeps_built_geometry() {
        let (mut model, pid) = rect_model();
        let outer_before = model.perimeter_geometry(pid).unwrap().outer_polygon.clone();
        let inner_before = model.perimeter_geometry(pid).unwrap().inner_polygon.clone();

        SetReferenceSide::new(pid, ReferenceSide::Outside)
            .execute(&mut model)
            .unwrap();
        assert_eq!(
            model.perimeter(pid).unwrap().reference_side,
            ReferenceSide::Outside
        );
        // Reference points now live on the outside boundary.
        let corner = model.corners_of(pid).unwrap()[0];
        let reference = model.corner(corner).unwrap().reference_point;
        assert_relative_eq!(reference.x, -420.0, epsilon = 1e-6);
        assert_relative_eq!(reference.y, -420.0, epsilon = 1e-6);

        let after = model.perimeter_geometry(pid).unwrap();
        for (a, b) in outer_before.iter().zip(&after.outer_polygon) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
        }
        for (a, b) in inner_before.iter().zip(&after.inner_polygon) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-6);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-6);
        }

        // Switching to the current side is a no-op.
        SetReferenceSide::new(pid, ReferenceSide::Outside)
            .execute(&mut model)
            .unwrap();
        assert_model_invariants(&model);
    }

    #[test]
    fn constructed_by_switch_blocked_by_extension_post() {
        let (mut model, pid) = rect_model();
        let wall = model.walls_of(pid).unwrap()[1];
        let end_corner = model.wall(wall).unwrap().end_corner;

        // No posts yet, the switch goes through both ways.
        assert!(UpdateCornerConstructedBy::new(end_corner, ConstructedBy::NextWall)
            .execute(&mut model)
            .unwrap());
        assert!(UpdateCornerConstructedBy::new(end_corner, ConstructedBy::PreviousWall)
            .execute(&mut model)
            .unwrap());

        // A post reaching past the wall end occupies the extension zone.
        AddPost::new(wall, 10100.0, 400.0, 420.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();
        assert!(!UpdateCornerConstructedBy::new(end_corner, ConstructedBy::NextWall)
            .execute(&mut model)
            .unwrap());
        assert_eq!(
            model.corner(end_corner).unwrap().constructed_by,
            ConstructedBy::PreviousWall
        );
    }
}
