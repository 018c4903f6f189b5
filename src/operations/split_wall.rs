use crate::error::{OperationError, Result, TopologyError};
use crate::math::intersect_2d::point_at;
use crate::math::polygon_2d::left_normal;
use crate::math::TOLERANCE;
use crate::model::Model;
use crate::topology::{ConstructedBy, CornerData, ReferenceSide, WallData, WallId};

/// Splits a wall in two by inserting a corner at a position along the wall.
///
/// The original wall keeps its identity for the first half; the second half
/// and the inserted corner are freshly minted. Mounted entities stay on the
/// half they fall into, with offsets on the second half rebased by the
/// split position. The inserted corner lies on the reference line, so the
/// visible polygon is unchanged.
#[derive(Debug)]
pub struct SplitWall {
    wall: WallId,
    position: f64,
}

impl SplitWall {
    /// Creates a new `SplitWall` operation. `position` is a wall coordinate
    /// in `(0, wall_length)`, measured from the wall start.
    #[must_use]
    pub fn new(wall: WallId, position: f64) -> Self {
        Self { wall, position }
    }

    /// Executes the operation, returning the second half's ID, or `None`
    /// if the split point falls inside a mounted entity's span.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead wall ID and
    /// `OperationError::InvalidInput` for a position outside
    /// `(0, wall_length)`.
    pub fn execute(&self, model: &mut Model) -> Result<Option<WallId>> {
        let wall = model.store.wall(self.wall)?.clone();
        let (wall_length, inside_start, direction) = {
            let geometry = model.wall_geometry(self.wall)?;
            (geometry.wall_length, geometry.inside_line[0], geometry.direction)
        };
        if self.position <= TOLERANCE || self.position >= wall_length - TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "split position {} outside (0, {wall_length})",
                self.position
            ))
            .into());
        }

        for &entity_id in &wall.entity_ids {
            let (s0, s1) = model.store.entity(entity_id)?.span();
            if self.position > s0 + TOLERANCE && self.position < s1 - TOLERANCE {
                return Ok(None);
            }
        }

        // Project the split point from the inside line onto the reference line.
        let perimeter_id = wall.perimeter;
        let per = model.store.perimeter(perimeter_id)?;
        let inside_point = point_at(&inside_start, &direction, self.position);
        let reference_point = match per.reference_side {
            ReferenceSide::Inside => inside_point,
            ReferenceSide::Outside => inside_point + left_normal(&direction) * wall.thickness,
        };

        let wall_index = per
            .wall_index(self.wall)
            .ok_or_else(|| TopologyError::InvalidTopology("wall not in its perimeter".into()))?;

        let (kept, moved): (Vec<_>, Vec<_>) = wall
            .entity_ids
            .iter()
            .copied()
            .partition(|&entity_id| {
                model
                    .store
                    .entity(entity_id)
                    .map(|e| e.center_offset < self.position)
                    .unwrap_or(false)
            });

        let new_corner = model.store.add_corner(CornerData {
            perimeter: perimeter_id,
            previous_wall: self.wall,
            next_wall: WallId::default(),
            reference_point,
            constructed_by: ConstructedBy::PreviousWall,
        });
        let new_wall = model.store.add_wall(WallData {
            perimeter: perimeter_id,
            start_corner: new_corner,
            end_corner: wall.end_corner,
            thickness: wall.thickness,
            assembly: wall.assembly,
            entity_ids: moved.clone(),
            ring_beams: wall.ring_beams.clone(),
        });
        model.store.corner_mut(new_corner)?.next_wall = new_wall;

        for entity_id in moved {
            let entity = model.store.entity_mut(entity_id)?;
            entity.wall = new_wall;
            entity.center_offset -= self.position;
        }

        {
            let first = model.store.wall_mut(self.wall)?;
            first.end_corner = new_corner;
            first.entity_ids = kept;
        }
        model.store.corner_mut(wall.end_corner)?.previous_wall = new_wall;

        let per = model.store.perimeter_mut(perimeter_id)?;
        per.wall_ids.insert(wall_index + 1, new_wall);
        per.corner_ids.insert(wall_index + 1, new_corner);

        model.rederive(perimeter_id)?;
        Ok(Some(new_wall))
    }
}
