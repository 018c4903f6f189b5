use crate::error::{Result, TopologyError};
use crate::math::polygon_2d::is_simple_polygon;
use crate::model::Model;
use crate::topology::{WallData, WallId};

use super::gc;

/// Removes a wall together with both of its corners, merging the two
/// neighbouring walls into one that spans from the removed wall's
/// predecessor's start to its successor's end.
///
/// Unlike a corner merge, the removed wall's reference edge vanishes from
/// the boundary entirely, so the merged wall never lies along either old
/// wall. All entities of the three walls involved are dropped.
#[derive(Debug)]
pub struct RemoveWall {
    wall: WallId,
}

impl RemoveWall {
    /// Creates a new `RemoveWall` operation.
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the operation, returning the merged wall's ID, or `None`
    /// if the perimeter has fewer than 5 walls or the shrunk polygon
    /// would self-intersect.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<Option<WallId>> {
        let wall = model.store.wall(self.wall)?.clone();
        let perimeter_id = wall.perimeter;
        let per = model.store.perimeter(perimeter_id)?.clone();
        let n = per.wall_ids.len();
        if n < 5 {
            return Ok(None);
        }
        let index = per
            .wall_index(self.wall)
            .ok_or_else(|| TopologyError::InvalidTopology("wall not in its perimeter".into()))?;
        let prev_index = (index + n - 1) % n;
        let next_index = (index + 1) % n;

        // The wall's two corners disappear; its reference edge collapses
        // into a single chord between the surviving neighbours.
        let mut remaining = Vec::with_capacity(n - 2);
        for (i, &corner_id) in per.corner_ids.iter().enumerate() {
            if i != index && i != next_index {
                remaining.push(model.store.corner(corner_id)?.reference_point);
            }
        }
        if !is_simple_polygon(&remaining) {
            return Ok(None);
        }

        let prev_id = per.wall_ids[prev_index];
        let next_id = per.wall_ids[next_index];
        let prev = model.store.wall(prev_id)?.clone();
        let next = model.store.wall(next_id)?.clone();

        let merged = model.store.add_wall(WallData {
            perimeter: perimeter_id,
            start_corner: prev.start_corner,
            end_corner: next.end_corner,
            thickness: prev.thickness.max(wall.thickness).max(next.thickness),
            assembly: prev.assembly,
            entity_ids: Vec::new(),
            ring_beams: prev.ring_beams.clone(),
        });

        model.store.corner_mut(prev.start_corner)?.next_wall = merged;
        model.store.corner_mut(next.end_corner)?.previous_wall = merged;

        let mut wall_ids = Vec::with_capacity(n - 2);
        let mut corner_ids = Vec::with_capacity(n - 2);
        for i in 0..n {
            if i != index && i != next_index {
                corner_ids.push(per.corner_ids[i]);
            }
            if i == index || i == next_index {
                continue;
            }
            if i == prev_index {
                wall_ids.push(merged);
            } else {
                wall_ids.push(per.wall_ids[i]);
            }
        }
        {
            let per = model.store.perimeter_mut(perimeter_id)?;
            per.wall_ids = wall_ids;
            per.corner_ids = corner_ids;
        }

        model.store.remove_corner(wall.start_corner);
        model.store.remove_corner(wall.end_corner);
        model.store.remove_wall(prev_id);
        model.store.remove_wall(self.wall);
        model.store.remove_wall(next_id);
        gc::sweep(model);

        model.rederive(perimeter_id)?;
        Ok(Some(merged))
    }
}
