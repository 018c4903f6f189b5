use crate::error::{Result, TopologyError};
use crate::math::polygon_2d::is_simple_polygon;
use crate::model::Model;
use crate::topology::{CornerId, WallData, WallId};

use super::gc;

/// Removes a corner, merging its two adjacent walls into one.
///
/// The merged wall is always freshly minted; its thickness is the `max` of
/// the two. Entities survive the merge only when the corner was exactly
/// straight (180°): both walls' entities are concatenated and the second
/// wall's offsets rebased by the first wall's length. At any other angle,
/// no consistent along-wall coordinate exists for both halves, so all
/// entities are dropped.
#[derive(Debug)]
pub struct RemoveCorner {
    corner: CornerId,
}

impl RemoveCorner {
    /// Creates a new `RemoveCorner` operation.
    #[must_use]
    pub fn new(corner: CornerId) -> Self {
        Self { corner }
    }

    /// Executes the operation, returning the merged wall's ID, or `None`
    /// if the perimeter has fewer than 4 corners or the shrunk polygon
    /// would self-intersect.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead corner ID.
    pub fn execute(&self, model: &mut Model) -> Result<Option<WallId>> {
        let corner = model.store.corner(self.corner)?.clone();
        let perimeter_id = corner.perimeter;
        let per = model.store.perimeter(perimeter_id)?.clone();
        let n = per.corner_ids.len();
        if n < 4 {
            return Ok(None);
        }
        let index = per
            .corner_index(self.corner)
            .ok_or_else(|| TopologyError::InvalidTopology("corner not in its perimeter".into()))?;

        let mut remaining = Vec::with_capacity(n - 1);
        for (i, &corner_id) in per.corner_ids.iter().enumerate() {
            if i != index {
                remaining.push(model.store.corner(corner_id)?.reference_point);
            }
        }
        if !is_simple_polygon(&remaining) {
            return Ok(None);
        }

        let prev_index = (index + n - 1) % n;
        let prev_id = per.wall_ids[prev_index];
        let next_id = per.wall_ids[index];
        let prev = model.store.wall(prev_id)?.clone();
        let next = model.store.wall(next_id)?.clone();

        let straight = model.corner_geometry(self.corner)?.interior_angle == 180;
        let prev_length = model.wall_geometry(prev_id)?.wall_length;

        let entity_ids = if straight {
            let mut entities = prev.entity_ids.clone();
            entities.extend(next.entity_ids.iter().copied());
            entities
        } else {
            Vec::new()
        };

        let merged = model.store.add_wall(WallData {
            perimeter: perimeter_id,
            start_corner: prev.start_corner,
            end_corner: next.end_corner,
            thickness: prev.thickness.max(next.thickness),
            assembly: prev.assembly,
            entity_ids: entity_ids.clone(),
            ring_beams: prev.ring_beams.clone(),
        });

        if straight {
            for &entity_id in &next.entity_ids {
                model.store.entity_mut(entity_id)?.center_offset += prev_length;
            }
            for entity_id in entity_ids {
                model.store.entity_mut(entity_id)?.wall = merged;
            }
        }

        model.store.corner_mut(prev.start_corner)?.next_wall = merged;
        model.store.corner_mut(next.end_corner)?.previous_wall = merged;

        let mut wall_ids = Vec::with_capacity(n - 1);
        let mut corner_ids = Vec::with_capacity(n - 1);
        for i in 0..n {
            if i != index {
                corner_ids.push(per.corner_ids[i]);
            }
            if i == index {
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

        model.store.remove_corner(self.corner);
        model.store.remove_wall(prev_id);
        model.store.remove_wall(next_id);
        gc::sweep(model);

        model.rederive(perimeter_id)?;
        Ok(Some(merged))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;
    use crate::operations::{AddOpening, AddPerimeter, SplitWall};
    use crate::test_support::{assert_model_invariants, rect_model};
    use crate::topology::{AssemblyId, StoreyId};

    #[test]
    fn triangle_corner_cannot_be_removed() {
        let mut model = crate::Model::new();
        let boundary = vec![
            Point2::new(0.0, 0.0),
            Point2::new(8000.0, 0.0),
            Point2::new(4000.0, 6000.0),
        ];
        let pid = AddPerimeter::new(StoreyId(1), boundary, AssemblyId(3), 300.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();
        let corner = model.corners_of(pid).unwrap()[0];
        assert!(RemoveCorner::new(corner).execute(&mut model).unwrap().is_none());
    }

    #[test]
    fn straight_corner_merge_preserves_entities() {
        let (mut model, pid) = rect_model();
        let wall = model.walls_of(pid).unwrap()[1];
        let second = SplitWall::new(wall, 4000.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();
        let first_opening = AddOpening::new(wall, 1000.0, 900.0, 1200.0, 800.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();
        let second_opening = AddOpening::new(second, 2000.0, 900.0, 1200.0, 800.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        let corner = model.wall(second).unwrap().start_corner;
        let merged = RemoveCorner::new(corner)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        assert!(model.wall(wall).is_err());
        assert!(model.wall(second).is_err());
        assert_ne!(merged, wall);
        assert_relative_eq!(
            model.wall_geometry(merged).unwrap().wall_length,
            10000.0,
            epsilon = 1e-6
        );
        assert_eq!(
            model.entities_of(merged).unwrap(),
            &[first_opening, second_opening]
        );
        assert_relative_eq!(
            model.entity(first_opening).unwrap().center_offset,
            1000.0,
            epsilon = 1e-9
        );
        // Rebased by the first wall's length.
        assert_relative_eq!(
            model.entity(second_opening).unwrap().center_offset,
            6000.0,
            epsilon = 1e-9
        );
        assert_model_invariants(&model);
    }

    #[test]
    fn angled_corner_merge_drops_entities() {
        let (mut model, pid) = rect_model();
        let walls: Vec<_> = model.walls_of(pid).unwrap().to_vec();
        AddOpening::new(walls[1], 1000.0, 900.0, 1200.0, 800.0)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        // Corner between walls[1] and walls[2] is a right angle.
        let corner = model.wall(walls[2]).unwrap().start_corner;
        let merged = RemoveCorner::new(corner)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        assert_eq!(model.perimeter(pid).unwrap().wall_ids.len(), 3);
        assert!(model.entities_of(merged).unwrap().is_empty());
        assert_eq!(model.store().entity_ids().count(), 0);
        // Merged wall takes the max thickness (both 420 here).
        assert_relative_eq!(model.wall(merged).unwrap().thickness, 420.0, epsilon = 1e-12);
        assert_model_invariants(&model);
    }

    #[test]
    fn removal_that_would_self_intersect_is_rejected() {
        // A spike in the bottom edge is shielded by a raised vertex; dropping
        // that vertex would run the closing edge straight through the spike.
        let mut model = crate::Model::new();
        let boundary = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(5.0, 6.0),
            Point2::new(6.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 2.0),
            Point2::new(5.0, 8.0),
            Point2::new(0.0, 2.0),
        ];
        let pid = AddPerimeter::new(StoreyId(1), boundary, AssemblyId(3), 0.1)
            .execute(&mut model)
            .unwrap()
            .unwrap();

        let per = model.perimeter(pid).unwrap();
        let shield = per
            .corner_ids
            .iter()
            .copied()
            .find(|&c| {
                let p = model.corner(c).unwrap().reference_point;
                (p.x - 5.0).abs() < 1e-9 && (p.y - 8.0).abs() < 1e-9
            })
            .unwrap();

        assert!(RemoveCorner::new(shield).execute(&mut model).unwrap().is_none());
        assert_eq!(model.perimeter(pid).unwrap().wall_ids.len(), 8);
        assert_model_invariants(&model);
    }
}
