//! Shared fixtures and consistency checks for unit tests.

#![allow(clippy::unwrap_used)]

use crate::math::Point2;
use crate::model::Model;
use crate::operations::AddPerimeter;
use crate::topology::{AssemblyId, PerimeterId, StoreyId};

/// A 10 m x 5 m clockwise rectangle with 420 mm walls, inside reference.
///
/// Wall 0 runs up the left edge from the origin; wall 1 is the far 10 m
/// wall along y = 5000.
pub(crate) fn rect_model() -> (Model, PerimeterId) {
    let mut model = Model::new();
    let boundary = vec![
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 5000.0),
        Point2::new(10000.0, 5000.0),
        Point2::new(10000.0, 0.0),
    ];
    let id = AddPerimeter::new(StoreyId(1), boundary, AssemblyId(3), 420.0)
        .execute(&mut model)
        .unwrap()
        .unwrap();
    (model, id)
}

/// Checks the structural invariants every operation must preserve:
/// parallel ID arrays, cyclic wall/corner linkage, positive dimensions,
/// entity ownership and sorted entity lists.
pub(crate) fn assert_model_invariants(model: &Model) {
    let store = model.store();

    for (perimeter_id, per) in store.perimeters() {
        let n = per.corner_ids.len();
        assert_eq!(per.wall_ids.len(), n, "parallel ID arrays diverged");
        assert!(n >= 3, "perimeter with fewer than 3 corners");

        for i in 0..n {
            let wall = store.wall(per.wall_ids[i]).unwrap();
            let start = store.corner(per.corner_ids[i]).unwrap();
            let end = store.corner(per.corner_ids[(i + 1) % n]).unwrap();

            assert_eq!(wall.perimeter, perimeter_id);
            assert_eq!(wall.start_corner, per.corner_ids[i]);
            assert_eq!(wall.end_corner, per.corner_ids[(i + 1) % n]);
            assert_eq!(start.next_wall, per.wall_ids[i]);
            assert_eq!(end.previous_wall, per.wall_ids[i]);
            assert_eq!(start.perimeter, perimeter_id);
            assert!(wall.thickness > 0.0);

            let mut previous_offset = f64::NEG_INFINITY;
            for &entity_id in &wall.entity_ids {
                let entity = store.entity(entity_id).unwrap();
                assert_eq!(entity.wall, per.wall_ids[i], "entity on the wrong wall");
                assert!(entity.width > 0.0);
                assert!(
                    entity.center_offset >= previous_offset,
                    "entity list out of order"
                );
                previous_offset = entity.center_offset;
            }
        }
    }

    // Every stored entity must be owned by a wall that lists it.
    for (entity_id, entity) in store.entities() {
        let wall = store.wall(entity.wall).unwrap();
        assert!(wall.entity_ids.contains(&entity_id), "orphaned entity");
    }
}
