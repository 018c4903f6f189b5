//! Garbage collection for topology orphaned by structural edits.
//!
//! Structural operations unlink walls, corners and entities by rewriting
//! the owner's ID lists; this sweep then drops everything no longer
//! reachable from an owner, plus the matching geometry cache entries.
//! Ownership is strictly one level deep (perimeter owns walls and corners,
//! wall owns entities), so a single pass suffices.

use std::collections::HashSet;

use crate::model::Model;

/// Removes all unreferenced walls, corners and entities, then purges dead
/// geometry cache entries.
pub(crate) fn sweep(model: &mut Model) {
    let mut live_walls = HashSet::new();
    let mut live_corners = HashSet::new();
    for (_, per) in model.store.perimeters() {
        live_walls.extend(per.wall_ids.iter().copied());
        live_corners.extend(per.corner_ids.iter().copied());
    }
    model.store.retain_walls(|id, _| live_walls.contains(&id));
    model.store.retain_corners(|id, _| live_corners.contains(&id));

    let mut live_entities = HashSet::new();
    for (_, wall) in model.store.walls() {
        live_entities.extend(wall.entity_ids.iter().copied());
    }
    model.store.retain_entities(|id, _| live_entities.contains(&id));

    model.geometry.purge_dead(&model.store);
}
