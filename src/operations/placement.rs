//! Placement validation for wall-mounted entities.
//!
//! All offsets are along-wall coordinates measured from the wall's inside
//! start. Openings must keep their whole span within `[0, wall_length]`;
//! posts may additionally reach into a corner extension zone where the
//! adjacent corner is non-straight and constructed by this wall.

use crate::error::Result;
use crate::math::TOLERANCE;
use crate::model::Model;
use crate::topology::{ConstructedBy, CornerId, EntityId, WallId};

/// How far past the wall's trimmed endpoint a post may reach at the given
/// corner. Zero when the corner is straight or constructed by the other
/// wall.
fn corner_extension(model: &Model, corner_id: CornerId, wall_id: WallId) -> Result<f64> {
    let corner = model.corner(corner_id)?;
    let geometry = model.corner_geometry(corner_id)?;
    if geometry.interior_angle == 180 {
        return Ok(0.0);
    }
    let owner = match corner.constructed_by {
        ConstructedBy::PreviousWall => corner.previous_wall,
        ConstructedBy::NextWall => corner.next_wall,
    };
    if owner != wall_id {
        return Ok(0.0);
    }

    let wall = model.wall_geometry(wall_id)?;
    let origin = wall.inside_line[0];
    let along = |p: crate::math::Point2| (p - origin).dot(&wall.direction);

    // Extension on a side is the gap between the trimmed endpoint and the
    // mitre point; when the endpoint already is the mitre, the gap is zero.
    let ext = if corner_id == model.wall(wall_id)?.end_corner {
        let inside = along(geometry.inside_point) - along(wall.inside_line[1]);
        let outside = along(geometry.outside_point) - along(wall.outside_line[1]);
        inside.max(outside)
    } else {
        let inside = along(wall.inside_line[0]) - along(geometry.inside_point);
        let outside = along(wall.outside_line[0]) - along(geometry.outside_point);
        inside.max(outside)
    };
    Ok(ext.max(0.0))
}

/// Along-wall span an entity of the given kind may occupy.
fn placement_bounds(model: &Model, wall_id: WallId, for_post: bool) -> Result<(f64, f64)> {
    let wall_length = model.wall_geometry(wall_id)?.wall_length;
    if !for_post {
        return Ok((0.0, wall_length));
    }
    let wall = model.wall(wall_id)?;
    let start_ext = corner_extension(model, wall.start_corner, wall_id)?;
    let end_ext = corner_extension(model, wall.end_corner, wall_id)?;
    Ok((-start_ext, wall_length + end_ext))
}

fn collides(center: f64, width: f64, other_center: f64, other_width: f64) -> bool {
    (center - other_center).abs() < (width + other_width) / 2.0 - TOLERANCE
}

/// Checks a candidate placement against the wall's bounds and its existing
/// entities. Flush contact with a neighbour or a bound is allowed.
///
/// # Errors
///
/// Returns `TopologyError::EntityNotFound` for dead IDs or a wall whose
/// geometry has not been derived.
pub fn validate_placement(
    model: &Model,
    wall_id: WallId,
    center_offset: f64,
    width: f64,
    for_post: bool,
    excluded: Option<EntityId>,
) -> Result<bool> {
    let (min, max) = placement_bounds(model, wall_id, for_post)?;
    if center_offset - width / 2.0 < min - TOLERANCE
        || center_offset + width / 2.0 > max + TOLERANCE
    {
        return Ok(false);
    }
    for &entity_id in &model.wall(wall_id)?.entity_ids {
        if Some(entity_id) == excluded {
            continue;
        }
        let entity = model.entity(entity_id)?;
        if collides(center_offset, width, entity.center_offset, entity.width) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Finds the valid center offset nearest to `preferred`, or `None` when the
/// neighbourhood is too crowded.
///
/// The preferred offset is first clamped into the wall's bounds. A single
/// colliding neighbour is resolved by shifting flush against it on the
/// preferred side; two or more colliding neighbours give up rather than
/// searching the whole wall.
///
/// # Errors
///
/// Returns `TopologyError::EntityNotFound` for dead IDs.
pub fn find_nearest_valid_position(
    model: &Model,
    wall_id: WallId,
    preferred: f64,
    width: f64,
    for_post: bool,
    excluded: Option<EntityId>,
) -> Result<Option<f64>> {
    let (min, max) = placement_bounds(model, wall_id, for_post)?;
    let lo = min + width / 2.0;
    let hi = max - width / 2.0;
    if lo > hi + TOLERANCE {
        return Ok(None);
    }
    let clamped = preferred.clamp(lo, hi);

    let mut colliding = Vec::new();
    for &entity_id in &model.wall(wall_id)?.entity_ids {
        if Some(entity_id) == excluded {
            continue;
        }
        let entity = model.entity(entity_id)?;
        if collides(clamped, width, entity.center_offset, entity.width) {
            colliding.push((entity.center_offset, entity.width));
        }
    }

    match colliding.as_slice() {
        [] => Ok(Some(clamped)),
        [(other_center, other_width)] => {
            let shift = (other_width + width) / 2.0;
            let candidate = if clamped >= *other_center {
                other_center + shift
            } else {
                other_center - shift
            };
            if candidate >= lo - TOLERANCE
                && candidate <= hi + TOLERANCE
                && validate_placement(model, wall_id, candidate, width, for_post, excluded)?
            {
                Ok(Some(candidate))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}
