//! CRUD operations for wall-mounted entities (openings and posts).
//!
//! All placements go through the placement validator; a rejected placement
//! is `Ok(None)` / `Ok(false)`, never an error. Non-positive dimensions are
//! caller mistakes and fail with `OperationError::InvalidInput`.

use crate::error::{OperationError, Result};
use crate::math::TOLERANCE;
use crate::model::Model;
use crate::topology::{EntityData, EntityId, EntityKind, WallId};

use super::gc;
use super::placement::validate_placement;

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value <= TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "{name} must be positive, got {value}"
        ))
        .into());
    }
    Ok(())
}

/// Inserts an entity ID into a wall's list, keeping it sorted by center
/// offset.
fn insert_sorted(model: &mut Model, wall_id: WallId, entity_id: EntityId) -> Result<()> {
    let offset = model.store.entity(entity_id)?.center_offset;
    let mut offsets = Vec::new();
    for &existing in &model.store.wall(wall_id)?.entity_ids {
        offsets.push(model.store.entity(existing)?.center_offset);
    }
    let position = offsets.partition_point(|&o| o <= offset);
    model
        .store
        .wall_mut(wall_id)?
        .entity_ids
        .insert(position, entity_id);
    Ok(())
}

/// Adds a wall opening (window or door cutout).
#[derive(Debug)]
pub struct AddOpening {
    wall: WallId,
    center_offset: f64,
    width: f64,
    height: f64,
    sill_height: f64,
}

impl AddOpening {
    #[must_use]
    pub fn new(wall: WallId, center_offset: f64, width: f64, height: f64, sill_height: f64) -> Self {
        Self { wall, center_offset, width, height, sill_height }
    }

    /// Returns `Ok(None)` when the placement is out of bounds or overlaps
    /// an existing entity.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for non-positive width or
    /// height or a negative sill height, and `TopologyError::EntityNotFound`
    /// for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<Option<EntityId>> {
        ensure_positive("opening width", self.width)?;
        ensure_positive("opening height", self.height)?;
        if self.sill_height < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "sill height must not be negative, got {}",
                self.sill_height
            ))
            .into());
        }
        if !validate_placement(model, self.wall, self.center_offset, self.width, false, None)? {
            return Ok(None);
        }

        let perimeter = model.store.wall(self.wall)?.perimeter;
        let entity_id = model.store.add_entity(EntityData {
            wall: self.wall,
            center_offset: self.center_offset,
            width: self.width,
            kind: EntityKind::Opening {
                height: self.height,
                sill_height: self.sill_height,
            },
        });
        insert_sorted(model, self.wall, entity_id)?;
        model.rederive(perimeter)?;
        Ok(Some(entity_id))
    }
}

/// Adds a structural post embedded in a wall.
#[derive(Debug)]
pub struct AddPost {
    wall: WallId,
    center_offset: f64,
    width: f64,
    thickness: f64,
}

impl AddPost {
    #[must_use]
    pub fn new(wall: WallId, center_offset: f64, width: f64, thickness: f64) -> Self {
        Self { wall, center_offset, width, thickness }
    }

    /// Returns `Ok(None)` when the placement is out of bounds or overlaps
    /// an existing entity. Posts may reach into a corner extension zone
    /// their wall constructs.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for non-positive dimensions
    /// and `TopologyError::EntityNotFound` for a dead wall ID.
    pub fn execute(&self, model: &mut Model) -> Result<Option<EntityId>> {
        ensure_positive("post width", self.width)?;
        ensure_positive("post thickness", self.thickness)?;
        if !validate_placement(model, self.wall, self.center_offset, self.width, true, None)? {
            return Ok(None);
        }

        let perimeter = model.store.wall(self.wall)?.perimeter;
        let entity_id = model.store.add_entity(EntityData {
            wall: self.wall,
            center_offset: self.center_offset,
            width: self.width,
            kind: EntityKind::Post { thickness: self.thickness },
        });
        insert_sorted(model, self.wall, entity_id)?;
        model.rederive(perimeter)?;
        Ok(Some(entity_id))
    }
}

/// Moves and/or resizes an entity along its wall.
#[derive(Debug)]
pub struct UpdateEntityPlacement {
    entity: EntityId,
    center_offset: f64,
    width: f64,
}

impl UpdateEntityPlacement {
    #[must_use]
    pub fn new(entity: EntityId, center_offset: f64, width: f64) -> Self {
        Self { entity, center_offset, width }
    }

    /// Returns `Ok(false)` when the new placement is invalid; the entity is
    /// left untouched. The entity's own footprint is excluded from the
    /// overlap check, so it may move across its current span.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive width and
    /// `TopologyError::EntityNotFound` for a dead entity ID.
    pub fn execute(&self, model: &mut Model) -> Result<bool> {
        ensure_positive("entity width", self.width)?;
        let entity = model.store.entity(self.entity)?;
        let wall_id = entity.wall;
        let for_post = entity.is_post();
        if !validate_placement(
            model,
            wall_id,
            self.center_offset,
            self.width,
            for_post,
            Some(self.entity),
        )? {
            return Ok(false);
        }

        {
            let entity = model.store.entity_mut(self.entity)?;
            entity.center_offset = self.center_offset;
            entity.width = self.width;
        }
        let wall = model.store.wall_mut(wall_id)?;
        let index = wall.entity_ids.iter().position(|&e| e == self.entity);
        if let Some(index) = index {
            wall.entity_ids.remove(index);
        }
        insert_sorted(model, wall_id, self.entity)?;

        let perimeter = model.store.wall(wall_id)?.perimeter;
        model.rederive(perimeter)?;
        Ok(true)
    }
}

/// Sets an opening's height and sill height. No plan geometry changes.
#[derive(Debug)]
pub struct UpdateOpeningParams {
    entity: EntityId,
    height: f64,
    sill_height: f64,
}

impl UpdateOpeningParams {
    #[must_use]
    pub fn new(entity: EntityId, height: f64, sill_height: f64) -> Self {
        Self { entity, height, sill_height }
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the entity is not an
    /// opening or the dimensions are invalid, and
    /// `TopologyError::EntityNotFound` for a dead entity ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        ensure_positive("opening height", self.height)?;
        if self.sill_height < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "sill height must not be negative, got {}",
                self.sill_height
            ))
            .into());
        }
        let entity = model.store.entity_mut(self.entity)?;
        match &mut entity.kind {
            EntityKind::Opening { height, sill_height } => {
                *height = self.height;
                *sill_height = self.sill_height;
                Ok(())
            }
            EntityKind::Post { .. } => Err(OperationError::InvalidInput(
                "entity is a post, not an opening".into(),
            )
            .into()),
        }
    }
}

/// Sets a post's cross-wall thickness. No plan geometry changes.
#[derive(Debug)]
pub struct UpdatePostThickness {
    entity: EntityId,
    thickness: f64,
}

impl UpdatePostThickness {
    #[must_use]
    pub fn new(entity: EntityId, thickness: f64) -> Self {
        Self { entity, thickness }
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the entity is not a post
    /// or the thickness is non-positive, and `TopologyError::EntityNotFound`
    /// for a dead entity ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        ensure_positive("post thickness", self.thickness)?;
        let entity = model.store.entity_mut(self.entity)?;
        match &mut entity.kind {
            EntityKind::Post { thickness } => {
                *thickness = self.thickness;
                Ok(())
            }
            EntityKind::Opening { .. } => Err(OperationError::InvalidInput(
                "entity is an opening, not a post".into(),
            )
            .into()),
        }
    }
}

/// Deletes an entity from its wall.
#[derive(Debug)]
pub struct RemoveEntity {
    entity: EntityId,
}

impl RemoveEntity {
    #[must_use]
    pub fn new(entity: EntityId) -> Self {
        Self { entity }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead entity ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        let wall_id = model.store.entity(self.entity)?.wall;
        model
            .store
            .wall_mut(wall_id)?
            .entity_ids
            .retain(|&e| e != self.entity);
        gc::sweep(model);
        Ok(())
    }
}
