pub mod corner;
pub mod entity;
pub mod perimeter;
pub mod wall;

pub use corner::{ConstructedBy, CornerData, CornerId};
pub use entity::{EntityData, EntityId, EntityKind};
pub use perimeter::{PerimeterData, PerimeterId, ReferenceSide, StoreyId};
pub use wall::{AssemblyId, WallData, WallId};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::TopologyError;

/// Central arena that owns all stored perimeter topology.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
/// Derived geometry is never stored here; see
/// [`crate::geometry::GeometryCache`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PerimeterStore {
    perimeters: SlotMap<PerimeterId, PerimeterData>,
    walls: SlotMap<WallId, WallData>,
    corners: SlotMap<CornerId, CornerData>,
    entities: SlotMap<EntityId, EntityData>,
}

impl PerimeterStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Perimeter operations ---

    /// Inserts a perimeter and returns its ID.
    pub fn add_perimeter(&mut self, data: PerimeterData) -> PerimeterId {
        self.perimeters.insert(data)
    }

    /// Returns a reference to the perimeter data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn perimeter(&self, id: PerimeterId) -> Result<&PerimeterData, TopologyError> {
        self.perimeters
            .get(id)
            .ok_or(TopologyError::EntityNotFound("perimeter"))
    }

    /// Returns a mutable reference to the perimeter data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn perimeter_mut(&mut self, id: PerimeterId) -> Result<&mut PerimeterData, TopologyError> {
        self.perimeters
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("perimeter"))
    }

    /// Removes a perimeter, returning its data if it existed.
    pub fn remove_perimeter(&mut self, id: PerimeterId) -> Option<PerimeterData> {
        self.perimeters.remove(id)
    }

    /// Iterates over all perimeters.
    pub fn perimeters(&self) -> impl Iterator<Item = (PerimeterId, &PerimeterData)> {
        self.perimeters.iter()
    }

    /// Iterates over all perimeter IDs.
    pub fn perimeter_ids(&self) -> impl Iterator<Item = PerimeterId> + '_ {
        self.perimeters.keys()
    }

    // --- Wall operations ---

    /// Inserts a wall and returns its ID.
    pub fn add_wall(&mut self, data: WallData) -> WallId {
        self.walls.insert(data)
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wall(&self, id: WallId) -> Result<&WallData, TopologyError> {
        self.walls.get(id).ok_or(TopologyError::EntityNotFound("wall"))
    }

    /// Returns a mutable reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wall_mut(&mut self, id: WallId) -> Result<&mut WallData, TopologyError> {
        self.walls
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("wall"))
    }

    /// Removes a wall, returning its data if it existed.
    pub fn remove_wall(&mut self, id: WallId) -> Option<WallData> {
        self.walls.remove(id)
    }

    /// Whether a wall with this ID exists.
    #[must_use]
    pub fn contains_wall(&self, id: WallId) -> bool {
        self.walls.contains_key(id)
    }

    /// Iterates over all walls.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> {
        self.walls.iter()
    }

    /// Iterates over all wall IDs.
    pub fn wall_ids(&self) -> impl Iterator<Item = WallId> + '_ {
        self.walls.keys()
    }

    // --- Corner operations ---

    /// Inserts a corner and returns its ID.
    pub fn add_corner(&mut self, data: CornerData) -> CornerId {
        self.corners.insert(data)
    }

    /// Returns a reference to the corner data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn corner(&self, id: CornerId) -> Result<&CornerData, TopologyError> {
        self.corners
            .get(id)
            .ok_or(TopologyError::EntityNotFound("corner"))
    }

    /// Returns a mutable reference to the corner data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn corner_mut(&mut self, id: CornerId) -> Result<&mut CornerData, TopologyError> {
        self.corners
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("corner"))
    }

    /// Removes a corner, returning its data if it existed.
    pub fn remove_corner(&mut self, id: CornerId) -> Option<CornerData> {
        self.corners.remove(id)
    }

    /// Whether a corner with this ID exists.
    #[must_use]
    pub fn contains_corner(&self, id: CornerId) -> bool {
        self.corners.contains_key(id)
    }

    /// Iterates over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId> + '_ {
        self.corners.keys()
    }

    // --- Entity operations ---

    /// Inserts a wall-mounted entity and returns its ID.
    pub fn add_entity(&mut self, data: EntityData) -> EntityId {
        self.entities.insert(data)
    }

    /// Returns a reference to the entity data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn entity(&self, id: EntityId) -> Result<&EntityData, TopologyError> {
        self.entities
            .get(id)
            .ok_or(TopologyError::EntityNotFound("wall entity"))
    }

    /// Returns a mutable reference to the entity data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut EntityData, TopologyError> {
        self.entities
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("wall entity"))
    }

    /// Removes an entity, returning its data if it existed.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<EntityData> {
        self.entities.remove(id)
    }

    /// Whether an entity with this ID exists.
    #[must_use]
    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Iterates over all entities.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &EntityData)> {
        self.entities.iter()
    }

    /// Iterates over all entity IDs.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Retains only the walls for which the predicate holds.
    pub(crate) fn retain_walls(&mut self, mut keep: impl FnMut(WallId, &WallData) -> bool) {
        self.walls.retain(|id, data| keep(id, data));
    }

    /// Retains only the corners for which the predicate holds.
    pub(crate) fn retain_corners(&mut self, mut keep: impl FnMut(CornerId, &CornerData) -> bool) {
        self.corners.retain(|id, data| keep(id, data));
    }

    /// Retains only the entities for which the predicate holds.
    pub(crate) fn retain_entities(&mut self, mut keep: impl FnMut(EntityId, &EntityData) -> bool) {
        self.entities.retain(|id, data| keep(id, data));
    }
}
