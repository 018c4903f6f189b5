use serde::{Deserialize, Serialize};

use crate::error::{Result, TopologyError};
use crate::geometry::{
    derive_perimeter, CornerGeometry, EntityGeometry, GeometryCache, PerimeterGeometry,
    WallGeometry,
};
use crate::topology::{
    CornerData, CornerId, EntityData, EntityId, PerimeterData, PerimeterId, PerimeterStore,
    StoreyId, WallData, WallId,
};

/// The perimeter model: stored topology plus its derived-geometry cache.
///
/// This is an explicit context object owned by the caller; there is no
/// ambient global state. All mutation goes through the operation structs in
/// [`crate::operations`]; each operation runs to completion and leaves the
/// cache fully re-derived, so readers always observe a consistent snapshot.
///
/// The serialized form contains only the stored topology. After
/// deserializing, [`Model::regenerate_all`] must run before any
/// geometry-dependent read is served.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Model {
    pub(crate) store: PerimeterStore,
    #[serde(skip)]
    pub(crate) geometry: GeometryCache,
}

/// A stored perimeter paired with its derived geometry.
#[derive(Debug, Clone, Copy)]
pub struct PerimeterView<'a> {
    pub id: PerimeterId,
    pub data: &'a PerimeterData,
    pub geometry: &'a PerimeterGeometry,
}

/// A stored wall paired with its derived geometry.
#[derive(Debug, Clone, Copy)]
pub struct WallView<'a> {
    pub id: WallId,
    pub data: &'a WallData,
    pub geometry: &'a WallGeometry,
}

/// A stored corner paired with its derived geometry.
#[derive(Debug, Clone, Copy)]
pub struct CornerView<'a> {
    pub id: CornerId,
    pub data: &'a CornerData,
    pub geometry: &'a CornerGeometry,
}

/// A stored wall entity paired with its derived geometry.
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    pub id: EntityId,
    pub data: &'a EntityData,
    pub geometry: &'a EntityGeometry,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the stored topology.
    #[must_use]
    pub fn store(&self) -> &PerimeterStore {
        &self.store
    }

    // --- Stored-data queries ---

    /// Returns perimeter data by ID.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn perimeter(&self, id: PerimeterId) -> Result<&PerimeterData> {
        Ok(self.store.perimeter(id)?)
    }

    /// Returns wall data by ID.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn wall(&self, id: WallId) -> Result<&WallData> {
        Ok(self.store.wall(id)?)
    }

    /// Returns corner data by ID.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn corner(&self, id: CornerId) -> Result<&CornerData> {
        Ok(self.store.corner(id)?)
    }

    /// Returns entity data by ID.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn entity(&self, id: EntityId) -> Result<&EntityData> {
        Ok(self.store.entity(id)?)
    }

    /// All perimeters on a storey.
    #[must_use]
    pub fn perimeters_on_storey(&self, storey: StoreyId) -> Vec<PerimeterId> {
        self.store
            .perimeters()
            .filter(|(_, p)| p.storey == storey)
            .map(|(id, _)| id)
            .collect()
    }

    /// Walls of a perimeter in cyclic order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn walls_of(&self, id: PerimeterId) -> Result<&[WallId]> {
        Ok(&self.store.perimeter(id)?.wall_ids)
    }

    /// Corners of a perimeter in cyclic order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn corners_of(&self, id: PerimeterId) -> Result<&[CornerId]> {
        Ok(&self.store.perimeter(id)?.corner_ids)
    }

    /// Entities mounted on a wall, ordered by center offset.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn entities_of(&self, id: WallId) -> Result<&[EntityId]> {
        Ok(&self.store.wall(id)?.entity_ids)
    }

    // --- Derived-geometry queries ---

    /// Derived geometry of a perimeter.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if no geometry is cached for
    /// this ID.
    pub fn perimeter_geometry(&self, id: PerimeterId) -> Result<&PerimeterGeometry> {
        self.geometry
            .perimeters
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("perimeter geometry").into())
    }

    /// Derived geometry of a wall.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if no geometry is cached for
    /// this ID.
    pub fn wall_geometry(&self, id: WallId) -> Result<&WallGeometry> {
        self.geometry
            .walls
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall geometry").into())
    }

    /// Derived geometry of a corner.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if no geometry is cached for
    /// this ID.
    pub fn corner_geometry(&self, id: CornerId) -> Result<&CornerGeometry> {
        self.geometry
            .corners
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("corner geometry").into())
    }

    /// Derived geometry of a wall entity.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if no geometry is cached for
    /// this ID.
    pub fn entity_geometry(&self, id: EntityId) -> Result<&EntityGeometry> {
        self.geometry
            .entities
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("entity geometry").into())
    }

    /// Perimeter data joined with its derived geometry.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID or a missing
    /// cache entry.
    pub fn perimeter_with_geometry(&self, id: PerimeterId) -> Result<PerimeterView<'_>> {
        Ok(PerimeterView {
            id,
            data: self.perimeter(id)?,
            geometry: self.perimeter_geometry(id)?,
        })
    }

    /// Wall data joined with its derived geometry.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID or a missing
    /// cache entry.
    pub fn wall_with_geometry(&self, id: WallId) -> Result<WallView<'_>> {
        Ok(WallView {
            id,
            data: self.wall(id)?,
            geometry: self.wall_geometry(id)?,
        })
    }

    /// Corner data joined with its derived geometry.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID or a missing
    /// cache entry.
    pub fn corner_with_geometry(&self, id: CornerId) -> Result<CornerView<'_>> {
        Ok(CornerView {
            id,
            data: self.corner(id)?,
            geometry: self.corner_geometry(id)?,
        })
    }

    /// Entity data joined with its derived geometry.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID or a missing
    /// cache entry.
    pub fn entity_with_geometry(&self, id: EntityId) -> Result<EntityView<'_>> {
        Ok(EntityView {
            id,
            data: self.entity(id)?,
            geometry: self.entity_geometry(id)?,
        })
    }

    // --- Derivation ---

    /// Re-derives one perimeter and swaps the result into the cache.
    ///
    /// # Errors
    ///
    /// Propagates derivation errors; the cache is left untouched on failure.
    pub(crate) fn rederive(&mut self, id: PerimeterId) -> Result<()> {
        let derived = derive_perimeter(&self.store, id)?;
        self.geometry.apply(id, derived);
        Ok(())
    }

    /// Discards the whole geometry cache and re-derives every stored
    /// perimeter.
    ///
    /// Must run after loading a persisted model before any
    /// geometry-dependent read.
    ///
    /// # Errors
    ///
    /// Propagates derivation errors.
    pub fn regenerate_all(&mut self) -> Result<()> {
        self.geometry.clear();
        let ids: Vec<PerimeterId> = self.store.perimeter_ids().collect();
        for id in ids {
            self.rederive(id)?;
        }
        Ok(())
    }
}
