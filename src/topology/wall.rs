use serde::{Deserialize, Serialize};

use super::corner::CornerId;
use super::entity::EntityId;
use super::perimeter::PerimeterId;

slotmap::new_key_type! {
    /// Unique identifier for a wall in the topology store.
    pub struct WallId;
}

/// Opaque identifier of a wall or ring-beam assembly from the
/// configuration catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyId(pub u64);

/// Data associated with a perimeter wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallData {
    /// The perimeter this wall belongs to.
    pub perimeter: PerimeterId,
    /// Corner at the wall's start (in cyclic order).
    pub start_corner: CornerId,
    /// Corner at the wall's end.
    pub end_corner: CornerId,
    /// Wall thickness, always positive.
    pub thickness: f64,
    /// Wall assembly from the configuration catalog.
    pub assembly: AssemblyId,
    /// Mounted openings and posts, kept sorted by center offset.
    pub entity_ids: Vec<EntityId>,
    /// Optional ring-beam assemblies carried by this wall.
    pub ring_beams: Vec<AssemblyId>,
}
