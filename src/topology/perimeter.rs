use serde::{Deserialize, Serialize};

use super::corner::CornerId;
use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for a perimeter in the topology store.
    pub struct PerimeterId;
}

/// Opaque identifier of the storey a perimeter belongs to.
///
/// Minted by the storey CRUD slice; carries no structural meaning here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreyId(pub u64);

/// Which offset surface of the walls is the authoritative input.
///
/// The reference polygon lies on this side; the opposite side is derived
/// by offsetting each wall by its thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSide {
    Inside,
    Outside,
}

/// Data associated with a closed building perimeter.
///
/// `wall_ids` and `corner_ids` are parallel cyclic sequences of equal
/// length N ≥ 3: `corner_ids[i]` is the start corner of `wall_ids[i]`,
/// and `wall_ids[i]` ends at `corner_ids[(i + 1) % N]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterData {
    /// The storey this perimeter outlines.
    pub storey: StoreyId,
    /// Which side the reference polygon lies on.
    pub reference_side: ReferenceSide,
    /// Walls in cyclic order.
    pub wall_ids: Vec<WallId>,
    /// Corners in cyclic order, parallel to `wall_ids`.
    pub corner_ids: Vec<CornerId>,
}

impl PerimeterData {
    /// Number of walls (equal to the number of corners).
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.wall_ids.len()
    }

    /// Cyclic index of a wall, if it belongs to this perimeter.
    #[must_use]
    pub fn wall_index(&self, id: WallId) -> Option<usize> {
        self.wall_ids.iter().position(|&w| w == id)
    }

    /// Cyclic index of a corner, if it belongs to this perimeter.
    #[must_use]
    pub fn corner_index(&self, id: CornerId) -> Option<usize> {
        self.corner_ids.iter().position(|&c| c == id)
    }
}
