use serde::{Deserialize, Serialize};

use super::perimeter::PerimeterId;
use super::wall::WallId;
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a corner in the topology store.
    pub struct CornerId;
}

/// Which of a corner's two adjacent walls geometrically extends into the
/// corner area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructedBy {
    PreviousWall,
    NextWall,
}

/// Data associated with a perimeter corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornerData {
    /// The perimeter this corner belongs to.
    pub perimeter: PerimeterId,
    /// Wall ending at this corner.
    pub previous_wall: WallId,
    /// Wall starting at this corner.
    pub next_wall: WallId,
    /// Author-controlled coordinate on the reference-side polygon.
    pub reference_point: Point2,
    /// Construction ownership of the corner area.
    pub constructed_by: ConstructedBy,
}
