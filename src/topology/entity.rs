use serde::{Deserialize, Serialize};

use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for a wall-mounted entity in the topology store.
    pub struct EntityId;
}

/// Type-specific payload of a wall-mounted entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A window or door opening.
    Opening {
        /// Opening height, always positive.
        height: f64,
        /// Height of the sill above the floor, non-negative.
        sill_height: f64,
    },
    /// A structural post embedded in the wall.
    Post {
        /// Post depth across the wall, always positive.
        thickness: f64,
    },
}

/// Data associated with a wall-mounted entity (opening or post).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    /// The wall this entity is mounted on.
    pub wall: WallId,
    /// Center position measured from the wall start along the inside line.
    pub center_offset: f64,
    /// Extent along the wall, always positive.
    pub width: f64,
    /// Opening- or post-specific fields.
    pub kind: EntityKind,
}

impl EntityData {
    /// The along-wall interval `[center - width/2, center + width/2]`
    /// occupied by this entity.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        let half = self.width / 2.0;
        (self.center_offset - half, self.center_offset + half)
    }

    /// Whether this entity is a post.
    #[must_use]
    pub fn is_post(&self) -> bool {
        matches!(self.kind, EntityKind::Post { .. })
    }
}
