pub mod derive;

pub use derive::{derive_perimeter, DerivedPerimeter};

use slotmap::SecondaryMap;

use crate::math::{Point2, Vector2};
use crate::topology::{CornerId, EntityId, PerimeterId, PerimeterStore, WallId};

/// Derived geometry of a corner. Never persisted; rebuilt on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerGeometry {
    /// Corner point on the inside surface (mitre intersection or fallback).
    pub inside_point: Point2,
    /// Corner point on the outside surface.
    pub outside_point: Point2,
    /// Interior angle in rounded integer degrees.
    pub interior_angle: i32,
    /// Exterior angle in rounded integer degrees, `360 - interior_angle`.
    pub exterior_angle: i32,
    /// Corner area between the adjacent walls' trimmed polygons.
    /// Empty when the walls meet flush at the mitre point.
    pub polygon: Vec<Point2>,
}

/// Derived geometry of a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallGeometry {
    /// Usable inside segment, `[start, end]`.
    pub inside_line: [Point2; 2],
    /// Usable outside segment, `[start, end]`.
    pub outside_line: [Point2; 2],
    /// Placement domain length: distance between the chosen inside endpoints.
    pub wall_length: f64,
    /// Length of the inside segment.
    pub inside_length: f64,
    /// Length of the outside segment.
    pub outside_length: f64,
    /// Unit direction along the reference edge, start to end.
    pub direction: Vector2,
    /// Unit direction along the outside segment.
    pub outside_direction: Vector2,
    /// Wall body quad: inside start, inside end, outside end, outside start.
    pub polygon: Vec<Point2>,
}

/// Derived geometry of a wall-mounted entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGeometry {
    /// Entity footprint on the inside line, `[start, end]`.
    pub inside_line: [Point2; 2],
    /// Entity footprint on the outside line, `[start, end]`.
    pub outside_line: [Point2; 2],
    /// Footprint rectangle spanning inside to outside.
    pub polygon: Vec<Point2>,
    /// Center of the footprint rectangle.
    pub center: Point2,
}

/// Derived geometry of a whole perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct PerimeterGeometry {
    /// Inside corner points in cyclic order.
    pub inner_polygon: Vec<Point2>,
    /// Outside corner points in cyclic order.
    pub outer_polygon: Vec<Point2>,
}

/// Sidecar tables holding all derived geometry, keyed by the owning IDs.
///
/// The cache is updated wholesale per perimeter: a full
/// [`DerivedPerimeter`] is computed first and swapped in afterwards, so
/// readers never observe a partially derived state.
#[derive(Debug, Default)]
pub struct GeometryCache {
    pub perimeters: SecondaryMap<PerimeterId, PerimeterGeometry>,
    pub walls: SecondaryMap<WallId, WallGeometry>,
    pub corners: SecondaryMap<CornerId, CornerGeometry>,
    pub entities: SecondaryMap<EntityId, EntityGeometry>,
}

impl GeometryCache {
    /// Swaps a freshly derived perimeter into the cache.
    pub fn apply(&mut self, id: PerimeterId, derived: DerivedPerimeter) {
        self.perimeters.insert(id, derived.perimeter);
        for (wall_id, geometry) in derived.walls {
            self.walls.insert(wall_id, geometry);
        }
        for (corner_id, geometry) in derived.corners {
            self.corners.insert(corner_id, geometry);
        }
        for (entity_id, geometry) in derived.entities {
            self.entities.insert(entity_id, geometry);
        }
    }

    /// Drops cached entries whose owning ID is no longer in the store.
    pub fn purge_dead(&mut self, store: &PerimeterStore) {
        self.perimeters.retain(|id, _| store.perimeter(id).is_ok());
        self.walls.retain(|id, _| store.contains_wall(id));
        self.corners.retain(|id, _| store.contains_corner(id));
        self.entities.retain(|id, _| store.contains_entity(id));
    }

    /// Drops every cached entry.
    pub fn clear(&mut self) {
        self.perimeters.clear();
        self.walls.clear();
        self.corners.clear();
        self.entities.clear();
    }
}
