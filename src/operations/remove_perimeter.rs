use crate::error::Result;
use crate::model::Model;
use crate::topology::PerimeterId;

use super::gc;

/// Deletes a perimeter and everything it owns.
///
/// Walls, corners, mounted entities, and all matching geometry-cache
/// entries are cleaned up by the garbage collector.
#[derive(Debug)]
pub struct RemovePerimeter {
    perimeter: PerimeterId,
}

impl RemovePerimeter {
    /// Creates a new `RemovePerimeter` operation.
    #[must_use]
    pub fn new(perimeter: PerimeterId) -> Self {
        Self { perimeter }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dead ID.
    pub fn execute(&self, model: &mut Model) -> Result<()> {
        model.store.perimeter(self.perimeter)?;
        model.store.remove_perimeter(self.perimeter);
        gc::sweep(model);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::rect_model;

    #[test]
    fn cascades_to_all_owned_entities() {
        let (mut model, pid) = rect_model();
        RemovePerimeter::new(pid).execute(&mut model).unwrap();

        assert!(model.perimeter(pid).is_err());
        assert_eq!(model.store().wall_ids().count(), 0);
        assert_eq!(model.store().corner_ids().count(), 0);
        assert_eq!(model.store().entity_ids().count(), 0);
        assert_eq!(model.geometry.walls.len(), 0);
        assert_eq!(model.geometry.corners.len(), 0);
        assert_eq!(model.geometry.perimeters.len(), 0);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let (mut model, pid) = rect_model();
        RemovePerimeter::new(pid).execute(&mut model).unwrap();
        assert!(RemovePerimeter::new(pid).execute(&mut model).is_err());
    }
}
