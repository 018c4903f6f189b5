pub mod add_perimeter;
pub mod entities;
pub mod gc;
pub mod placement;
pub mod remove_corner;
pub mod remove_perimeter;
pub mod remove_wall;
pub mod split_wall;
pub mod update;

pub use add_perimeter::AddPerimeter;
pub use entities::{
    AddOpening, AddPost, RemoveEntity, UpdateEntityPlacement, UpdateOpeningParams,
    UpdatePostThickness,
};
pub use placement::find_nearest_valid_position;
pub use remove_corner::RemoveCorner;
pub use remove_perimeter::RemovePerimeter;
pub use remove_wall::RemoveWall;
pub use split_wall::SplitWall;
pub use update::{
    MovePerimeter, SetReferenceSide, UpdateBoundary, UpdateCornerConstructedBy,
    UpdatePerimeterThickness, UpdateWallAssembly, UpdateWallRingBeams, UpdateWallThickness,
};
