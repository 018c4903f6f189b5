pub mod error;
pub mod geometry;
pub mod math;
pub mod model;
pub mod operations;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{MurusError, Result};
pub use model::Model;
