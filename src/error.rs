use thiserror::Error;

/// Top-level error type for the Murus perimeter kernel.
#[derive(Debug, Error)]
pub enum MurusError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised by geometry derivation.
///
/// These indicate corrupted topology (validated edits never produce them)
/// and are propagated as fatal rather than recovered.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to the topology store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised when a caller violates an operation precondition.
///
/// Structurally well-formed edits that would merely violate a polygon or
/// placement invariant are not errors; operations report those as
/// `Ok(None)` / `Ok(false)` rejections instead.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`MurusError`].
pub type Result<T> = std::result::Result<T, MurusError>;
