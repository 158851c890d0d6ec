//! Error types for the subdiv-topology crate.

use thiserror::Error;

use crate::sdc::Scheme;

/// Main error type for topology refinement operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid topology descriptor.
    #[error("Invalid topology descriptor: {0}")]
    InvalidTopology(String),

    /// Refinement was requested before the base level was populated.
    ///
    /// This is the case for a refiner created with
    /// [`TopologyRefiner::empty()`](crate::far::TopologyRefiner::empty) or
    /// after [`TopologyRefiner::clear()`](crate::far::TopologyRefiner::clear).
    #[error("The base level has no vertices; assign a base topology before refining")]
    EmptyBaseLevel,

    /// The operation is not implemented for the refiner's scheme.
    #[error("{operation} is not supported for the {scheme} scheme")]
    UnsupportedScheme {
        scheme: Scheme,
        operation: &'static str,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
