//! Feature adaptive representation.
//!
//! The [`TopologyRefiner`] owns the hierarchy of refined topology, built from
//! a [`TopologyDescriptor`] and inspected level by level through
//! [`TopologyLevel`]s.
pub mod feature_adaptive;
pub mod topology_descriptor;
pub mod topology_level;
pub mod topology_refiner;

pub use feature_adaptive::FaceSelection;
pub use topology_descriptor::TopologyDescriptor;
pub use topology_level::{FaceVerticesIter, TopologyLevel};
pub use topology_refiner::{
    AdaptiveRefinementOptions, BoundaryInterpolation, CreasingMethod,
    FaceVaryingLinearInterpolation, Scheme, TopologyRefiner, TopologyRefinerOptions,
    TriangleSubdivision, UniformRefinementOptions,
};

#[cfg(feature = "rayon")]
pub use topology_level::FaceVerticesParIter;
