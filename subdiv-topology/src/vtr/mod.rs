//! Vectorized topology representation.
//!
//! The building blocks the [`TopologyRefiner`](crate::far::TopologyRefiner)
//! is assembled from:
//! * [`Level`] – One snapshot of mesh topology, with all incidence relations
//!   and per-component tags.
//! * [`Refinement`] – Produces the child [`Level`] of a parent [`Level`] and
//!   records the mapping between their components.
//! * [`SparseSelector`] – Marks the subset of a parent [`Level`] to be refined
//!   by a sparse [`Refinement`].
pub mod level;
pub mod refinement;
pub mod sparse_selector;

mod relation;

pub use level::{CompositeVTag, ETag, Level, VTag};
pub use refinement::{ComponentOrigin, Refinement, RefinementOptions};
pub use sparse_selector::SparseSelector;
