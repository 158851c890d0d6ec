//#![warn(missing_docs)]
//! # Subdivision Topology Refinement
//!
//! A pure Rust take on the topology side of [*Pixar’s
//! OpenSubdiv*](https://graphics.pixar.com/opensubdiv/): building a
//! multi-resolution hierarchy of mesh topology by repeatedly applying a
//! [subdivision surface](https://en.wikipedia.org/wiki/Subdivision_surface)
//! scheme to a base mesh.
//!
//! Refinement is either *uniform* (every component refined at every level) or
//! *feature adaptive* (only faces around extraordinary vertices, creases,
//! darts and non-manifold features are refined, producing a sparse hierarchy).
//!
//! This crate deals with topology only. Vertex positions, limit surface
//! evaluation and stencils are the business of downstream code.
//!
//! ## Modules
//!
//! The namespaces mirror the ones of the C++ library:
//! * [`sdc`] – Subdivision schemes, their options and the crease rules.
//! * [`vtr`] – The per-level topology container ([`Level`](vtr::Level)), the
//!   single-step [`Refinement`](vtr::Refinement) operator and the
//!   [`SparseSelector`](vtr::SparseSelector).
//! * [`far`] – The [`TopologyRefiner`](far::TopologyRefiner) that owns the
//!   level hierarchy and drives uniform and feature-adaptive refinement.
//!
//! ## Example
//!
//! ```
//! use subdiv_topology::far::{
//!     TopologyDescriptor, TopologyRefiner, TopologyRefinerOptions,
//!     UniformRefinementOptions,
//! };
//!
//! // A cube.
//! let vertices_per_face = [4; 6];
//! let face_vertices = [
//!     0, 1, 3, 2, 2, 3, 5, 4, 4, 5, 7, 6, 6, 7, 1, 0, 1, 7, 5, 3, 6, 0, 2, 4,
//! ];
//!
//! let descriptor = TopologyDescriptor::new(8, &vertices_per_face, &face_vertices)?;
//! let mut refiner = TopologyRefiner::new(descriptor, TopologyRefinerOptions::default())?;
//!
//! refiner.refine_uniform(UniformRefinementOptions {
//!     refinement_level: 2,
//!     ..Default::default()
//! })?;
//!
//! assert_eq!(refiner.refinement_levels(), 3);
//! assert_eq!(refiner.level(2).unwrap().vertex_count(), 98);
//! # Ok::<(), subdiv_topology::Error>(())
//! ```
//!
//! ## Features
#![doc = document_features::document_features!()]
//!
//! ## API Conventions
//!
//! * Canonical Rust naming – `GetNumVertices()` becomes `vertex_count()`.
//! * Options use the [init struct
//!   pattern](https://xaeroxe.github.io/init-struct-pattern/).
//! * Unsigned integer types, `usize` and `u32`, for anything that can only
//!   contain positive values (indices, counts, valences).
//! * Lookups that may legitimately find nothing return an [`Option`].
//!   Misuse of the refinement drivers returns an [`Error`].
use bytemuck::{Pod, Zeroable};
use derive_more::{Display, From, Into};

pub mod error;
pub mod far;
pub mod sdc;
pub mod vtr;

pub use error::{Error, Result};

/// A vertex, edge, or face index in the topology.
///
/// # Examples
///
/// ```
/// use subdiv_topology::Index;
///
/// // Create an index from a u32
/// let idx = Index::from(42u32);
/// assert_eq!(idx.0, 42);
///
/// // Convert back to u32
/// let value: u32 = idx.into();
/// assert_eq!(value, 42);
///
/// // Create from usize
/// let idx = Index::from(100usize);
/// let as_usize: usize = idx.into();
/// assert_eq!(as_usize, 100);
/// ```
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Pod,
    Zeroable,
)]
#[repr(transparent)]
pub struct Index(pub u32);

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index(value as u32)
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        index.0 as usize
    }
}

impl Index {
    /// Returns the index as a `usize`, for indexing into slices.
    #[inline]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// The position of a component within one of its incident neighbors.
///
/// If vertex `V` is the `k`th vertex of face `F`, the local index of `V` in `F`
/// is `k`.
pub type LocalIndex = u16;
