//! Subdivision schemes and the options that shape their limit surfaces.
//!
//! The [`Scheme`] determines the regular face size and vertex valences (see
//! [`SchemeTraits`]) as well as how faces are split during refinement. The
//! [`Options`] determine how boundaries, face-varying data and semi-sharp
//! creases are treated.
use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub mod crease;

pub use crease::{Crease, Rule, RuleMask};

/// Subdivision scheme.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Display, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Bilinear interpolation. Topologically identical to
    /// [`CatmullClark`](Scheme::CatmullClark).
    Bilinear = 0,
    /// Catmull-Clark. Splits every face into quads.
    CatmullClark = 1,
    /// Loop. Splits every triangle into four triangles. Only applies to pure
    /// triangle meshes.
    Loop = 2,
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme::CatmullClark
    }
}

/// How a parent face is split into child faces.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    /// An `N`-sided face becomes `N` quads around a new face-vertex.
    ToQuads = 0,
    /// A triangle becomes three corner triangles and one center triangle.
    ToTris = 1,
}

/// Topological constants of a [`Scheme`].
///
/// Valences are given as incident face counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SchemeTraits {
    pub split: Split,
    /// Number of vertices of a regular face.
    pub regular_face_size: usize,
    /// Incident faces of a regular interior vertex.
    pub regular_vertex_valence: usize,
    /// Incident faces of a regular boundary vertex.
    pub regular_boundary_valence: usize,
    /// Incident faces of a regular (infinitely sharp) corner vertex.
    pub regular_corner_valence: usize,
}

impl Scheme {
    /// Returns the topological constants of this scheme.
    #[inline]
    pub const fn traits(self) -> SchemeTraits {
        match self {
            Scheme::Bilinear | Scheme::CatmullClark => SchemeTraits {
                split: Split::ToQuads,
                regular_face_size: 4,
                regular_vertex_valence: 4,
                regular_boundary_valence: 2,
                regular_corner_valence: 1,
            },
            Scheme::Loop => SchemeTraits {
                split: Split::ToTris,
                regular_face_size: 3,
                regular_vertex_valence: 6,
                regular_boundary_valence: 3,
                regular_corner_valence: 2,
            },
        }
    }

    /// Returns the number of vertices of a regular face.
    ///
    /// Faces of any other size are split into one ptex face per corner.
    #[inline]
    pub const fn regular_face_size(self) -> usize {
        self.traits().regular_face_size
    }
}

/// Boundary interpolation rules.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryInterpolation {
    /// No boundary edge interpolation is applied by default. Boundary faces
    /// are not sharpened.
    None = 0,
    /// Sharpen edges. The smooth curve resulting on the boundary is what the
    /// subdivision surface of the boundary faces extends.
    EdgeOnly = 1,
    /// Similar to edge-only but the smooth curve resulting on the boundary is
    /// made to interpolate corner vertices (vertices with exactly one incident
    /// face).
    EdgeAndCorner = 2,
}

/// Face-varying linear interpolation rules.
///
/// These only affect the interpolation weights of face-varying data, not the
/// face-varying topology this crate refines.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceVaryingLinearInterpolation {
    /// Smooth everywhere the mesh is smooth.
    None = 0,
    /// Linearly interpolate (sharpen or pin) corners only.
    CornersOnly = 1,
    /// `CornersOnly` + sharpening of junctions of three or more regions.
    CornersPlusOne = 2,
    /// `CornersPlusOne` + sharpening of darts and concave corners.
    CornersPlusTwo = 3,
    /// Linear interpolation along all boundary edges and corners.
    Boundaries = 4,
    /// Linear interpolation everywhere (boundaries and interior).
    All = 5,
}

/// Semi-sharp crease subdivision rules.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CreasingMethod {
    /// Apply regular, *Catmull-Clark* semi-sharp crease rules.
    ///
    /// * Note that this may give a jagged look when crease values vary along
    ///   an [edge loop](https://en.wikipedia.org/wiki/Edge_loop).
    Uniform = 0,
    /// Apply *Chaikin* semi-sharp crease rules.
    ///
    /// The *Chaikin Rule* is a variation of the semi-sharp creasing method
    /// that attempts to improve the appearance of creases along a sequence of
    /// connected edges when the sharpness values differ. This choice modifies
    /// the subdivision of sharpness values using Chaikin's curve subdivision
    /// algorithm to consider all sharpness values of edges around a common
    /// vertex when determining the sharpness of child edges.
    Chaikin = 1,
}

impl Default for CreasingMethod {
    fn default() -> Self {
        CreasingMethod::Uniform
    }
}

/// Triangle weights for the *Catmull-Clark* scheme.
#[repr(u32)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TriangleSubdivision {
    /// Default *Catmull-Clark* scheme weights at triangles.
    CatmullClark = 0,
    /// Modifies the subdivision behavior at triangular faces to improve the
    /// undesirable surface artefacts that often result in such areas.
    Smooth = 1,
}

impl Default for TriangleSubdivision {
    fn default() -> Self {
        TriangleSubdivision::CatmullClark
    }
}

/// Options applied to a subdivision [`Scheme`].
///
/// These are treated as opaque by the refinement drivers and passed through
/// to each [`Refinement`](crate::vtr::Refinement). Only the boundary
/// interpolation and the creasing method influence topology.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub boundary_interpolation: Option<BoundaryInterpolation>,
    pub face_varying_linear_interpolation: Option<FaceVaryingLinearInterpolation>,
    pub creasing_method: CreasingMethod,
    pub triangle_subdivision: TriangleSubdivision,
}

impl Options {
    /// Returns `true` if boundary edges are made infinitely sharp.
    #[inline]
    pub fn sharpens_boundary_edges(&self) -> bool {
        matches!(
            self.boundary_interpolation,
            Some(BoundaryInterpolation::EdgeOnly | BoundaryInterpolation::EdgeAndCorner)
        )
    }

    /// Returns `true` if boundary vertices with a single incident face are
    /// made infinitely sharp corners.
    #[inline]
    pub fn sharpens_boundary_corners(&self) -> bool {
        self.boundary_interpolation == Some(BoundaryInterpolation::EdgeAndCorner)
    }
}
