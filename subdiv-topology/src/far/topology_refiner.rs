//! Topology refinement.
//!
//! [`TopologyRefiner`] owns a hierarchy of topology levels, starting with the
//! base mesh, and the refinements between consecutive levels.
//!
//! `TopologyRefiner` provides these refinement methods:
//! * [`refine_uniform()`](TopologyRefiner::refine_uniform()) – Does uniform
//!   refinenment as specified in the [`UniformRefinementOptions`].
//! * [`refine_adaptive()`](TopologyRefiner::refine_adaptive()) – Does
//!   feature-adaptive refinement as specified in the
//!   [`AdaptiveRefinementOptions`].
//!
//! The result can be accessed via:
//! * [`level()`](TopologyRefiner::level()) – Gives access to the refined
//!   topology at through a [`TopologyLevel`] instance.
//! * The `*_total_count()` methods, which sum over all levels.
//! * [`ptex_index()`](TopologyRefiner::ptex_index()) and
//!   [`ptex_face_count()`](TopologyRefiner::ptex_face_count()), which map
//!   base faces to a flat numbering of ptex faces.
use std::cell::OnceCell;
use tracing::debug;

use super::feature_adaptive::catmark_feature_adaptive_selector;
use super::topology_level::TopologyLevel;
use crate::far::TopologyDescriptor;
use crate::sdc;
use crate::vtr::{Level, Refinement, RefinementOptions, SparseSelector};
use crate::{Error, Result};

pub use crate::sdc::{
    BoundaryInterpolation, CreasingMethod, FaceVaryingLinearInterpolation, Scheme,
    TriangleSubdivision,
};

/// Levels reserved up front; typical adaptive depths stay below this.
const RESERVED_LEVELS: usize = 8;

/// Stores topology data for a specified set of refinement options.
///
/// The hierarchy always holds `refinements + 1` levels, except after
/// [`clear()`](TopologyRefiner::clear), when it holds none.
#[derive(Clone, Debug)]
pub struct TopologyRefiner {
    options: TopologyRefinerOptions,
    is_uniform: bool,
    max_level: usize,
    levels: Vec<Level>,
    refinements: Vec<Refinement>,
    // Cumulative ptex face counts of the base faces, followed by the total.
    ptex_indices: OnceCell<Vec<usize>>,
}

impl TopologyRefiner {
    /// Create a new topology refiner with the base level built from a
    /// descriptor.
    pub fn new(descriptor: TopologyDescriptor, options: TopologyRefinerOptions) -> Result<Self> {
        let mut refiner = Self::empty(options);
        refiner.set_base_topology(&descriptor)?;
        Ok(refiner)
    }

    /// Create a refiner whose base level is empty.
    ///
    /// Assign a base topology with
    /// [`set_base_topology()`](TopologyRefiner::set_base_topology) before
    /// refining.
    pub fn empty(options: TopologyRefinerOptions) -> Self {
        let mut levels = Vec::with_capacity(RESERVED_LEVELS);
        levels.push(Level::default());

        Self {
            options,
            is_uniform: true,
            max_level: 0,
            levels,
            refinements: Vec::with_capacity(RESERVED_LEVELS),
            ptex_indices: OnceCell::new(),
        }
    }

    /// Replaces the base level, discarding all refinement.
    ///
    /// On error the refiner is left untouched.
    pub fn set_base_topology(&mut self, descriptor: &TopologyDescriptor) -> Result<()> {
        let base = descriptor.build_level(self.options.scheme, &self.options.sdc_options())?;

        self.levels.clear();
        self.levels.push(base);
        self.refinements.clear();
        self.max_level = 0;
        self.is_uniform = true;
        self.ptex_indices.take();

        Ok(())
    }

    /// Returns the subdivision options.
    #[inline]
    pub fn options(&self) -> TopologyRefinerOptions {
        self.options
    }

    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.options.scheme
    }

    /// Returns true if uniform refinement has been applied.
    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.is_uniform
    }

    /// Returns the number of refinement levels.
    #[inline]
    pub fn refinement_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns the highest level of refinement.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns the maximum vertex valence in all levels
    pub fn max_valence(&self) -> usize {
        self.levels.iter().map(Level::max_valence).max().unwrap_or(0)
    }

    /// Returns a handle to access data specific to a particular refinement
    /// level.
    pub fn level(&self, level: usize) -> Option<TopologyLevel<'_>> {
        let parent_refinement = level
            .checked_sub(1)
            .and_then(|parent| self.refinements.get(parent));

        self.levels.get(level).map(|topology| {
            TopologyLevel::new(topology, parent_refinement, self.refinements.get(level))
        })
    }

    /// Unrefine the topology, keeping only the base level.
    pub fn unrefine(&mut self) {
        self.levels.truncate(1);
        if self.levels.is_empty() {
            self.levels.push(Level::default());
        }
        self.refinements.clear();
        self.max_level = 0;
    }

    /// Discards all levels including the base level.
    ///
    /// The refiner must be given a new base topology with
    /// [`set_base_topology()`](TopologyRefiner::set_base_topology) before it
    /// can be refined again.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.refinements.clear();
        self.max_level = 0;
        self.ptex_indices.take();
    }
}

/// ### Methods to Query Totals Over All Levels
impl TopologyRefiner {
    /// Returns the total number of vertices in all levels.
    #[inline]
    pub fn vertex_total_count(&self) -> usize {
        self.levels.iter().map(Level::vertex_count).sum()
    }

    /// Returns the total number of edges in all levels.
    #[inline]
    pub fn edge_total_count(&self) -> usize {
        self.levels.iter().map(Level::edge_count).sum()
    }

    /// Returns the total number of faces in all levels.
    #[inline]
    pub fn face_total_count(&self) -> usize {
        self.levels.iter().map(Level::face_count).sum()
    }

    /// Returns the total number of face vertices in all levels.
    #[inline]
    pub fn face_vertex_total_count(&self) -> usize {
        self.levels.iter().map(Level::face_vertex_count).sum()
    }

    /// Returns the total number of face-varying values of a channel in all
    /// levels.
    #[inline]
    pub fn face_varying_value_total_count(&self, channel: usize) -> usize {
        self.levels
            .iter()
            .map(|level| level.fvar_value_count(channel))
            .sum()
    }
}

/// ### Ptex Indexing
///
/// Every face of the base level whose size is the scheme's regular face size
/// maps to one ptex face; every other face maps to one ptex face per corner.
impl TopologyRefiner {
    fn ptex_indices(&self) -> &[usize] {
        self.ptex_indices.get_or_init(|| {
            let regular_face_size = self.options.scheme.regular_face_size();
            let base = self.levels.first();
            let face_count = base.map_or(0, Level::face_count);

            let mut indices = Vec::with_capacity(face_count + 1);
            let mut ptex_index = 0;
            if let Some(base) = base {
                for face in 0..face_count {
                    indices.push(ptex_index);
                    let size = base.face_vertices(face.into()).len();
                    ptex_index += if size == regular_face_size { 1 } else { size };
                }
            }
            indices.push(ptex_index);
            indices
        })
    }

    /// Returns the number of ptex faces of the base level.
    pub fn ptex_face_count(&self) -> usize {
        self.ptex_indices().last().copied().unwrap_or(0)
    }

    /// Returns the first ptex face of a base face, or `None` if there is no
    /// such face.
    pub fn ptex_index(&self, face: usize) -> Option<usize> {
        let indices = self.ptex_indices();
        // The last entry is the total, not a face.
        indices[..indices.len() - 1].get(face).copied()
    }
}

/// ### Refinement
impl TopologyRefiner {
    /// Refine the topology uniformly.
    ///
    /// This method applies uniform refinement to the level specified in the
    /// given [`UniformRefinementOptions`]s. Any previous refinement is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBaseLevel`] if there is no base topology.
    pub fn refine_uniform(&mut self, options: UniformRefinementOptions) -> Result<()> {
        self.check_base_level()?;

        let depth = options.refinement_level;
        self.is_uniform = true;
        self.max_level = depth;
        self.allocate(depth);

        let mut refine_options = RefinementOptions {
            sparse: false,
            face_topology_only: false,
            order_vertices_from_faces_first: options.order_vertices_from_faces_first,
        };

        for level in 1..=depth {
            refine_options.face_topology_only =
                !options.full_topology_in_last_level && level == depth;

            let (parents, children) = self.levels.split_at_mut(level);
            self.refinements[level - 1].refine(
                &parents[level - 1],
                &mut children[0],
                refine_options,
            );
        }

        debug!(
            levels = self.levels.len(),
            vertices = self.vertex_total_count(),
            faces = self.face_total_count(),
            "uniform refinement finished"
        );

        Ok(())
    }

    /// Refine the topology adaptively.
    ///
    /// Each level refines only the faces of the previous one that the
    /// feature-adaptive classifier selects. Refinement stops early when
    /// nothing is selected; [`max_level()`](TopologyRefiner::max_level) then
    /// reports the depth actually reached. Any previous refinement is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedScheme`] for any scheme but
    /// [`CatmullClark`](Scheme::CatmullClark) and [`Error::EmptyBaseLevel`]
    /// if there is no base topology.
    pub fn refine_adaptive(&mut self, options: AdaptiveRefinementOptions) -> Result<()> {
        if self.options.scheme != Scheme::CatmullClark {
            return Err(Error::UnsupportedScheme {
                scheme: self.options.scheme,
                operation: "Adaptive refinement",
            });
        }
        self.check_base_level()?;

        let requested = options.isolation_level;
        self.is_uniform = false;
        self.allocate(requested);

        let refine_options = RefinementOptions {
            sparse: true,
            face_topology_only: false,
            order_vertices_from_faces_first: options.order_vertices_from_faces_first,
        };

        let mut achieved = requested;
        for level in 1..=requested {
            let (parents, children) = self.levels.split_at_mut(level);
            let parent = &parents[level - 1];
            let refinement = &mut self.refinements[level - 1];

            let mut selector = SparseSelector::new(refinement, parent);
            let selected = catmark_feature_adaptive_selector(&mut selector);
            debug!(level = level - 1, selected, "selected faces for adaptive refinement");

            if selector.is_selection_empty() {
                achieved = level - 1;
                break;
            }

            refinement.refine(parent, &mut children[0], refine_options);
        }

        self.levels.truncate(achieved + 1);
        self.refinements.truncate(achieved);
        self.max_level = achieved;

        if achieved < requested {
            debug!(requested, achieved, "adaptive refinement converged early");
        }

        if !options.full_topology_in_last_level && 0 < achieved {
            if let Some(last) = self.levels.last_mut() {
                last.prune_to_face_topology();
            }
        }

        Ok(())
    }

    fn check_base_level(&self) -> Result<()> {
        match self.levels.first() {
            Some(base) if 0 < base.vertex_count() => Ok(()),
            _ => Err(Error::EmptyBaseLevel),
        }
    }

    /// Keeps the base level and allocates `depth` levels and refinements
    /// after it.
    fn allocate(&mut self, depth: usize) {
        let scheme = self.options.scheme;
        let sdc_options = self.options.sdc_options();

        self.levels.truncate(1);
        self.levels.resize_with(depth + 1, Level::default);
        self.refinements.clear();
        self.refinements
            .resize_with(depth, || Refinement::new(scheme, sdc_options));
    }
}

/// All supported options applying to a subdivision scheme.
///
/// This contains all supported options that can be applied to a subdivision
/// [`Scheme`] to affect the shape of the limit surface. These differ
/// from approximations that may be applied at a higher level -- options to
/// limit the level of feature adaptive subdivision, options to ignore
/// fractional creasing, or creasing entirely, etc.
///
/// # Examples
///
/// ```
/// use subdiv_topology::far::{
///     TopologyRefinerOptions, Scheme, BoundaryInterpolation,
///     FaceVaryingLinearInterpolation, CreasingMethod, TriangleSubdivision
/// };
///
/// // Create options with defaults
/// let options = TopologyRefinerOptions::default();
///
/// // Create custom options
/// let custom_options = TopologyRefinerOptions {
///     scheme: Scheme::CatmullClark,
///     boundary_interpolation: Some(BoundaryInterpolation::EdgeOnly),
///     face_varying_linear_interpolation: None, // No interpolation
///     creasing_method: CreasingMethod::Chaikin,
///     triangle_subdivision: TriangleSubdivision::Smooth,
/// };
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TopologyRefinerOptions {
    pub scheme: Scheme,
    pub boundary_interpolation: Option<BoundaryInterpolation>,
    pub face_varying_linear_interpolation: Option<FaceVaryingLinearInterpolation>,
    pub creasing_method: CreasingMethod,
    pub triangle_subdivision: TriangleSubdivision,
}

impl TopologyRefinerOptions {
    /// Returns the options passed on to the scheme.
    #[inline]
    pub fn sdc_options(&self) -> sdc::Options {
        sdc::Options {
            boundary_interpolation: self.boundary_interpolation,
            face_varying_linear_interpolation: self.face_varying_linear_interpolation,
            creasing_method: self.creasing_method,
            triangle_subdivision: self.triangle_subdivision,
        }
    }
}

impl Default for TopologyRefinerOptions {
    /// Create options with the following defaults:
    ///
    /// | Property                            | Value                                                |
    /// |-------------------------------------|------------------------------------------------------|
    /// | `scheme`                            | [`CatmullClark`](Scheme::CatmullClark)              |
    /// | `boundary_interpolation`            | `None`                                               |
    /// | `face_varying_linear_interpolation` | `Some(`[`All`](FaceVaryingLinearInterpolation::All)`)` |
    /// | `creasing_method`                   | [`Uniform`](CreasingMethod::Uniform)                |
    /// | `triangle_subdivision`              | [`CatmullClark`](TriangleSubdivision::CatmullClark) |
    fn default() -> Self {
        Self {
            scheme: Scheme::CatmullClark,
            boundary_interpolation: None,
            face_varying_linear_interpolation: Some(FaceVaryingLinearInterpolation::All),
            creasing_method: CreasingMethod::Uniform,
            triangle_subdivision: TriangleSubdivision::CatmullClark,
        }
    }
}

/// Uniform topology refinement options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformRefinementOptions {
    /// Number of refinement iterations.
    pub refinement_level: usize,
    /// Order child vertices by the type of their parent component, faces
    /// first.
    pub order_vertices_from_faces_first: bool,
    /// Keep full topology in the last level. Otherwise it only holds the
    /// face-vertex relation.
    pub full_topology_in_last_level: bool,
}

impl Default for UniformRefinementOptions {
    /// Create uniform refinement options with the following defaults:
    ///
    /// | Property                          | Value   |
    /// |-----------------------------------|---------|
    /// | `refinement_level`                | `4`     |
    /// | `order_vertices_from_faces_first` | `true`  |
    /// | `full_topology_in_last_level`     | `true`  |
    fn default() -> Self {
        Self {
            refinement_level: 4,
            order_vertices_from_faces_first: true,
            full_topology_in_last_level: true,
        }
    }
}

/// Adaptive topology refinement options.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdaptiveRefinementOptions {
    /// Maximum number of refinement iterations.
    pub isolation_level: usize,
    /// Order child vertices by the type of their parent component, faces
    /// first.
    pub order_vertices_from_faces_first: bool,
    /// Keep full topology in the last level reached. Otherwise it is pruned
    /// to the face-vertex relation once refinement stops.
    pub full_topology_in_last_level: bool,
}

impl Default for AdaptiveRefinementOptions {
    /// Create adaptive refinement options with the following defaults:
    ///
    /// | Property                          | Value   |
    /// |-----------------------------------|---------|
    /// | `isolation_level`                 | `4`     |
    /// | `order_vertices_from_faces_first` | `false` |
    /// | `full_topology_in_last_level`     | `true`  |
    fn default() -> Self {
        Self {
            isolation_level: 4,
            order_vertices_from_faces_first: false,
            full_topology_in_last_level: true,
        }
    }
}
