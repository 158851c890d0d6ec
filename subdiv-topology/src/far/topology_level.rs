//! An interface for accessing data in a specific level of a refined topology
//! hierarchy.
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::sdc::Rule;
use crate::vtr::{ComponentOrigin, ETag, Level, Refinement, VTag};
use crate::{Index, LocalIndex};

/// Provides an interface to data in a specific level of a topology
/// hierarchy.
///
/// Instances are handed out by
/// [`TopologyRefiner::level()`](super::TopologyRefiner::level) and borrow the
/// refiner, so they cannot outlive a subsequent re-refinement.
///
/// All queries taking an index return `None` if the index is out of range.
/// Levels that only hold face topology (see
/// [`UniformRefinementOptions::full_topology_in_last_level`](super::UniformRefinementOptions::full_topology_in_last_level))
/// have no edges and answer all vertex incidence queries with `None`.
#[derive(Copy, Clone, Debug)]
pub struct TopologyLevel<'a> {
    level: &'a Level,
    parent_refinement: Option<&'a Refinement>,
    child_refinement: Option<&'a Refinement>,
}

impl<'a> TopologyLevel<'a> {
    pub(crate) fn new(
        level: &'a Level,
        parent_refinement: Option<&'a Refinement>,
        child_refinement: Option<&'a Refinement>,
    ) -> Self {
        Self {
            level,
            parent_refinement,
            child_refinement,
        }
    }

    /// Returns the underlying level.
    #[inline]
    pub fn as_level(&self) -> &'a Level {
        self.level
    }

    #[inline]
    fn has_face(&self, face: Index) -> bool {
        face.idx() < self.level.face_count()
    }

    #[inline]
    fn has_edge(&self, edge: Index) -> bool {
        edge.idx() < self.level.edge_count()
    }

    #[inline]
    fn has_vertex_topology(&self, vertex: Index) -> bool {
        vertex.idx() < self.level.vertex_count() && !self.level.is_face_topology_only()
    }
}

/// ### Methods to Inspect the Overall Inventory of Components
///
/// All three main component types are indexed locally within each level.  For
/// some topological relationships – notably face-vertices, which is often
/// the only relationship of interest – the total number of entries is also
/// made available.
impl<'a> TopologyLevel<'a> {
    /// Returns the refinement depth of this level; `0` for the base level.
    #[inline]
    pub fn depth(&self) -> usize {
        self.level.depth()
    }

    /// Returns the number of vertices in this level.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.level.vertex_count()
    }

    /// Returns the number of faces in this level.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.level.face_count()
    }

    /// Returns the number of edges in this level.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.level.edge_count()
    }

    /// Returns the total number of face-vertices -- the sum of all vertices
    /// for all faces.
    #[inline]
    pub fn face_vertex_count(&self) -> usize {
        self.level.face_vertex_count()
    }

    /// Returns `true` if this level holds more than the face-vertex relation.
    #[inline]
    pub fn has_full_topology(&self) -> bool {
        !self.level.is_face_topology_only()
    }

    /// Returns an iterator over the face vertices of this level.
    pub fn face_vertices_iter(&self) -> FaceVerticesIter<'a> {
        FaceVerticesIter {
            level: self.level,
            current: 0,
            count: self.level.face_count(),
        }
    }

    /// Returns a parallel iterator over the face vertices of this level.
    ///
    /// This method is only available when the `rayon` feature is enabled.
    #[cfg(feature = "rayon")]
    pub fn face_vertices_par_iter(&self) -> FaceVerticesParIter<'a> {
        FaceVerticesParIter { level: self.level }
    }
}

/// ### Methods to Inspect Topological Relationships for Individual Components
///
/// With three main component types (*vertices*, *faces* and *edges*), for each
/// of the three components the `TopologyLevel` stores the incident/adjacent
/// components of the other two types.  So there are six relationships available
/// for immediate inspection.
///
/// For some of the relations, i.e. those for which the incident components are
/// of higher order or 'contain' the component itself (e.g. a vertex has
/// incident faces that contain it), an additional 'local index' is available
/// that identifies the component within each of its neighbors.
///
/// For example, if vertex `V` is the `k`th vertex in some face `F`, then when
/// `F` occurs in the set of incident vertices of `V`, the local index
/// corresponding to `F` will be `k`.  The ordering of local indices matches
/// the ordering of the incident component to which it corresponds.
impl<'a> TopologyLevel<'a> {
    /// Returns the vertices incident to a given face.
    #[inline]
    pub fn face_vertices(&self, face: Index) -> Option<&'a [Index]> {
        self.has_face(face).then(|| self.level.face_vertices(face))
    }

    /// Returns the edges incident to a given face.
    #[inline]
    pub fn face_edges(&self, face: Index) -> Option<&'a [Index]> {
        (self.has_face(face) && self.has_full_topology()).then(|| self.level.face_edges(face))
    }

    /// Returns the vertices incident to a given edge.
    #[inline]
    pub fn edge_vertices(&self, edge: Index) -> Option<[Index; 2]> {
        self.has_edge(edge).then(|| self.level.edge_vertices(edge))
    }

    /// Returns the faces incident to a given edge.
    #[inline]
    pub fn edge_faces(&self, edge: Index) -> Option<&'a [Index]> {
        self.has_edge(edge).then(|| self.level.edge_faces(edge))
    }

    /// Returns the faces incident to a given vertex.
    #[inline]
    pub fn vertex_faces(&self, vertex: Index) -> Option<&'a [Index]> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_faces(vertex))
    }

    /// Returns the edges incident to a given vertex.
    #[inline]
    pub fn vertex_edges(&self, vertex: Index) -> Option<&'a [Index]> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_edges(vertex))
    }

    /// Returns the local indices of a vertex with respect to its incident
    /// faces.
    #[inline]
    pub fn vertex_face_local_indices(&self, vertex: Index) -> Option<&'a [LocalIndex]> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_face_local_indices(vertex))
    }

    /// Returns the local indices of a vertex with respect to its incident
    /// edges.
    #[inline]
    pub fn vertex_edge_local_indices(&self, vertex: Index) -> Option<&'a [LocalIndex]> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_edge_local_indices(vertex))
    }

    /// Returns the local indices of an edge with respect to its incident faces.
    #[inline]
    pub fn edge_face_local_indices(&self, edge: Index) -> Option<&'a [LocalIndex]> {
        self.has_edge(edge)
            .then(|| self.level.edge_face_local_indices(edge))
    }

    /// Identify the edge matching the given vertex pair.
    #[inline]
    pub fn find_edge(&self, vertex0: Index, vertex1: Index) -> Option<Index> {
        self.level.find_edge(vertex0, vertex1)
    }
}

/// An iterator over the face vertices of a [`TopologyLevel`].
#[derive(Copy, Clone, Debug)]
pub struct FaceVerticesIter<'a> {
    level: &'a Level,
    current: usize,
    count: usize,
}

impl<'a> Iterator for FaceVerticesIter<'a> {
    type Item = &'a [Index];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.count {
            None
        } else {
            self.current += 1;
            Some(self.level.face_vertices(Index::from(self.current - 1)))
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FaceVerticesIter<'_> {}

/// A parallel iterator over the face vertices of a [`TopologyLevel`].
#[cfg(feature = "rayon")]
#[derive(Copy, Clone, Debug)]
pub struct FaceVerticesParIter<'a> {
    level: &'a Level,
}

#[cfg(feature = "rayon")]
impl<'a> ParallelIterator for FaceVerticesParIter<'a> {
    type Item = &'a [Index];

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: rayon::iter::plumbing::UnindexedConsumer<Self::Item>,
    {
        let level = self.level;
        (0..level.face_count())
            .into_par_iter()
            .map(|face| level.face_vertices(Index::from(face)))
            .drive_unindexed(consumer)
    }
}

#[cfg(feature = "rayon")]
impl<'a> IndexedParallelIterator for FaceVerticesParIter<'a> {
    fn len(&self) -> usize {
        self.level.face_count()
    }

    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: rayon::iter::plumbing::Consumer<Self::Item>,
    {
        let level = self.level;
        (0..level.face_count())
            .into_par_iter()
            .map(|face| level.face_vertices(Index::from(face)))
            .drive(consumer)
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: rayon::iter::plumbing::ProducerCallback<Self::Item>,
    {
        let level = self.level;
        (0..level.face_count())
            .into_par_iter()
            .map(|face| level.face_vertices(Index::from(face)))
            .with_producer(callback)
    }
}

/// ### Methods to Inspect Other Topological Properties of Individual Components
impl<'a> TopologyLevel<'a> {
    /// Returns the tags of a vertex.
    #[inline]
    pub fn vertex_tag(&self, vertex: Index) -> Option<VTag> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_tag(vertex))
    }

    /// Returns the tags of an edge.
    #[inline]
    pub fn edge_tag(&self, edge: Index) -> Option<ETag> {
        self.has_edge(edge).then(|| self.level.edge_tag(edge))
    }

    /// Returns the crease rule of a vertex.
    #[inline]
    pub fn vertex_rule(&self, vertex: Index) -> Option<Rule> {
        self.vertex_tag(vertex).map(|tag| tag.rule)
    }

    /// Returns the sharpness assigned to an edge.
    #[inline]
    pub fn edge_sharpness(&self, edge: Index) -> Option<f32> {
        self.has_edge(edge).then(|| self.level.edge_sharpness(edge))
    }

    /// Returns the sharpness assigned to a vertex.
    #[inline]
    pub fn vertex_sharpness(&self, vertex: Index) -> Option<f32> {
        self.has_vertex_topology(vertex)
            .then(|| self.level.vertex_sharpness(vertex))
    }

    /// Returns `true` if the edge is non-manifold.
    #[inline]
    pub fn is_edge_non_manifold(&self, edge: Index) -> bool {
        self.edge_tag(edge).is_some_and(|tag| tag.non_manifold)
    }

    /// Returns `true` if the vertex is non-manifold.
    #[inline]
    pub fn is_vertex_non_manifold(&self, vertex: Index) -> bool {
        self.vertex_tag(vertex).is_some_and(|tag| tag.non_manifold)
    }

    /// Returns `true` if the edge is a boundary.
    #[inline]
    pub fn is_edge_boundary(&self, edge: Index) -> bool {
        self.edge_tag(edge).is_some_and(|tag| tag.boundary)
    }

    /// Returns `true` if the vertex is a boundary.
    #[inline]
    pub fn is_vertex_boundary(&self, vertex: Index) -> bool {
        self.vertex_tag(vertex).is_some_and(|tag| tag.boundary)
    }

    /// Returns `true` if the valence of the vertex is not the regular
    /// valence of the scheme.
    #[inline]
    pub fn is_vertex_extraordinary(&self, vertex: Index) -> bool {
        self.vertex_tag(vertex).is_some_and(|tag| tag.xordinary)
    }

    /// Returns `true` if the neighborhood of the vertex was not fully refined.
    ///
    /// This only happens at the frontier of sparse (adaptive) refinement.
    #[inline]
    pub fn is_vertex_incomplete(&self, vertex: Index) -> bool {
        self.vertex_tag(vertex).is_some_and(|tag| tag.incomplete)
    }
}

/// ### Methods to Inspect Face-Varying Data.
///
/// Face-varying data is organized into topologically independent channels,
/// each identified by its index.
///
/// A face-varying channel is composed of a set of values that may be shared
/// by faces meeting at a common vertex.  Just as there are sets of vertices
/// that are associated with faces by index (ranging from 0 to
/// num-vertices - 1), face-varying values are also referenced by index
/// (ranging from 0 to num-values -1).
impl<'a> TopologyLevel<'a> {
    /// Returns the number of face-varying channels (should be same for all
    /// levels).
    #[inline]
    pub fn face_varying_channel_count(&self) -> usize {
        self.level.fvar_channel_count()
    }

    /// Returns the total number of face-varying values in a particular channel
    /// (the upper bound of a face-varying value index).
    #[inline]
    pub fn face_varying_value_count(&self, channel: usize) -> usize {
        self.level.fvar_value_count(channel)
    }

    /// Returns the face-varying values associated with a particular face.
    #[inline]
    pub fn face_varying_values_on_face(&self, face: Index, channel: usize) -> Option<&'a [Index]> {
        self.level.face_fvar_values(face, channel)
    }
}

/// ### Methods to Identify Parent or Child Components in Adjoining Levels of
/// Refinement.
///
/// Child queries return `None` on the last level. In sparse levels, child
/// components that were not created are `None`.
impl<'a> TopologyLevel<'a> {
    /// Returns the child faces (in the next level) of a given face.
    #[inline]
    pub fn face_child_faces(&self, face: Index) -> Option<&'a [Option<Index>]> {
        self.child_refinement?.face_child_faces(face)
    }

    /// Returns the child edges (in the next level) interior to a given face.
    #[inline]
    pub fn face_child_edges(&self, face: Index) -> Option<&'a [Option<Index>]> {
        self.child_refinement?.face_child_edges(face)
    }

    /// Returns the child edges (in the next level) of a given edge.
    #[inline]
    pub fn edge_child_edges(&self, edge: Index) -> Option<[Option<Index>; 2]> {
        self.child_refinement?.edge_child_edges(edge)
    }

    /// Returns the child vertex (in the next level) of a given face.
    #[inline]
    pub fn face_child_vertex(&self, face: Index) -> Option<Index> {
        self.child_refinement?.face_child_vertex(face)
    }

    /// Returns the child vertex (in the next level) of a given edge.
    #[inline]
    pub fn edge_child_vertex(&self, edge: Index) -> Option<Index> {
        self.child_refinement?.edge_child_vertex(edge)
    }

    /// Returns the child vertex (in the next level) of a given vertex.
    #[inline]
    pub fn vertex_child_vertex(&self, vertex: Index) -> Option<Index> {
        self.child_refinement?.vertex_child_vertex(vertex)
    }

    /// Returns the parent face (in the previous level) of a given face.
    #[inline]
    pub fn face_parent_face(&self, face: Index) -> Option<Index> {
        self.parent_refinement?.child_face_parent(face)
    }

    /// Returns the component (in the previous level) a given vertex was
    /// created from.
    #[inline]
    pub fn vertex_parent(&self, vertex: Index) -> Option<ComponentOrigin> {
        self.parent_refinement?.child_vertex_parent(vertex)
    }
}
