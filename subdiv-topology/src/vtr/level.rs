//! One level of a topology hierarchy.
//!
//! A [`Level`] stores the three component types (*vertices*, *edges* and
//! *faces*) of one resolution of a mesh together with the six incidence
//! relations between them, per-component sharpness and the topological tags
//! that feature-adaptive refinement inspects.
//!
//! A level is built once – either from a
//! [`TopologyDescriptor`](crate::far::TopologyDescriptor) for the base level
//! or by a [`Refinement`](super::Refinement) for every other level – and is
//! not modified afterwards.
use itertools::Itertools;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::relation::Relation;
use crate::sdc::crease::{self, Crease, Rule, RuleMask};
use crate::sdc::{Options, SchemeTraits};
use crate::{Index, LocalIndex};

/// Topological tags of a vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VTag {
    /// The incident face count differs from the scheme's regular valence.
    pub xordinary: bool,
    /// The vertex or one of its incident edges is semi-sharp.
    pub semi_sharp: bool,
    /// The vertex itself is infinitely sharp.
    pub inf_sharp: bool,
    pub boundary: bool,
    pub non_manifold: bool,
    /// The neighborhood of the vertex is not fully present in this level.
    ///
    /// This happens at the frontier of a sparse refinement.
    pub incomplete: bool,
    pub rule: Rule,
}

/// The union of the [`VTag`]s of several vertices, typically of all
/// vertices of a face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeVTag {
    pub xordinary: bool,
    pub semi_sharp: bool,
    pub inf_sharp: bool,
    pub boundary: bool,
    pub non_manifold: bool,
    pub incomplete: bool,
    pub rule: RuleMask,
}

impl CompositeVTag {
    #[inline]
    pub fn accumulate(&mut self, tag: VTag) {
        self.xordinary |= tag.xordinary;
        self.semi_sharp |= tag.semi_sharp;
        self.inf_sharp |= tag.inf_sharp;
        self.boundary |= tag.boundary;
        self.non_manifold |= tag.non_manifold;
        self.incomplete |= tag.incomplete;
        self.rule.insert(tag.rule);
    }
}

impl FromIterator<VTag> for CompositeVTag {
    fn from_iter<I: IntoIterator<Item = VTag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut composite, tag| {
            composite.accumulate(tag);
            composite
        })
    }
}

/// Topological tags of an edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ETag {
    pub boundary: bool,
    pub non_manifold: bool,
    pub semi_sharp: bool,
    pub inf_sharp: bool,
}

/// Face-varying topology of one channel: one value index per face-vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FVarChannel {
    pub(crate) value_count: usize,
    pub(crate) values: Vec<Index>,
}

/// One snapshot of mesh topology.
///
/// Relations are returned in the order the components were discovered: the
/// faces incident to a vertex are in face index order, the edges of a face
/// follow its vertices (edge `k` joins vertex `k` and `k + 1`).
#[derive(Clone, Debug, Default)]
pub struct Level {
    depth: usize,
    vertex_count: usize,
    face_topology_only: bool,

    face_vertices: Relation<Index>,
    face_edges: Relation<Index>,

    edge_vertices: Vec<[Index; 2]>,
    edge_faces: Relation<Index>,
    edge_face_local: Relation<LocalIndex>,

    vertex_faces: Relation<Index>,
    vertex_face_local: Relation<LocalIndex>,
    vertex_edges: Relation<Index>,
    vertex_edge_local: Relation<LocalIndex>,

    edge_sharpness: Vec<f32>,
    vertex_sharpness: Vec<f32>,
    edge_tags: Vec<ETag>,
    vertex_tags: Vec<VTag>,

    fvar_channels: Vec<FVarChannel>,
}

/// ### Construction
impl Level {
    /// Creates a base level from per-face vertex counts and a flat buffer of
    /// face-vertex indices.
    ///
    /// Only the face-vertex relation is populated. Call
    /// [`complete_topology()`](Level::complete_topology) to derive the rest.
    pub(crate) fn from_face_vertices(
        vertex_count: usize,
        vertices_per_face: &[u32],
        vertex_indices_per_face: &[Index],
        reverse_winding: bool,
    ) -> Self {
        let mut face_vertices =
            Relation::with_capacity(vertices_per_face.len(), vertex_indices_per_face.len());

        let mut start = 0;
        for &face_size in vertices_per_face {
            let face = &vertex_indices_per_face[start..start + face_size as usize];
            face_vertices.push_row(winding(face.len(), reverse_winding).map(|i| face[i]));
            start += face_size as usize;
        }

        Self {
            vertex_count,
            face_vertices,
            ..Default::default()
        }
    }

    /// Creates a child level holding only its face-vertex relation.
    pub(crate) fn from_child_faces(
        depth: usize,
        vertex_count: usize,
        face_vertices: Relation<Index>,
    ) -> Self {
        Self {
            depth,
            vertex_count,
            face_vertices,
            ..Default::default()
        }
    }

    /// Derives edges and all remaining incidence relations from the
    /// face-vertex relation.
    ///
    /// Sharpness is reset to smooth and tags to their defaults.
    pub(crate) fn complete_topology(&mut self) {
        let face_count = self.face_count();
        let face_vertex_count = self.face_vertices.member_count();

        let mut edge_map: HashMap<(Index, Index), Index> =
            HashMap::with_capacity(face_vertex_count);
        let mut edge_vertices: Vec<[Index; 2]> = Vec::with_capacity(face_vertex_count);
        let mut edge_faces: Vec<Vec<Index>> = Vec::with_capacity(face_vertex_count);
        let mut edge_face_local: Vec<Vec<LocalIndex>> = Vec::with_capacity(face_vertex_count);
        let mut face_edges = Relation::with_capacity(face_count, face_vertex_count);

        for face in 0..face_count {
            let face_verts = self.face_vertices.row(face);
            let mut row = Vec::with_capacity(face_verts.len());

            for (corner, (&v0, &v1)) in face_verts
                .iter()
                .circular_tuple_windows::<(_, _)>()
                .enumerate()
            {
                let key = if v0 <= v1 { (v0, v1) } else { (v1, v0) };
                let edge = *edge_map.entry(key).or_insert_with(|| {
                    edge_vertices.push([v0, v1]);
                    edge_faces.push(Vec::new());
                    edge_face_local.push(Vec::new());
                    Index::from(edge_vertices.len() - 1)
                });
                edge_faces[edge.idx()].push(Index::from(face));
                edge_face_local[edge.idx()].push(corner as LocalIndex);
                row.push(edge);
            }
            face_edges.push_row(row);
        }

        let mut vertex_faces = vec![Vec::new(); self.vertex_count];
        let mut vertex_face_local = vec![Vec::new(); self.vertex_count];
        for (face, face_verts) in self.face_vertices.iter().enumerate() {
            for (corner, vertex) in face_verts.iter().enumerate() {
                vertex_faces[vertex.idx()].push(Index::from(face));
                vertex_face_local[vertex.idx()].push(corner as LocalIndex);
            }
        }

        let mut vertex_edges = vec![Vec::new(); self.vertex_count];
        let mut vertex_edge_local = vec![Vec::new(); self.vertex_count];
        for (edge, edge_verts) in edge_vertices.iter().enumerate() {
            for (end, vertex) in edge_verts.iter().enumerate() {
                vertex_edges[vertex.idx()].push(Index::from(edge));
                vertex_edge_local[vertex.idx()].push(end as LocalIndex);
            }
        }

        let edge_count = edge_vertices.len();

        self.face_topology_only = false;
        self.face_edges = face_edges;
        self.edge_vertices = edge_vertices;
        self.edge_faces = Relation::from_rows(edge_faces);
        self.edge_face_local = Relation::from_rows(edge_face_local);
        self.vertex_faces = Relation::from_rows(vertex_faces);
        self.vertex_face_local = Relation::from_rows(vertex_face_local);
        self.vertex_edges = Relation::from_rows(vertex_edges);
        self.vertex_edge_local = Relation::from_rows(vertex_edge_local);

        self.edge_sharpness = vec![crease::SHARPNESS_SMOOTH; edge_count];
        self.vertex_sharpness = vec![crease::SHARPNESS_SMOOTH; self.vertex_count];
        self.edge_tags = vec![ETag::default(); edge_count];
        self.vertex_tags = vec![VTag::default(); self.vertex_count];
    }

    /// Tags the base level from its topology, applies boundary and
    /// non-manifold sharpening and finalizes all tags.
    ///
    /// Explicit crease and corner sharpness must already be assigned.
    pub(crate) fn initialize_base_tags(&mut self, traits: &SchemeTraits, options: &Options) {
        let mut non_manifold_edges = 0;
        for edge in 0..self.edge_count() {
            let non_manifold = self.is_edge_topology_non_manifold(edge);
            let boundary = self.edge_faces.row(edge).len() == 1;

            self.edge_tags[edge].non_manifold = non_manifold;
            self.edge_tags[edge].boundary = boundary;

            if non_manifold {
                non_manifold_edges += 1;
                self.edge_sharpness[edge] = crease::SHARPNESS_INFINITE;
            } else if boundary && options.sharpens_boundary_edges() {
                self.edge_sharpness[edge] = crease::SHARPNESS_INFINITE;
            }
        }

        if 0 < non_manifold_edges {
            warn!(non_manifold_edges, "base level has non-manifold edges");
        }

        for vertex in 0..self.vertex_count {
            let edges = self.vertex_edges.row(vertex);
            let boundary = edges.iter().any(|e| self.edge_tags[e.idx()].boundary);
            let non_manifold = edges.iter().any(|e| self.edge_tags[e.idx()].non_manifold)
                || !self.is_single_fan(vertex);

            self.vertex_tags[vertex].boundary = boundary;
            self.vertex_tags[vertex].non_manifold = non_manifold;

            if options.sharpens_boundary_corners()
                && boundary
                && !non_manifold
                && self.vertex_faces.row(vertex).len() == 1
            {
                self.vertex_sharpness[vertex] = crease::SHARPNESS_INFINITE;
            }
        }

        self.finalize_tags(traits);

        debug!(
            vertices = self.vertex_count,
            edges = self.edge_count(),
            faces = self.face_count(),
            "initialized base level"
        );
    }

    /// Replaces sharpness and the boundary, non-manifold and incomplete tags
    /// with values inherited from a parent level.
    pub(crate) fn assign_inherited_tags(
        &mut self,
        vertex_sharpness: Vec<f32>,
        vertex_tags: Vec<VTag>,
        edge_sharpness: Vec<f32>,
        edge_tags: Vec<ETag>,
    ) {
        debug_assert_eq!(vertex_tags.len(), self.vertex_count);
        debug_assert_eq!(edge_tags.len(), self.edge_count());

        self.vertex_sharpness = vertex_sharpness;
        self.vertex_tags = vertex_tags;
        self.edge_sharpness = edge_sharpness;
        self.edge_tags = edge_tags;
    }

    /// Derives the sharpness flags, crease rules and extraordinary flags from
    /// sharpness, incidence and the boundary/non-manifold tags.
    pub(crate) fn finalize_tags(&mut self, traits: &SchemeTraits) {
        for (tag, &sharpness) in self.edge_tags.iter_mut().zip(&self.edge_sharpness) {
            tag.semi_sharp = crease::is_semi_sharp(sharpness);
            tag.inf_sharp = crease::is_infinite(sharpness);
        }

        for vertex in 0..self.vertex_count {
            let vertex_sharpness = self.vertex_sharpness[vertex];
            let edges = self.vertex_edges.row(vertex);
            let edge_sharpness = edges.iter().map(|e| self.edge_sharpness[e.idx()]);

            let rule =
                Crease::determine_vertex_vertex_rule(vertex_sharpness, edge_sharpness.clone());
            let semi_sharp = crease::is_semi_sharp(vertex_sharpness)
                || edge_sharpness.clone().any(crease::is_semi_sharp);
            let face_count = self.vertex_faces.row(vertex).len();

            let tag = &mut self.vertex_tags[vertex];
            tag.rule = rule;
            tag.semi_sharp = semi_sharp;
            tag.inf_sharp = crease::is_infinite(vertex_sharpness);
            tag.xordinary = if tag.non_manifold {
                true
            } else if tag.boundary {
                let regular_corner =
                    rule == Rule::Corner && face_count == traits.regular_corner_valence;
                !regular_corner && face_count != traits.regular_boundary_valence
            } else {
                face_count != traits.regular_vertex_valence
            };
        }
    }

    pub(crate) fn set_edge_sharpness(&mut self, edge: Index, sharpness: f32) {
        self.edge_sharpness[edge.idx()] = sharpness;
    }

    pub(crate) fn set_vertex_sharpness(&mut self, vertex: Index, sharpness: f32) {
        self.vertex_sharpness[vertex.idx()] = sharpness;
    }

    pub(crate) fn add_fvar_channel(&mut self, value_count: usize, values: Vec<Index>) {
        debug_assert_eq!(values.len(), self.face_vertex_count());
        self.fvar_channels.push(FVarChannel {
            value_count,
            values,
        });
    }

    pub(crate) fn fvar_channels(&self) -> &[FVarChannel] {
        &self.fvar_channels
    }

    /// Drops everything but the face-vertex relation and the face-varying
    /// channels.
    pub(crate) fn prune_to_face_topology(&mut self) {
        *self = Self {
            depth: self.depth,
            vertex_count: self.vertex_count,
            face_topology_only: true,
            face_vertices: std::mem::take(&mut self.face_vertices),
            fvar_channels: std::mem::take(&mut self.fvar_channels),
            ..Default::default()
        };
    }

    fn is_edge_topology_non_manifold(&self, edge: usize) -> bool {
        let [v0, v1] = self.edge_vertices[edge];
        let faces = self.edge_faces.row(edge);
        let locals = self.edge_face_local.row(edge);

        match faces.len() {
            0 => true,
            1 => v0 == v1,
            2 => {
                // Both faces must traverse the edge in opposite directions.
                let forward = |i: usize| {
                    self.face_vertices.row(faces[i].idx())[locals[i] as usize] == v0
                };
                v0 == v1 || forward(0) == forward(1)
            }
            _ => true,
        }
    }

    /// Returns `true` if the faces around a vertex form one edge-connected
    /// fan.
    fn is_single_fan(&self, vertex: usize) -> bool {
        let faces = self.vertex_faces.row(vertex);
        if faces.is_empty() {
            return false;
        }

        let mut parent: Vec<usize> = (0..faces.len()).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for edge in self.vertex_edges.row(vertex) {
            if let [f0, f1] = self.edge_faces.row(edge.idx()) {
                let a = faces.iter().position(|f| f == f0);
                let b = faces.iter().position(|f| f == f1);
                if let (Some(a), Some(b)) = (a, b) {
                    let (a, b) = (root(&mut parent, a), root(&mut parent, b));
                    parent[a] = b;
                }
            }
        }

        (0..faces.len()).filter(|&i| root(&mut parent, i) == i).count() == 1
    }
}

/// Corner order of a face, optionally reversed while keeping the first corner.
pub(crate) fn winding(len: usize, reverse: bool) -> impl Iterator<Item = usize> {
    (0..len).map(move |i| if reverse { (len - i) % len } else { i })
}

/// ### Component Counts
impl Level {
    /// Refinement depth of this level; `0` for the base level.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.face_vertices.len()
    }

    /// Returns `0` for a level holding only face topology.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_vertices.len()
    }

    /// Returns the sum of the vertex counts of all faces.
    #[inline]
    pub fn face_vertex_count(&self) -> usize {
        self.face_vertices.member_count()
    }

    /// Returns `true` if only the face-vertex relation was built for this
    /// level.
    #[inline]
    pub fn is_face_topology_only(&self) -> bool {
        self.face_topology_only
    }

    /// Returns the largest number of edges incident to a vertex.
    pub fn max_valence(&self) -> usize {
        self.vertex_edges.iter().map(<[Index]>::len).max().unwrap_or(0)
    }
}

/// ### Incidence Relations
///
/// These panic on out-of-range indices.
impl Level {
    #[inline]
    pub fn face_vertices(&self, face: Index) -> &[Index] {
        self.face_vertices.row(face.idx())
    }

    #[inline]
    pub fn face_edges(&self, face: Index) -> &[Index] {
        self.face_edges.row(face.idx())
    }

    #[inline]
    pub fn edge_vertices(&self, edge: Index) -> [Index; 2] {
        self.edge_vertices[edge.idx()]
    }

    #[inline]
    pub fn edge_faces(&self, edge: Index) -> &[Index] {
        self.edge_faces.row(edge.idx())
    }

    #[inline]
    pub fn edge_face_local_indices(&self, edge: Index) -> &[LocalIndex] {
        self.edge_face_local.row(edge.idx())
    }

    #[inline]
    pub fn vertex_faces(&self, vertex: Index) -> &[Index] {
        self.vertex_faces.row(vertex.idx())
    }

    #[inline]
    pub fn vertex_face_local_indices(&self, vertex: Index) -> &[LocalIndex] {
        self.vertex_face_local.row(vertex.idx())
    }

    #[inline]
    pub fn vertex_edges(&self, vertex: Index) -> &[Index] {
        self.vertex_edges.row(vertex.idx())
    }

    #[inline]
    pub fn vertex_edge_local_indices(&self, vertex: Index) -> &[LocalIndex] {
        self.vertex_edge_local.row(vertex.idx())
    }

    /// Returns the edge joining two vertices, in either direction.
    pub fn find_edge(&self, vertex0: Index, vertex1: Index) -> Option<Index> {
        if self.vertex_edges.len() <= vertex0.idx() {
            return None;
        }
        self.vertex_edges(vertex0)
            .iter()
            .zip(self.vertex_edge_local_indices(vertex0))
            .find(|(&edge, &end)| self.edge_vertices[edge.idx()][1 - end as usize] == vertex1)
            .map(|(&edge, _)| edge)
    }

    pub(crate) fn face_vertex_relation(&self) -> &Relation<Index> {
        &self.face_vertices
    }
}

/// ### Sharpness and Tags
impl Level {
    #[inline]
    pub fn edge_sharpness(&self, edge: Index) -> f32 {
        self.edge_sharpness[edge.idx()]
    }

    #[inline]
    pub fn vertex_sharpness(&self, vertex: Index) -> f32 {
        self.vertex_sharpness[vertex.idx()]
    }

    #[inline]
    pub fn vertex_tag(&self, vertex: Index) -> VTag {
        self.vertex_tags[vertex.idx()]
    }

    #[inline]
    pub fn edge_tag(&self, edge: Index) -> ETag {
        self.edge_tags[edge.idx()]
    }

    #[inline]
    pub fn vertex_rule(&self, vertex: Index) -> Rule {
        self.vertex_tags[vertex.idx()].rule
    }

    /// Combines the tags of all vertices of a face.
    pub fn face_composite_vtag(&self, face: Index) -> CompositeVTag {
        self.face_vertices(face)
            .iter()
            .map(|vertex| self.vertex_tags[vertex.idx()])
            .collect()
    }
}

/// ### Face-Varying Topology
impl Level {
    #[inline]
    pub fn fvar_channel_count(&self) -> usize {
        self.fvar_channels.len()
    }

    /// Returns the number of values in a channel; `0` if there is no such
    /// channel.
    #[inline]
    pub fn fvar_value_count(&self, channel: usize) -> usize {
        self.fvar_channels
            .get(channel)
            .map_or(0, |channel| channel.value_count)
    }

    /// Returns the face-varying value indices of the corners of a face.
    pub fn face_fvar_values(&self, face: Index, channel: usize) -> Option<&[Index]> {
        let channel = self.fvar_channels.get(channel)?;
        let corners = self.face_vertices.get(face.idx())?.len();
        let start = self.face_vertices.offset(face.idx());
        Some(&channel.values[start..start + corners])
    }
}
