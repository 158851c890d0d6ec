//! Refinement of one [`Level`] into the next.
//!
//! A [`Refinement`] splits the faces of a parent level according to its
//! [`Scheme`]. Every refined parent component (face, edge or vertex) gets one
//! child vertex; every parent face gets one child face per corner (plus a
//! center face for triangle splits).
//!
//! In sparse mode only the components marked by a
//! [`SparseSelector`](super::SparseSelector) are refined completely. Faces
//! that are not selected but touch a selected vertex get the child faces at
//! those vertices so the selected region is surrounded by one ring of
//! children.
use itertools::Either;
use std::collections::HashMap;
use tracing::debug;

use super::level::{ETag, Level, VTag};
use super::relation::Relation;
use crate::sdc::{crease, Crease, Options, Scheme, SchemeTraits, Split};
use crate::Index;

/// Options steering a single [`Refinement::refine()`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RefinementOptions {
    /// Refine only the selected subset of the parent.
    pub sparse: bool,
    /// Build only the face-vertex relation of the child.
    pub face_topology_only: bool,
    /// Number child vertices originating from faces first, then edges, then
    /// vertices. Otherwise vertices come first, then faces, then edges.
    pub order_vertices_from_faces_first: bool,
}

/// The parent component a child vertex was created from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentOrigin {
    Face(Index),
    Edge(Index),
    Vertex(Index),
}

/// Where a corner of a child face comes from, relative to the corners of
/// its parent face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CornerSource {
    /// The child of the parent face.
    Center,
    /// The child of the `k`-th edge of the parent face.
    Edge(usize),
    /// The child of the `k`-th vertex of the parent face.
    Vertex(usize),
}

/// Number of child faces of a parent face with `size` corners.
#[inline]
fn child_face_count(split: Split, size: usize) -> usize {
    match split {
        Split::ToQuads => size,
        Split::ToTris => 4,
    }
}

/// Corners of the `child`-th child face of a parent face with `size`
/// corners.
fn child_face_corners(
    split: Split,
    size: usize,
    child: usize,
) -> impl Iterator<Item = CornerSource> {
    let previous = (child + size - 1) % size;
    match split {
        Split::ToQuads => Either::Left(
            [
                CornerSource::Vertex(child),
                CornerSource::Edge(child),
                CornerSource::Center,
                CornerSource::Edge(previous),
            ]
            .into_iter(),
        ),
        Split::ToTris if child < 3 => Either::Right(
            [
                CornerSource::Vertex(child),
                CornerSource::Edge(child),
                CornerSource::Edge(previous),
            ]
            .into_iter(),
        ),
        Split::ToTris => Either::Right(
            [
                CornerSource::Edge(0),
                CornerSource::Edge(1),
                CornerSource::Edge(2),
            ]
            .into_iter(),
        ),
    }
}

/// Produces the child of a [`Level`] and keeps the mapping between parent
/// and child components.
#[derive(Clone, Debug)]
pub struct Refinement {
    scheme: Scheme,
    options: Options,
    traits: SchemeTraits,

    face_selected: Vec<bool>,
    edge_selected: Vec<bool>,
    vertex_selected: Vec<bool>,

    face_child_vertex: Vec<Option<Index>>,
    edge_child_vertex: Vec<Option<Index>>,
    vertex_child_vertex: Vec<Option<Index>>,
    face_child_faces: Relation<Option<Index>>,
    face_child_edges: Relation<Option<Index>>,
    edge_child_edges: Vec<[Option<Index>; 2]>,

    child_vertex_origin: Vec<ComponentOrigin>,
    child_face_parent: Vec<Index>,
}

impl Refinement {
    pub fn new(scheme: Scheme, options: Options) -> Self {
        Self {
            scheme,
            options,
            traits: scheme.traits(),
            face_selected: Vec::new(),
            edge_selected: Vec::new(),
            vertex_selected: Vec::new(),
            face_child_vertex: Vec::new(),
            edge_child_vertex: Vec::new(),
            vertex_child_vertex: Vec::new(),
            face_child_faces: Relation::default(),
            face_child_edges: Relation::default(),
            edge_child_edges: Vec::new(),
            child_vertex_origin: Vec::new(),
            child_face_parent: Vec::new(),
        }
    }

    /// Rebinds the refinement to a scheme, dropping any previous result.
    pub fn set_scheme(&mut self, scheme: Scheme, options: Options) {
        *self = Self::new(scheme, options);
    }

    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Binds the refinement to a parent level, with nothing selected.
    pub(crate) fn bind(&mut self, parent: &Level) {
        self.face_selected = vec![false; parent.face_count()];
        self.edge_selected = vec![false; parent.edge_count()];
        self.vertex_selected = vec![false; parent.vertex_count()];
    }

    fn select_all(&mut self, parent: &Level) {
        self.face_selected = vec![true; parent.face_count()];
        self.edge_selected = vec![true; parent.edge_count()];
        self.vertex_selected = vec![true; parent.vertex_count()];
    }

    #[inline]
    pub(crate) fn mark_face(&mut self, face: Index) {
        self.face_selected[face.idx()] = true;
    }

    #[inline]
    pub(crate) fn mark_edge(&mut self, edge: Index) {
        self.edge_selected[edge.idx()] = true;
    }

    #[inline]
    pub(crate) fn mark_vertex(&mut self, vertex: Index) {
        self.vertex_selected[vertex.idx()] = true;
    }

    #[inline]
    pub fn is_face_selected(&self, face: Index) -> bool {
        self.face_selected.get(face.idx()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_edge_selected(&self, edge: Index) -> bool {
        self.edge_selected.get(edge.idx()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn is_vertex_selected(&self, vertex: Index) -> bool {
        self.vertex_selected.get(vertex.idx()).copied().unwrap_or(false)
    }

    /// Returns `true` if no component is selected.
    pub fn is_selection_empty(&self) -> bool {
        !self
            .face_selected
            .iter()
            .chain(&self.edge_selected)
            .chain(&self.vertex_selected)
            .any(|&selected| selected)
    }

    /// Builds `child` from `parent`.
    ///
    /// The parent must have full topology. In sparse mode the current
    /// selection decides what is refined; otherwise everything is.
    pub(crate) fn refine(&mut self, parent: &Level, child: &mut Level, options: RefinementOptions) {
        debug_assert!(!parent.is_face_topology_only());

        if !options.sparse {
            self.select_all(parent);
        }
        debug_assert_eq!(self.face_selected.len(), parent.face_count());

        let split = self.traits.split;

        // Which child faces exist and which child vertices they need.
        let mut face_needed = vec![false; parent.face_count()];
        let mut edge_needed = self.edge_selected.clone();
        let mut vertex_needed = self.vertex_selected.clone();

        let mut child_face_exists = Relation::with_capacity(parent.face_count(), 0);
        for face in 0..parent.face_count() {
            let face_index = Index::from(face);
            let face_verts = parent.face_vertices(face_index);
            let face_edges = parent.face_edges(face_index);
            let size = face_verts.len();
            let selected = self.face_selected[face];

            let exists: Vec<bool> = (0..child_face_count(split, size))
                .map(|k| selected || (k < size && self.vertex_selected[face_verts[k].idx()]))
                .collect();

            for (k, _) in exists.iter().enumerate().filter(|&(_, &exists)| exists) {
                for corner in child_face_corners(split, size, k) {
                    match corner {
                        CornerSource::Center => face_needed[face] = true,
                        CornerSource::Edge(i) => edge_needed[face_edges[i].idx()] = true,
                        CornerSource::Vertex(i) => vertex_needed[face_verts[i].idx()] = true,
                    }
                }
            }
            child_face_exists.push_row(exists);
        }

        // Number the child vertices.
        let mut child_vertex_origin = Vec::new();
        if options.order_vertices_from_faces_first {
            self.face_child_vertex =
                number_children(&face_needed, ComponentOrigin::Face, &mut child_vertex_origin);
            self.edge_child_vertex =
                number_children(&edge_needed, ComponentOrigin::Edge, &mut child_vertex_origin);
            self.vertex_child_vertex =
                number_children(&vertex_needed, ComponentOrigin::Vertex, &mut child_vertex_origin);
        } else {
            self.vertex_child_vertex =
                number_children(&vertex_needed, ComponentOrigin::Vertex, &mut child_vertex_origin);
            self.face_child_vertex =
                number_children(&face_needed, ComponentOrigin::Face, &mut child_vertex_origin);
            self.edge_child_vertex =
                number_children(&edge_needed, ComponentOrigin::Edge, &mut child_vertex_origin);
        }
        self.child_vertex_origin = child_vertex_origin;
        let child_vertex_count = self.child_vertex_origin.len();

        // Build the child faces.
        let mut child_faces = Relation::with_capacity(0, 0);
        let mut child_corner_sources = Vec::new();
        let mut child_face_parent = Vec::new();
        let mut face_child_faces = Relation::with_capacity(parent.face_count(), 0);
        let mut child_vertex_face_count = vec![0usize; child_vertex_count];

        for (face, exists) in child_face_exists.iter().enumerate() {
            let face_index = Index::from(face);
            let size = parent.face_vertices(face_index).len();

            let row: Vec<Option<Index>> = exists
                .iter()
                .enumerate()
                .map(|(k, &exists)| {
                    exists.then(|| {
                        let corners = child_face_corners(split, size, k).filter_map(|source| {
                            let child_vertex =
                                self.child_vertex(self.resolve(parent, face_index, source))?;
                            child_vertex_face_count[child_vertex.idx()] += 1;
                            child_corner_sources.push(source);
                            Some(child_vertex)
                        });
                        child_faces.push_row(corners);
                        child_face_parent.push(face_index);
                        Index::from(child_face_parent.len() - 1)
                    })
                })
                .collect();
            face_child_faces.push_row(row);
        }
        debug_assert_eq!(child_corner_sources.len(), child_faces.member_count());

        self.face_child_faces = face_child_faces;
        self.child_face_parent = child_face_parent;

        let (vertex_sharpness, vertex_tags) =
            self.child_vertex_tags(parent, &child_vertex_face_count);

        *child = Level::from_child_faces(parent.depth() + 1, child_vertex_count, child_faces);

        self.refine_fvar_channels(parent, child, &child_corner_sources);

        if options.face_topology_only {
            child.prune_to_face_topology();
            self.face_child_edges = Relation::from_rows(
                (0..parent.face_count())
                    .map(|f| vec![None; parent.face_vertices(Index::from(f)).len()])
                    .collect(),
            );
            self.edge_child_edges = vec![[None; 2]; parent.edge_count()];
        } else {
            child.complete_topology();
            let (edge_sharpness, edge_tags) = self.child_edge_tags(parent, child);
            child.assign_inherited_tags(vertex_sharpness, vertex_tags, edge_sharpness, edge_tags);
            child.finalize_tags(&self.traits);
            self.map_child_edges(parent, child);
        }

        debug!(
            depth = child.depth(),
            sparse = options.sparse,
            vertices = child.vertex_count(),
            faces = child.face_count(),
            edges = child.edge_count(),
            "refined level"
        );
    }

    fn resolve(&self, parent: &Level, face: Index, source: CornerSource) -> ComponentOrigin {
        match source {
            CornerSource::Center => ComponentOrigin::Face(face),
            CornerSource::Edge(k) => ComponentOrigin::Edge(parent.face_edges(face)[k]),
            CornerSource::Vertex(k) => ComponentOrigin::Vertex(parent.face_vertices(face)[k]),
        }
    }

    fn child_vertex_tags(
        &self,
        parent: &Level,
        child_vertex_face_count: &[usize],
    ) -> (Vec<f32>, Vec<VTag>) {
        let crease = Crease::new(&self.options);
        let faces_per_edge_child = match self.traits.split {
            Split::ToQuads => 2,
            Split::ToTris => 3,
        };

        let mut sharpness = vec![crease::SHARPNESS_SMOOTH; self.child_vertex_origin.len()];
        let mut tags = vec![VTag::default(); self.child_vertex_origin.len()];

        for (child_vertex, origin) in self.child_vertex_origin.iter().enumerate() {
            let created = child_vertex_face_count[child_vertex];
            let tag = &mut tags[child_vertex];
            match *origin {
                ComponentOrigin::Face(face) => {
                    tag.incomplete = created < parent.face_vertices(face).len();
                }
                ComponentOrigin::Edge(edge) => {
                    let parent_tag = parent.edge_tag(edge);
                    let [v0, v1] = parent.edge_vertices(edge);
                    tag.boundary = parent_tag.boundary;
                    tag.non_manifold = parent_tag.non_manifold;
                    tag.incomplete = created < faces_per_edge_child * parent.edge_faces(edge).len()
                        || parent.vertex_tag(v0).incomplete
                        || parent.vertex_tag(v1).incomplete;
                }
                ComponentOrigin::Vertex(vertex) => {
                    let parent_tag = parent.vertex_tag(vertex);
                    tag.boundary = parent_tag.boundary;
                    tag.non_manifold = parent_tag.non_manifold;
                    tag.incomplete =
                        parent_tag.incomplete || created < parent.vertex_faces(vertex).len();
                    sharpness[child_vertex] =
                        crease.subdivide_vertex_sharpness(parent.vertex_sharpness(vertex));
                }
            }
        }

        (sharpness, tags)
    }

    fn child_edge_tags(&self, parent: &Level, child: &Level) -> (Vec<f32>, Vec<ETag>) {
        let crease = Crease::new(&self.options);
        let mut sharpness = vec![crease::SHARPNESS_SMOOTH; child.edge_count()];
        let mut tags = vec![ETag::default(); child.edge_count()];

        for child_edge in 0..child.edge_count() {
            let [a, b] = child.edge_vertices(Index::from(child_edge));
            let (edge, vertex) = match (
                self.child_vertex_origin[a.idx()],
                self.child_vertex_origin[b.idx()],
            ) {
                (ComponentOrigin::Edge(edge), ComponentOrigin::Vertex(vertex))
                | (ComponentOrigin::Vertex(vertex), ComponentOrigin::Edge(edge)) => (edge, vertex),
                // Edges interior to a parent face stay smooth.
                _ => continue,
            };

            let incident: Vec<f32> = parent
                .vertex_edges(vertex)
                .iter()
                .map(|&e| parent.edge_sharpness(e))
                .collect();
            let parent_tag = parent.edge_tag(edge);

            sharpness[child_edge] =
                crease.subdivide_edge_sharpness_at_vertex(parent.edge_sharpness(edge), &incident);
            tags[child_edge] = ETag {
                boundary: parent_tag.boundary,
                non_manifold: parent_tag.non_manifold,
                ..Default::default()
            };
        }

        (sharpness, tags)
    }

    fn map_child_edges(&mut self, parent: &Level, child: &Level) {
        let find = |a: Option<Index>, b: Option<Index>| child.find_edge(a?, b?);

        self.edge_child_edges = (0..parent.edge_count())
            .map(|edge| {
                let [v0, v1] = parent.edge_vertices(Index::from(edge));
                let mid = self.edge_child_vertex[edge];
                [
                    find(mid, self.vertex_child_vertex[v0.idx()]),
                    find(mid, self.vertex_child_vertex[v1.idx()]),
                ]
            })
            .collect();

        self.face_child_edges = Relation::from_rows(
            (0..parent.face_count())
                .map(|face| {
                    let face_edges = parent.face_edges(Index::from(face));
                    let size = face_edges.len();
                    (0..size)
                        .map(|k| {
                            let mid = self.edge_child_vertex[face_edges[k].idx()];
                            match self.traits.split {
                                Split::ToQuads => find(self.face_child_vertex[face], mid),
                                Split::ToTris => find(
                                    mid,
                                    self.edge_child_vertex[face_edges[(k + size - 1) % size].idx()],
                                ),
                            }
                        })
                        .collect()
                })
                .collect(),
        );
    }

    /// Child face-varying values are shared between child face-vertices with
    /// the same child vertex that interpolate the same parent values.
    fn refine_fvar_channels(
        &self,
        parent: &Level,
        child: &mut Level,
        child_corner_sources: &[CornerSource],
    ) {
        let channels: Vec<(usize, Vec<Index>)> = parent
            .fvar_channels()
            .iter()
            .map(|channel| {
                let mut value_map: HashMap<(Index, Vec<Index>), Index> = HashMap::new();
                let mut values = Vec::with_capacity(child_corner_sources.len());

                let corners = child.face_vertex_relation();
                for (child_face, child_face_verts) in corners.iter().enumerate() {
                    let parent_face = self.child_face_parent[child_face];
                    let start = parent.face_vertex_relation().offset(parent_face.idx());
                    let size = parent.face_vertices(parent_face).len();
                    let parent_values = &channel.values[start..start + size];

                    let sources = &child_corner_sources[corners.offset(child_face)..];
                    for (&child_vertex, source) in child_face_verts.iter().zip(sources) {
                        let mut key = match *source {
                            CornerSource::Vertex(k) => vec![parent_values[k]],
                            CornerSource::Edge(k) => {
                                vec![parent_values[k], parent_values[(k + 1) % size]]
                            }
                            CornerSource::Center => parent_values.to_vec(),
                        };
                        key.sort_unstable();
                        key.dedup();

                        let next = Index::from(value_map.len());
                        values.push(*value_map.entry((child_vertex, key)).or_insert(next));
                    }
                }

                (value_map.len(), values)
            })
            .collect();

        for (value_count, values) in channels {
            child.add_fvar_channel(value_count, values);
        }
    }
}

fn number_children(
    needed: &[bool],
    origin: fn(Index) -> ComponentOrigin,
    origins: &mut Vec<ComponentOrigin>,
) -> Vec<Option<Index>> {
    needed
        .iter()
        .enumerate()
        .map(|(i, &needed)| {
            needed.then(|| {
                origins.push(origin(Index::from(i)));
                Index::from(origins.len() - 1)
            })
        })
        .collect()
}

/// ### Parent to Child Mapping
impl Refinement {
    /// Returns the child vertex of a parent component, if it was refined.
    pub fn child_vertex(&self, origin: ComponentOrigin) -> Option<Index> {
        match origin {
            ComponentOrigin::Face(face) => {
                self.face_child_vertex.get(face.idx()).copied().flatten()
            }
            ComponentOrigin::Edge(edge) => {
                self.edge_child_vertex.get(edge.idx()).copied().flatten()
            }
            ComponentOrigin::Vertex(vertex) => {
                self.vertex_child_vertex.get(vertex.idx()).copied().flatten()
            }
        }
    }

    #[inline]
    pub fn face_child_vertex(&self, face: Index) -> Option<Index> {
        self.child_vertex(ComponentOrigin::Face(face))
    }

    #[inline]
    pub fn edge_child_vertex(&self, edge: Index) -> Option<Index> {
        self.child_vertex(ComponentOrigin::Edge(edge))
    }

    #[inline]
    pub fn vertex_child_vertex(&self, vertex: Index) -> Option<Index> {
        self.child_vertex(ComponentOrigin::Vertex(vertex))
    }

    /// Returns the child faces of a parent face, one per corner and, for
    /// triangle splits, the center face last.
    #[inline]
    pub fn face_child_faces(&self, face: Index) -> Option<&[Option<Index>]> {
        self.face_child_faces.get(face.idx())
    }

    /// Returns the child edges interior to a parent face, one per parent
    /// edge.
    #[inline]
    pub fn face_child_edges(&self, face: Index) -> Option<&[Option<Index>]> {
        self.face_child_edges.get(face.idx())
    }

    /// Returns the two child edges of a parent edge, in the order of the
    /// parent edge's vertices.
    #[inline]
    pub fn edge_child_edges(&self, edge: Index) -> Option<[Option<Index>; 2]> {
        self.edge_child_edges.get(edge.idx()).copied()
    }
}

/// ### Child to Parent Mapping
impl Refinement {
    #[inline]
    pub fn child_vertex_count(&self) -> usize {
        self.child_vertex_origin.len()
    }

    #[inline]
    pub fn child_face_count(&self) -> usize {
        self.child_face_parent.len()
    }

    #[inline]
    pub fn child_vertex_parent(&self, child_vertex: Index) -> Option<ComponentOrigin> {
        self.child_vertex_origin.get(child_vertex.idx()).copied()
    }

    #[inline]
    pub fn child_face_parent(&self, child_face: Index) -> Option<Index> {
        self.child_face_parent.get(child_face.idx()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(scheme: Scheme, vertex_count: usize, sizes: &[u32], indices: &[u32]) -> Level {
        let indices: Vec<Index> = indices.iter().map(|&i| Index(i)).collect();
        let mut level = Level::from_face_vertices(vertex_count, sizes, &indices, false);
        level.complete_topology();
        level.initialize_base_tags(&scheme.traits(), &Options::default());
        level
    }

    // 6 7 8
    // 3 4 5
    // 0 1 2
    fn grid_2x2() -> Level {
        base(
            Scheme::CatmullClark,
            9,
            &[4; 4],
            &[0, 1, 4, 3, 1, 2, 5, 4, 3, 4, 7, 6, 4, 5, 8, 7],
        )
    }

    fn uniform(faces_first: bool) -> RefinementOptions {
        RefinementOptions {
            order_vertices_from_faces_first: faces_first,
            ..Default::default()
        }
    }

    #[test]
    fn quad_split() {
        let parent = base(Scheme::CatmullClark, 4, &[4], &[0, 1, 2, 3]);
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(true));

        assert_eq!(child.depth(), 1);
        assert_eq!(child.vertex_count(), 9);
        assert_eq!(child.face_count(), 4);
        assert_eq!(child.edge_count(), 12);

        // Faces first: the face child vertex is numbered 0.
        assert_eq!(refinement.face_child_vertex(Index(0)), Some(Index(0)));
        assert_eq!(
            refinement.child_vertex_parent(Index(0)),
            Some(ComponentOrigin::Face(Index(0)))
        );

        let child_faces = refinement.face_child_faces(Index(0)).unwrap();
        assert_eq!(child_faces.len(), 4);
        let first = child.face_vertices(child_faces[0].unwrap());
        assert_eq!(first[0], refinement.vertex_child_vertex(Index(0)).unwrap());
        assert_eq!(first[2], refinement.face_child_vertex(Index(0)).unwrap());

        assert!(refinement
            .face_child_edges(Index(0))
            .unwrap()
            .iter()
            .all(Option::is_some));
        assert!(refinement.edge_child_edges(Index(0)).unwrap()[0].is_some());
    }

    #[test]
    fn vertices_first_ordering() {
        let parent = base(Scheme::CatmullClark, 4, &[4], &[0, 1, 2, 3]);
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(false));

        for vertex in 0..4u32 {
            assert_eq!(
                refinement.vertex_child_vertex(Index(vertex)),
                Some(Index(vertex))
            );
        }
        assert_eq!(refinement.face_child_vertex(Index(0)), Some(Index(4)));
    }

    #[test]
    fn triangle_split() {
        let parent = base(Scheme::Loop, 3, &[3], &[0, 1, 2]);
        let mut refinement = Refinement::new(Scheme::Loop, Options::default());
        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(true));

        assert_eq!(child.vertex_count(), 6);
        assert_eq!(child.face_count(), 4);
        assert_eq!(child.edge_count(), 9);
        assert!(refinement.face_child_vertex(Index(0)).is_none());

        let center = refinement.face_child_faces(Index(0)).unwrap()[3].unwrap();
        for vertex in child.face_vertices(center) {
            assert!(matches!(
                refinement.child_vertex_parent(*vertex),
                Some(ComponentOrigin::Edge(_))
            ));
        }
    }

    #[test]
    fn set_scheme_changes_the_split() {
        let parent = base(Scheme::Loop, 3, &[3], &[0, 1, 2]);
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(true));

        assert_eq!(child.vertex_count(), 7);
        assert_eq!(child.face_count(), 3);
        assert!(refinement.face_child_vertex(Index(0)).is_some());

        refinement.set_scheme(Scheme::Loop, Options::default());
        assert_eq!(refinement.scheme(), Scheme::Loop);
        assert!(refinement.face_child_faces(Index(0)).is_none());

        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(true));

        assert_eq!(child.vertex_count(), 6);
        assert_eq!(child.face_count(), 4);
        assert!(refinement.face_child_vertex(Index(0)).is_none());
    }

    #[test]
    fn face_topology_only() {
        let parent = grid_2x2();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(
            &parent,
            &mut child,
            RefinementOptions {
                face_topology_only: true,
                ..Default::default()
            },
        );

        assert!(child.is_face_topology_only());
        assert_eq!(child.vertex_count(), 25);
        assert_eq!(child.face_count(), 16);
        assert_eq!(child.edge_count(), 0);
    }

    #[test]
    fn sparse_refinement_of_one_face() {
        let parent = grid_2x2();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        refinement.bind(&parent);
        refinement.mark_face(Index(0));
        for &edge in parent.face_edges(Index(0)) {
            refinement.mark_edge(edge);
        }
        for &vertex in parent.face_vertices(Index(0)) {
            refinement.mark_vertex(vertex);
        }

        let mut child = Level::default();
        refinement.refine(
            &parent,
            &mut child,
            RefinementOptions {
                sparse: true,
                ..Default::default()
            },
        );

        assert_eq!(child.face_count(), 9);
        assert_eq!(child.vertex_count(), 16);
        assert!(refinement.vertex_child_vertex(Index(8)).is_none());

        let center = refinement.vertex_child_vertex(Index(4)).unwrap();
        assert!(!child.vertex_tag(center).incomplete);

        let far_face = refinement.face_child_vertex(Index(3)).unwrap();
        assert!(child.vertex_tag(far_face).incomplete);

        let boundary_edge = parent.find_edge(Index(1), Index(2)).unwrap();
        let boundary_mid = refinement.edge_child_vertex(boundary_edge).unwrap();
        assert!(child.vertex_tag(boundary_mid).incomplete);
        assert!(child.vertex_tag(boundary_mid).boundary);

        // The frontier of the sparse child is not mistaken for a boundary.
        let interior_mid = refinement
            .edge_child_vertex(parent.find_edge(Index(4), Index(5)).unwrap())
            .unwrap();
        assert!(!child.vertex_tag(interior_mid).boundary);
    }

    #[test]
    fn edge_sharpness_decays() {
        let indices: Vec<Index> = [0, 1, 4, 3, 1, 2, 5, 4, 3, 4, 7, 6, 4, 5, 8, 7]
            .into_iter()
            .map(Index)
            .collect();
        let mut parent = Level::from_face_vertices(9, &[4; 4], &indices, false);
        parent.complete_topology();
        let crease_edge = parent.find_edge(Index(1), Index(4)).unwrap();
        parent.set_edge_sharpness(crease_edge, 2.5);
        parent.initialize_base_tags(&Scheme::CatmullClark.traits(), &Options::default());

        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(&parent, &mut child, uniform(true));

        let [low, high] = refinement.edge_child_edges(crease_edge).unwrap();
        assert_eq!(child.edge_sharpness(low.unwrap()), 1.5);
        assert_eq!(child.edge_sharpness(high.unwrap()), 1.5);
        assert!(child.edge_tag(low.unwrap()).semi_sharp);

        let mid = refinement.edge_child_vertex(crease_edge).unwrap();
        assert_eq!(child.vertex_rule(mid), crate::sdc::Rule::Crease);
    }

    #[test]
    fn fvar_values_follow_seams() {
        // Two quads sharing the edge (1, 4).
        let indices: Vec<Index> = [0, 1, 4, 3, 1, 2, 5, 4].into_iter().map(Index).collect();

        let mut shared = Level::from_face_vertices(6, &[4, 4], &indices, false);
        shared.complete_topology();
        shared.add_fvar_channel(6, indices.clone());
        shared.initialize_base_tags(&Scheme::CatmullClark.traits(), &Options::default());

        let mut split = shared.clone();
        split.add_fvar_channel(8, (0..8u32).map(Index).collect());

        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut child = Level::default();
        refinement.refine(&split, &mut child, uniform(true));

        assert_eq!(child.vertex_count(), 15);
        assert_eq!(child.fvar_channel_count(), 2);
        assert_eq!(child.fvar_value_count(0), 15);
        assert_eq!(child.fvar_value_count(1), 18);
    }
}
