//! Selection of the components of a [`Level`] to be refined sparsely.
use super::level::Level;
use super::refinement::Refinement;
use crate::Index;

/// Marks components of a parent [`Level`] in a [`Refinement`] for a
/// subsequent sparse [`refine()`](Refinement::refine).
///
/// Selecting a face also selects its edges and vertices.
#[derive(Debug)]
pub struct SparseSelector<'a> {
    refinement: &'a mut Refinement,
    parent: &'a Level,
}

impl<'a> SparseSelector<'a> {
    /// Binds a selector to a refinement and clears any previous selection.
    pub fn new(refinement: &'a mut Refinement, parent: &'a Level) -> Self {
        refinement.bind(parent);
        Self { refinement, parent }
    }

    #[inline]
    pub fn parent(&self) -> &'a Level {
        self.parent
    }

    pub fn select_face(&mut self, face: Index) {
        self.refinement.mark_face(face);
        for &edge in self.parent.face_edges(face) {
            self.refinement.mark_edge(edge);
        }
        for &vertex in self.parent.face_vertices(face) {
            self.refinement.mark_vertex(vertex);
        }
    }

    /// Selects an edge and both of its vertices.
    pub fn select_edge(&mut self, edge: Index) {
        self.refinement.mark_edge(edge);
        for vertex in self.parent.edge_vertices(edge) {
            self.refinement.mark_vertex(vertex);
        }
    }

    #[inline]
    pub fn select_vertex(&mut self, vertex: Index) {
        self.refinement.mark_vertex(vertex);
    }

    #[inline]
    pub fn is_face_selected(&self, face: Index) -> bool {
        self.refinement.is_face_selected(face)
    }

    #[inline]
    pub fn is_selection_empty(&self) -> bool {
        self.refinement.is_selection_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdc::{Options, Scheme};

    fn quad_pair() -> Level {
        let indices: Vec<Index> = [0, 1, 4, 3, 1, 2, 5, 4].into_iter().map(Index).collect();
        let mut level = Level::from_face_vertices(6, &[4, 4], &indices, false);
        level.complete_topology();
        level.initialize_base_tags(&Scheme::CatmullClark.traits(), &Options::default());
        level
    }

    #[test]
    fn new_selector_is_empty() {
        let level = quad_pair();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let selector = SparseSelector::new(&mut refinement, &level);
        assert!(selector.is_selection_empty());
        assert_eq!(selector.parent().face_count(), 2);
    }

    #[test]
    fn selecting_a_face_selects_its_boundary() {
        let level = quad_pair();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let mut selector = SparseSelector::new(&mut refinement, &level);
        selector.select_face(Index(1));
        assert!(!selector.is_selection_empty());
        assert!(selector.is_face_selected(Index(1)));
        assert!(!selector.is_face_selected(Index(0)));

        let shared = level.find_edge(Index(1), Index(4)).unwrap();
        assert!(refinement.is_edge_selected(shared));
        assert!(refinement.is_vertex_selected(Index(5)));
        assert!(!refinement.is_vertex_selected(Index(0)));
    }

    #[test]
    fn new_selector_clears_previous_selection() {
        let level = quad_pair();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        SparseSelector::new(&mut refinement, &level).select_vertex(Index(3));
        assert!(refinement.is_vertex_selected(Index(3)));

        let selector = SparseSelector::new(&mut refinement, &level);
        assert!(selector.is_selection_empty());
    }

    #[test]
    fn selecting_an_edge_selects_its_vertices() {
        let level = quad_pair();
        let mut refinement = Refinement::new(Scheme::CatmullClark, Options::default());
        let edge = level.find_edge(Index(2), Index(5)).unwrap();
        SparseSelector::new(&mut refinement, &level).select_edge(edge);
        assert!(refinement.is_vertex_selected(Index(2)));
        assert!(refinement.is_vertex_selected(Index(5)));
        assert!(!refinement.is_face_selected(Index(1)));
    }
}
