//! Feature-adaptive face selection for the *Catmull-Clark* scheme.
//!
//! Selection runs in two phases so that the per-face decision stays a pure
//! function of the parent level:
//! 1. [`classify_catmark_face()`] decides for every face whether it is
//!    skipped, selected, or selected together with its neighborhood.
//! 2. [`catmark_feature_adaptive_selector()`] applies the decisions to a
//!    [`SparseSelector`], selecting plain faces first and unioning the
//!    neighborhoods of irregular faces afterwards.
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::sdc::{Rule, Scheme};
use crate::vtr::{CompositeVTag, Level, SparseSelector};
use crate::Index;

/// Selection decision for a single face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceSelection {
    /// The face is regular or its neighborhood is not yet known.
    Skip,
    /// The face needs further refinement.
    Select,
    /// The face is irregular; it and every face sharing one of its vertices
    /// need further refinement.
    SelectNeighborhood,
}

/// Classifies one face of a *Catmull-Clark* level.
///
/// Non-quads are [`SelectNeighborhood`](FaceSelection::SelectNeighborhood).
/// Quads are decided by [`classify_catmark_composite()`] on the union of
/// their vertex tags.
pub fn classify_catmark_face(level: &Level, face: Index) -> FaceSelection {
    if level.face_vertices(face).len() != Scheme::CatmullClark.regular_face_size() {
        return FaceSelection::SelectNeighborhood;
    }

    classify_catmark_composite(level.face_composite_vtag(face))
}

/// Classifies a quad from the composite tag of its vertices.
///
/// Rules are applied in order, the first match wins:
/// 1. Faces with an incomplete vertex are skipped.
/// 2. Extraordinary or semi-sharp vertices, darts and non-manifold vertices
///    select the face.
/// 3. Faces without any smooth vertex (only creases and corners) are
///    selected.
/// 4. Everything else is regular and skipped.
pub fn classify_catmark_composite(composite: CompositeVTag) -> FaceSelection {
    if composite.incomplete {
        FaceSelection::Skip
    } else if composite.xordinary || composite.semi_sharp {
        FaceSelection::Select
    } else if composite.rule.contains(Rule::Dart) {
        FaceSelection::Select
    } else if composite.non_manifold {
        FaceSelection::Select
    } else if !composite.rule.contains(Rule::Smooth) {
        FaceSelection::Select
    } else {
        FaceSelection::Skip
    }
}

/// Classifies every face of a level, in face order.
pub fn classify_catmark_faces(level: &Level) -> Vec<FaceSelection> {
    #[cfg(feature = "rayon")]
    let faces = (0..level.face_count()).into_par_iter();
    #[cfg(not(feature = "rayon"))]
    let faces = 0..level.face_count();

    faces
        .map(|face| classify_catmark_face(level, Index::from(face)))
        .collect()
}

/// Selects a face and every face incident to one of its vertices.
pub fn select_neighborhood(selector: &mut SparseSelector<'_>, face: Index) {
    let level = selector.parent();
    selector.select_face(face);
    for &vertex in level.face_vertices(face) {
        for &neighbor in level.vertex_faces(vertex) {
            selector.select_face(neighbor);
        }
    }
}

/// Selects the faces of the selector's parent level that need further
/// refinement.
///
/// Returns the number of faces whose own classification asked for
/// selection; neighbors selected on behalf of irregular faces are not
/// counted.
pub fn catmark_feature_adaptive_selector(selector: &mut SparseSelector<'_>) -> usize {
    let decisions = classify_catmark_faces(selector.parent());

    let mut selected = 0;
    for (face, _) in decisions
        .iter()
        .enumerate()
        .filter(|&(_, &decision)| decision == FaceSelection::Select)
    {
        selector.select_face(Index::from(face));
        selected += 1;
    }

    for (face, _) in decisions
        .iter()
        .enumerate()
        .filter(|&(_, &decision)| decision == FaceSelection::SelectNeighborhood)
    {
        select_neighborhood(selector, Index::from(face));
        selected += 1;
    }

    selected
}
