//! Tests for the far module.


use subdiv_topology::far::*;
use subdiv_topology::sdc::Rule;
use subdiv_topology::vtr::ComponentOrigin;
use subdiv_topology::{Error, Index};
use test_utils::*;

#[test]
fn test_topology_refiner_options_default() {
    let options = TopologyRefinerOptions::default();
    assert!(matches!(options.scheme, Scheme::CatmullClark));
    assert!(options.boundary_interpolation.is_none());
    assert!(matches!(
        options.face_varying_linear_interpolation,
        Some(FaceVaryingLinearInterpolation::All)
    ));
    assert!(matches!(options.creasing_method, CreasingMethod::Uniform));
    assert!(matches!(
        options.triangle_subdivision,
        TriangleSubdivision::CatmullClark
    ));
}

#[test]
fn test_refinement_options_default() {
    let uniform = UniformRefinementOptions::default();
    assert_eq!(uniform.refinement_level, 4);
    assert!(uniform.order_vertices_from_faces_first);
    assert!(uniform.full_topology_in_last_level);

    let adaptive = AdaptiveRefinementOptions::default();
    assert_eq!(adaptive.isolation_level, 4);
    assert!(!adaptive.order_vertices_from_faces_first);
    assert!(adaptive.full_topology_in_last_level);
}

#[test]
fn test_base_level() -> anyhow::Result<()> {
    let refiner = cube_refiner()?;

    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.max_level(), 0);
    assert!(refiner.is_uniform());
    assert_eq!(refiner.max_valence(), 3);

    let base = refiner.level(0).unwrap();
    assert_eq!(base.depth(), 0);
    assert_eq!(base.vertex_count(), 8);
    assert_eq!(base.edge_count(), 12);
    assert_eq!(base.face_count(), 6);
    assert_eq!(base.face_vertex_count(), 24);
    assert!(base.has_full_topology());
    assert!(refiner.level(1).is_none());

    assert_eq!(
        base.face_vertices(Index(1)),
        Some(&[Index(2), Index(3), Index(5), Index(4)][..])
    );
    assert_eq!(base.vertex_faces(Index(0)).map(<[_]>::len), Some(3));
    assert!(base.is_vertex_extraordinary(Index(0)));
    assert!(!base.is_vertex_boundary(Index(0)));
    assert!(base.face_vertices(Index(6)).is_none());

    Ok(())
}

#[test]
fn test_uniform_refinement_counts() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 2,
        ..Default::default()
    })?;

    assert!(refiner.is_uniform());
    assert_eq!(refiner.max_level(), 2);
    assert_eq!(refiner.refinement_levels(), 3);

    let level1 = refiner.level(1).unwrap();
    assert_eq!(level1.vertex_count(), 26);
    assert_eq!(level1.edge_count(), 48);
    assert_eq!(level1.face_count(), 24);

    let level2 = refiner.level(2).unwrap();
    assert_eq!(level2.vertex_count(), 98);
    assert_eq!(level2.edge_count(), 192);
    assert_eq!(level2.face_count(), 96);
    assert!(level2.has_full_topology());

    assert_eq!(refiner.vertex_total_count(), 8 + 26 + 98);
    assert_eq!(refiner.edge_total_count(), 12 + 48 + 192);
    assert_eq!(refiner.face_total_count(), 6 + 24 + 96);
    assert_eq!(refiner.face_vertex_total_count(), 24 + 96 + 384);

    // Original corners stay extraordinary, new vertices are regular.
    assert_eq!(refiner.max_valence(), 4);

    Ok(())
}

#[test]
fn test_uniform_vertex_ordering() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    let base = refiner.level(0).unwrap();
    let child = refiner.level(1).unwrap();

    // Faces first: face-vertices, then edge-vertices, then vertex-vertices.
    assert_eq!(base.face_child_vertex(Index(0)), Some(Index(0)));
    assert_eq!(base.edge_child_vertex(Index(0)), Some(Index(6)));
    assert_eq!(base.vertex_child_vertex(Index(0)), Some(Index(18)));

    assert_eq!(
        child.vertex_parent(Index(0)),
        Some(ComponentOrigin::Face(Index(0)))
    );
    assert_eq!(
        child.vertex_parent(Index(18)),
        Some(ComponentOrigin::Vertex(Index(0)))
    );

    let children = base.face_child_faces(Index(2)).unwrap();
    assert_eq!(children.len(), 4);
    for child_face in children {
        assert_eq!(child.face_parent_face(child_face.unwrap()), Some(Index(2)));
    }

    // The last level has no child refinement.
    assert!(child.face_child_faces(Index(0)).is_none());
    assert!(base.face_parent_face(Index(0)).is_none());

    Ok(())
}

#[test]
fn test_uniform_vertices_first_ordering() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        order_vertices_from_faces_first: false,
        ..Default::default()
    })?;

    let base = refiner.level(0).unwrap();
    assert_eq!(base.vertex_child_vertex(Index(0)), Some(Index(0)));
    assert_eq!(base.face_child_vertex(Index(0)), Some(Index(8)));
    assert_eq!(base.edge_child_vertex(Index(0)), Some(Index(14)));

    Ok(())
}

#[test]
fn test_uniform_face_topology_only_last_level() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 2,
        full_topology_in_last_level: false,
        ..Default::default()
    })?;

    assert!(refiner.level(1).unwrap().has_full_topology());

    let last = refiner.level(2).unwrap();
    assert!(!last.has_full_topology());
    assert_eq!(last.vertex_count(), 98);
    assert_eq!(last.face_count(), 96);
    assert_eq!(last.edge_count(), 0);
    assert!(last.face_vertices(Index(0)).is_some());
    assert!(last.face_edges(Index(0)).is_none());
    assert!(last.vertex_faces(Index(0)).is_none());

    Ok(())
}

#[test]
fn test_uniform_refinement_level_zero() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 0,
        full_topology_in_last_level: false,
        ..Default::default()
    })?;

    assert!(refiner.is_uniform());
    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.max_level(), 0);
    assert_eq!(refiner.face_total_count(), 6);

    // The base level is never pruned.
    let base = refiner.level(0).unwrap();
    assert!(base.has_full_topology());
    assert_eq!(base.edge_count(), 12);
    assert!(base.vertex_faces(Index(0)).is_some());
    assert_eq!(refiner.ptex_face_count(), 6);

    Ok(())
}

#[test]
fn test_loop_uniform_refinement() -> anyhow::Result<()> {
    let descriptor = TopologyDescriptor::new(
        TETRAHEDRON_VERTEX_COUNT,
        &TETRAHEDRON_VERTICES_PER_FACE,
        &TETRAHEDRON_FACE_VERTICES,
    )?;
    let mut refiner = TopologyRefiner::new(descriptor, loop_options())?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    let child = refiner.level(1).unwrap();
    assert_eq!(child.vertex_count(), 4 + 6);
    assert_eq!(child.edge_count(), 2 * 6 + 3 * 4);
    assert_eq!(child.face_count(), 16);
    assert!(child
        .face_vertices_iter()
        .all(|face_vertices| face_vertices.len() == 3));

    Ok(())
}

#[test]
fn test_loop_rejects_quads() -> anyhow::Result<()> {
    let descriptor = TopologyDescriptor::new(
        CUBE_VERTEX_COUNT,
        &CUBE_VERTICES_PER_FACE,
        &CUBE_FACE_VERTICES,
    )?;
    assert!(matches!(
        TopologyRefiner::new(descriptor, loop_options()),
        Err(Error::InvalidTopology(_))
    ));

    Ok(())
}

#[test]
fn test_refining_again_replaces_the_hierarchy() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 3,
        ..Default::default()
    })?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    assert_eq!(refiner.max_level(), 1);
    assert_eq!(refiner.refinement_levels(), 2);
    assert_eq!(refiner.vertex_total_count(), 8 + 26);

    Ok(())
}

#[test]
fn test_unrefine() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 2,
        ..Default::default()
    })?;

    refiner.unrefine();
    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.max_level(), 0);
    assert_eq!(refiner.vertex_total_count(), 8);
    assert_eq!(refiner.level(0).unwrap().face_count(), 6);
    assert!(refiner.level(0).unwrap().face_child_faces(Index(0)).is_none());

    // Unrefining twice is harmless.
    refiner.unrefine();
    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.vertex_total_count(), 8);

    // The base level can be refined again.
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;
    assert_eq!(refiner.level(1).unwrap().vertex_count(), 26);

    Ok(())
}

#[test]
fn test_clear() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    refiner.clear();
    assert_eq!(refiner.refinement_levels(), 0);
    assert_eq!(refiner.max_level(), 0);
    assert_eq!(refiner.vertex_total_count(), 0);
    assert_eq!(refiner.face_total_count(), 0);
    assert_eq!(refiner.max_valence(), 0);
    assert!(refiner.level(0).is_none());

    assert!(matches!(
        refiner.refine_uniform(UniformRefinementOptions::default()),
        Err(Error::EmptyBaseLevel)
    ));

    let descriptor = TopologyDescriptor::new(
        CUBE_VERTEX_COUNT,
        &CUBE_VERTICES_PER_FACE,
        &CUBE_FACE_VERTICES,
    )?;
    refiner.set_base_topology(&descriptor)?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;
    assert_eq!(refiner.vertex_total_count(), 8 + 26);

    Ok(())
}

#[test]
fn test_unrefine_after_clear() {
    let mut refiner = TopologyRefiner::empty(catmark_options());
    refiner.clear();
    refiner.unrefine();

    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.level(0).unwrap().vertex_count(), 0);
    assert!(matches!(
        refiner.refine_uniform(UniformRefinementOptions::default()),
        Err(Error::EmptyBaseLevel)
    ));
}

#[test]
fn test_empty_refiner() {
    let mut refiner = TopologyRefiner::empty(catmark_options());

    assert_eq!(refiner.refinement_levels(), 1);
    assert_eq!(refiner.vertex_total_count(), 0);
    assert_eq!(refiner.ptex_face_count(), 0);
    assert!(matches!(
        refiner.refine_uniform(UniformRefinementOptions::default()),
        Err(Error::EmptyBaseLevel)
    ));
}

#[test]
fn test_failed_set_base_topology_keeps_hierarchy() -> anyhow::Result<()> {
    let mut refiner = cube_refiner()?;
    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 2,
        ..Default::default()
    })?;

    let mut descriptor = TopologyDescriptor::new(
        CUBE_VERTEX_COUNT,
        &CUBE_VERTICES_PER_FACE,
        &CUBE_FACE_VERTICES,
    )?;
    // Three crease indices cannot form pairs.
    descriptor.creases(&[0, 1, 3], &[2.0]);

    assert!(matches!(
        refiner.set_base_topology(&descriptor),
        Err(Error::InvalidTopology(_))
    ));
    assert_eq!(refiner.refinement_levels(), 3);
    assert_eq!(refiner.level(2).unwrap().vertex_count(), 98);

    Ok(())
}

#[test]
fn test_descriptor_errors() {
    assert!(matches!(
        TopologyDescriptor::new(4, &[4, 2], &[0, 1, 2, 3, 0, 1]),
        Err(Error::InvalidTopology(_))
    ));
    assert!(matches!(
        TopologyDescriptor::new(4, &[4], &[0, 1, 2]),
        Err(Error::InvalidTopology(_))
    ));
}

#[cfg(feature = "topology_validation")]
#[test]
fn test_descriptor_vertex_out_of_range() {
    assert!(matches!(
        TopologyDescriptor::new(4, &[4], &[0, 1, 2, 4]),
        Err(Error::InvalidTopology(_))
    ));
}

#[test]
fn test_creases_and_corners() -> anyhow::Result<()> {
    let mut descriptor = TopologyDescriptor::new(
        CUBE_VERTEX_COUNT,
        &CUBE_VERTICES_PER_FACE,
        &CUBE_FACE_VERTICES,
    )?;
    descriptor
        .creases(&[0, 1, 1, 3], &[2.0, 10.0])
        .corners(&[6], &[1.5]);
    let mut refiner = TopologyRefiner::new(descriptor, catmark_options())?;

    let base = refiner.level(0).unwrap();
    let edge = base.find_edge(Index(0), Index(1)).unwrap();
    assert_eq!(base.edge_sharpness(edge), Some(2.0));
    assert_eq!(base.vertex_sharpness(Index(6)), Some(1.5));
    assert_eq!(base.vertex_rule(Index(1)), Some(Rule::Crease));
    assert_eq!(base.vertex_rule(Index(6)), Some(Rule::Corner));
    assert!(base.edge_tag(edge).unwrap().semi_sharp);

    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    // Semi-sharp creases lose one unit of sharpness per level.
    let base = refiner.level(0).unwrap();
    let child = refiner.level(1).unwrap();
    let edge = base.find_edge(Index(0), Index(1)).unwrap();
    for child_edge in base.edge_child_edges(edge).unwrap() {
        assert_eq!(child.edge_sharpness(child_edge.unwrap()), Some(1.0));
    }
    let child_corner = base.vertex_child_vertex(Index(6)).unwrap();
    assert_eq!(child.vertex_sharpness(child_corner), Some(0.5));

    Ok(())
}

#[test]
fn test_face_varying_channel() -> anyhow::Result<()> {
    // Two quads sharing an edge, with a seam along it.
    let vertices_per_face = [4, 4];
    let face_vertices = [0, 1, 4, 3, 1, 2, 5, 4];
    let uvs = [0, 1, 2, 3, 4, 5, 6, 7];

    let mut descriptor = TopologyDescriptor::new(6, &vertices_per_face, &face_vertices)?;
    descriptor.face_varying_channel(8, &uvs);
    let mut refiner = TopologyRefiner::new(descriptor, edge_and_corner_options())?;

    let base = refiner.level(0).unwrap();
    assert_eq!(base.face_varying_channel_count(), 1);
    assert_eq!(base.face_varying_value_count(0), 8);
    assert_eq!(
        base.face_varying_values_on_face(Index(1), 0),
        Some(&[Index(4), Index(5), Index(6), Index(7)][..])
    );
    assert!(base.face_varying_values_on_face(Index(0), 1).is_none());

    refiner.refine_uniform(UniformRefinementOptions {
        refinement_level: 1,
        ..Default::default()
    })?;

    let child = refiner.level(1).unwrap();
    assert_eq!(child.face_varying_channel_count(), 1);
    // Every child vertex on the seam carries one value per side.
    assert!(child.face_varying_value_count(0) > child.vertex_count());
    assert_eq!(
        refiner.face_varying_value_total_count(0),
        8 + child.face_varying_value_count(0)
    );

    Ok(())
}

#[test]
fn test_left_handed_winding() -> anyhow::Result<()> {
    let mut descriptor = TopologyDescriptor::new(4, &[4], &[0, 1, 2, 3])?;
    descriptor.left_handed(true);
    let refiner = TopologyRefiner::new(descriptor, catmark_options())?;

    let base = refiner.level(0).unwrap();
    let face_vertices = base.face_vertices(Index(0)).unwrap();
    assert_eq!(face_vertices[0], Index(0));
    assert_eq!(face_vertices[1], Index(3));

    Ok(())
}
