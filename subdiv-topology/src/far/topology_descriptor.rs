//! A container holding references to raw topology data.
//!
//! ## Example
//! ```
//! # use subdiv_topology::far::TopologyDescriptor;
//! // Describe the basic topology of a tetrahedron.
//! let mut tetrahedron = TopologyDescriptor::new(
//!     4,
//!     // Four triangles.
//!     &[3; 4],
//!     // Vertex indices for each triangle.
//!     &[2, 1, 0, 3, 2, 0, 1, 3, 0, 2, 3, 1],
//! )?;
//!
//! // Make all edges creased with sharpness 8.0.
//! tetrahedron.creases(&[0, 2, 0, 3, 1, 3, 0, 1, 2, 3, 1, 2], &[8.0; 6]);
//! # Ok::<(), subdiv_topology::Error>(())
//! ```
//!
//! ## Semi-Sharp Creases
//! Sharpness values associated with edges and vertices modify the subdivision
//! rules locally. A value of 10 (or more) makes the feature infinitely sharp;
//! the boundaries between the piecewise smooth surfaces become
//! discontinuous.
//!
//! Real world surfaces rarely have infinitely sharp edges when viewed
//! sufficiently close, so it is often preferable to use a lower value, making
//! the crease "semi-sharp". Semi-sharp features decay by one unit of sharpness
//! with every level of refinement and are therefore isolated by
//! feature-adaptive refinement until they have vanished.
//!
//! Sharpness values range from 0–10, with a value of 0 (or less) having no
//! effect on the surface.
use bytemuck::cast_slice;
use tracing::warn;

use crate::sdc::{Options, Scheme};
use crate::vtr::level::{winding, Level};
use crate::{Error, Index, Result};

/// A `TopologyDescriptor` holds references to raw topology data as flat index
/// buffers.
///
/// This is used to construct a
/// [`TopologyRefiner`](crate::far::TopologyRefiner).
///
/// See the [module level documentation](crate::far::topology_descriptor) for
/// an example.
#[derive(Clone, Debug)]
pub struct TopologyDescriptor<'a> {
    vertex_count: usize,
    vertices_per_face: &'a [u32],
    vertex_indices_per_face: &'a [u32],
    creases: Option<(&'a [u32], &'a [f32])>,
    corners: Option<(&'a [u32], &'a [f32])>,
    face_varying_channels: Vec<FaceVaryingChannel<'a>>,
    left_handed: bool,
}

#[derive(Copy, Clone, Debug)]
struct FaceVaryingChannel<'a> {
    value_count: usize,
    value_indices: &'a [u32],
}

impl<'a> TopologyDescriptor<'a> {
    /// Describes a mesh topology. Creases, corners, face-varying channels and
    /// handedness can be added afterwards.
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - The number of vertices in the mesh.
    /// * `vertices_per_face` - A slice containing the number of vertices for
    ///   each face in the mesh. The length of this is the number of faces in
    ///   the mesh.
    /// * `vertex_indices_per_face` - A flat list of the vertex indices for each
    ///   face in the mesh.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTopology`] if a face has fewer than three
    /// vertices or the number of vertex indices is not the sum of the face
    /// sizes. With the `topology_validation` feature, vertex indices are also
    /// checked against `vertex_count`.
    pub fn new(
        vertex_count: usize,
        vertices_per_face: &'a [u32],
        vertex_indices_per_face: &'a [u32],
    ) -> Result<TopologyDescriptor<'a>> {
        if let Some(face) = vertices_per_face.iter().position(|&size| size < 3) {
            return Err(Error::InvalidTopology(format!(
                "Face {} has {} vertices (should be >= 3).",
                face, vertices_per_face[face]
            )));
        }

        if vertex_indices_per_face.len()
            != vertices_per_face.iter().map(|&size| size as usize).sum::<usize>()
        {
            return Err(Error::InvalidTopology(
                "The number of vertex indices is not equal to the sum of face arities."
                    .to_string(),
            ));
        }

        #[cfg(feature = "topology_validation")]
        for (i, &vertex_index) in vertex_indices_per_face.iter().enumerate() {
            if vertex_count <= vertex_index as usize {
                return Err(Error::InvalidTopology(format!(
                    "Vertex index[{}] = {} is out of range (should be < {}).",
                    i, vertex_index, vertex_count
                )));
            }
        }

        Ok(TopologyDescriptor {
            vertex_count,
            vertices_per_face,
            vertex_indices_per_face,
            creases: None,
            corners: None,
            face_varying_channels: Vec::new(),
            left_handed: false,
        })
    }

    /// Add creases as vertex index pairs with corresponding sharpness.
    ///
    /// Pairs that do not name an edge of the mesh are ignored.
    #[inline]
    pub fn creases(&mut self, creases: &'a [u32], sharpness: &'a [f32]) -> &mut Self {
        self.creases = Some((creases, sharpness));
        self
    }

    /// Add corners as vertex indices with corresponding sharpness.
    #[inline]
    pub fn corners(&mut self, corners: &'a [u32], sharpness: &'a [f32]) -> &mut Self {
        self.corners = Some((corners, sharpness));
        self
    }

    /// Add a face-varying channel.
    ///
    /// * `value_count` - The number of distinct values in the channel.
    /// * `value_indices` - One value index per face-vertex, in the same order
    ///   as the vertex indices.
    #[inline]
    pub fn face_varying_channel(
        &mut self,
        value_count: usize,
        value_indices: &'a [u32],
    ) -> &mut Self {
        self.face_varying_channels.push(FaceVaryingChannel {
            value_count,
            value_indices,
        });
        self
    }

    /// Set if the topology describes faces with left handed (clockwise)
    /// winding.
    #[inline]
    pub fn left_handed(&mut self, left_handed: bool) -> &mut Self {
        self.left_handed = left_handed;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.vertices_per_face.len()
    }

    /// Builds and tags the base level of a refiner.
    pub(crate) fn build_level(&self, scheme: Scheme, options: &Options) -> Result<Level> {
        if scheme == Scheme::Loop {
            if let Some(face) = self.vertices_per_face.iter().position(|&size| size != 3) {
                return Err(Error::InvalidTopology(format!(
                    "Face {} has {} vertices; the Loop scheme only supports triangles.",
                    face, self.vertices_per_face[face]
                )));
            }
        }

        let mut level = Level::from_face_vertices(
            self.vertex_count,
            self.vertices_per_face,
            cast_slice(self.vertex_indices_per_face),
            self.left_handed,
        );
        level.complete_topology();

        if let Some((creases, sharpness)) = self.creases {
            if creases.len() % 2 != 0 || creases.len() / 2 != sharpness.len() {
                return Err(Error::InvalidTopology(format!(
                    "{} crease vertex indices do not form one pair per each of the {} sharpness values.",
                    creases.len(),
                    sharpness.len()
                )));
            }
            self.check_vertex_indices("Crease", creases)?;

            for (pair, &sharpness) in creases.chunks_exact(2).zip(sharpness) {
                match level.find_edge(Index(pair[0]), Index(pair[1])) {
                    Some(edge) => level.set_edge_sharpness(edge, sharpness),
                    None => warn!(
                        vertex0 = pair[0],
                        vertex1 = pair[1],
                        "ignoring crease that is not an edge of the mesh"
                    ),
                }
            }
        }

        if let Some((corners, sharpness)) = self.corners {
            if corners.len() != sharpness.len() {
                return Err(Error::InvalidTopology(format!(
                    "{} corner vertex indices do not match {} sharpness values.",
                    corners.len(),
                    sharpness.len()
                )));
            }
            self.check_vertex_indices("Corner", corners)?;

            for (&corner, &sharpness) in corners.iter().zip(sharpness) {
                level.set_vertex_sharpness(Index(corner), sharpness);
            }
        }

        for (channel, fvar) in self.face_varying_channels.iter().enumerate() {
            if fvar.value_indices.len() != self.vertex_indices_per_face.len() {
                return Err(Error::InvalidTopology(format!(
                    "Face-varying channel {} has {} value indices (should be {}).",
                    channel,
                    fvar.value_indices.len(),
                    self.vertex_indices_per_face.len()
                )));
            }
            if let Some(&value) = fvar
                .value_indices
                .iter()
                .find(|&&value| fvar.value_count <= value as usize)
            {
                return Err(Error::InvalidTopology(format!(
                    "Face-varying channel {} value index {} is out of range (should be < {}).",
                    channel, value, fvar.value_count
                )));
            }

            let mut values = Vec::with_capacity(fvar.value_indices.len());
            let mut start = 0;
            for &size in self.vertices_per_face {
                let face = &fvar.value_indices[start..start + size as usize];
                values.extend(winding(face.len(), self.left_handed).map(|i| Index(face[i])));
                start += size as usize;
            }
            level.add_fvar_channel(fvar.value_count, values);
        }

        level.initialize_base_tags(&scheme.traits(), options);

        Ok(level)
    }

    fn check_vertex_indices(&self, what: &str, indices: &[u32]) -> Result<()> {
        match indices
            .iter()
            .enumerate()
            .find(|&(_, &index)| self.vertex_count <= index as usize)
        {
            Some((i, index)) => Err(Error::InvalidTopology(format!(
                "{} index[{}] = {} is out of range (should be < {}).",
                what, i, index, self.vertex_count
            ))),
            None => Ok(()),
        }
    }
}
