//! Lowering of a parsed [`DataStore`] into a [`Mesh`].
//!
//! OBJ indexes positions, uvs and normals independently per corner, while a
//! GPU vertex buffer needs a single index. Every distinct
//! `(position, uv, normal)` triple becomes one output vertex; repeats reuse it.
//! Polygons are fan-triangulated around their first corner, which assumes
//! convex, planar input.

use std::collections::HashMap;

use crate::{
    error::{AttributeKind, LoadError, LoadResult},
    mesh::{Mesh, MeshGroup, MeshVertex},
    records::{Face, FaceVertex, Group},
    store::DataStore,
};

/// Fan triangles `(v0, vi, vi+1)` of a face, in emission order.
pub fn fan_triangulate(face: &Face) -> impl Iterator<Item = [FaceVertex; 3]> + '_ {
    let corners = face.vertices();
    (1..corners.len().saturating_sub(1)).map(move |i| [corners[0], corners[i], corners[i + 1]])
}

/// Single-use assembler; the corner map lives only as long as one assembly.
pub struct MeshAssembler<'a> {
    store: &'a DataStore,
    unique: HashMap<FaceVertex, u32>,
    vertices: Vec<MeshVertex>,
}

impl<'a> MeshAssembler<'a> {
    pub fn new(store: &'a DataStore) -> Self {
        Self {
            store,
            unique: HashMap::new(),
            vertices: Vec::with_capacity(store.vertices().len()),
        }
    }

    pub fn assemble(mut self) -> LoadResult<Mesh> {
        let store = self.store;
        let mut groups = Vec::with_capacity(store.groups().len());

        for group in store.groups() {
            let mut indices = Vec::new();
            for (face_no, face) in group.faces.iter().enumerate() {
                for triangle in fan_triangulate(face) {
                    for corner in triangle {
                        indices.push(self.output_index(corner, group, face_no)?);
                    }
                }
            }
            groups.push(MeshGroup::new(group.name.clone(), group.material.clone(), indices));
        }

        let mesh = Mesh::new(self.vertices, groups);
        log::debug!(
            "Assembled mesh: {} unique vertices, {} triangles, {} groups",
            mesh.vertices.len(),
            mesh.triangle_count(),
            mesh.groups.len()
        );
        Ok(mesh)
    }

    fn output_index(&mut self, corner: FaceVertex, group: &Group, face_no: usize) -> LoadResult<u32> {
        if let Some(&index) = self.unique.get(&corner) {
            return Ok(index);
        }

        let out_of_range = |sequence: AttributeKind, index: i64| LoadError::OutOfRangeIndex {
            group: group.name.clone(),
            face: face_no + 1,
            sequence,
            index,
            len: self.store.attribute_len(sequence),
        };

        let position = lookup(self.store.vertices(), corner.vertex_index)
            .ok_or_else(|| out_of_range(AttributeKind::Position, corner.vertex_index))?
            .to_array();
        let uv = match corner.texture_index {
            Some(index) => lookup(self.store.texture_coordinates(), index)
                .ok_or_else(|| out_of_range(AttributeKind::TextureCoordinate, index))?
                .to_array(),
            None => [0.0; 2],
        };
        let normal = match corner.normal_index {
            Some(index) => lookup(self.store.normals(), index)
                .ok_or_else(|| out_of_range(AttributeKind::Normal, index))?
                .to_array(),
            None => [0.0; 3],
        };

        let index = u32::try_from(self.vertices.len()).map_err(|_| LoadError::TooManyVertices)?;
        self.vertices.push(MeshVertex::new(position, normal, uv));
        self.unique.insert(corner, index);
        Ok(index)
    }
}

/// 1-based lookup; anything outside `1..=len` is `None`.
fn lookup<T: Copy>(items: &[T], index: i64) -> Option<T> {
    let index = usize::try_from(index).ok()?.checked_sub(1)?;
    items.get(index).copied()
}
