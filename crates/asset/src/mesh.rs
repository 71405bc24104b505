//! CPU-side mesh produced by the loaders, ready for GPU upload.

use crate::records::Material;

/// One entry of the GPU vertex buffer: a unique position/normal/uv
/// combination taken from the source corners. Absent attributes are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// One draw unit: triangles of a single source group, three indices per
/// triangle into [`Mesh::vertices`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGroup {
    pub name: String,
    pub material: Option<Material>,
    pub indices: Vec<u32>,
}

impl MeshGroup {
    pub fn new(name: impl Into<String>, material: Option<Material>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            material,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

/// Deduplicated vertex buffer shared by every group's index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub groups: Vec<MeshGroup>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, groups: Vec<MeshGroup>) -> Self {
        Self { vertices, groups }
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(MeshGroup::triangle_count).sum()
    }

    /// Returns `true` if there are vertices and at least one triangle.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && self.triangle_count() > 0
    }
}
