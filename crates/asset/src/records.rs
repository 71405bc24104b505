//! Plain records accumulated while parsing a model file.

use std::path::PathBuf;

/// Position in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vertex {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Direction vector, not required to be unit length.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Normal {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Normal {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Normal {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextureCoordinate {
    pub u: f32,
    pub v: f32,
}

impl TextureCoordinate {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.u, self.v]
    }
}

impl From<[f32; 2]> for TextureCoordinate {
    fn from([u, v]: [f32; 2]) -> Self {
        Self::new(u, v)
    }
}

/// One polygon corner. Indices are 1-based; relative (negative) indices are
/// already resolved against the sequence length at the time the face was read,
/// so a value below 1 here is simply out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub vertex_index: i64,
    pub texture_index: Option<i64>,
    pub normal_index: Option<i64>,
}

impl FaceVertex {
    pub fn new(vertex_index: i64, texture_index: Option<i64>, normal_index: Option<i64>) -> Self {
        Self {
            vertex_index,
            texture_index,
            normal_index,
        }
    }
}

/// Polygon with corners in declared winding order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    vertices: Vec<FaceVertex>,
}

impl Face {
    pub fn new(vertices: Vec<FaceVertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[FaceVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Shading properties read from a material library. Values are stored as
/// written; nothing here interprets the illumination model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// `map_Kd`, resolved against the library's directory.
    pub diffuse_map: Option<PathBuf>,
    /// `map_Ks`
    pub specular_map: Option<PathBuf>,
    /// `map_Bump` / `bump`
    pub normal_map: Option<PathBuf>,
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub emissive: Option<[f32; 3]>,
    /// `Ns`
    pub shininess: Option<f32>,
    /// `d`
    pub dissolve: Option<f32>,
    /// `Tr`
    pub transparency: Option<f32>,
    /// `Ni`
    pub optical_density: Option<f32>,
    /// `illum`
    pub illumination_model: Option<u32>,
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Named run of faces sharing one material. Identity is positional: two
/// groups may carry the same name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub name: String,
    pub faces: Vec<Face>,
    pub material: Option<Material>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
            material: None,
        }
    }
}
