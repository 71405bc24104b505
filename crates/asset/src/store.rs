//! Per-load accumulator filled by the keyword parsers.

use crate::{
    error::AttributeKind,
    records::{Face, Group, Material, Normal, TextureCoordinate, Vertex},
};

/// Name of the group created when a face or `usemtl` arrives before any `g`.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// Cursors the parsers move while walking a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserState {
    pub current_group: Option<usize>,
    /// Material receiving directives inside the library being read.
    pub current_material: Option<usize>,
}

/// Everything read from one model file and its material libraries.
/// Created per load and dropped once the mesh is assembled.
#[derive(Debug, Default)]
pub struct DataStore {
    vertices: Vec<Vertex>,
    normals: Vec<Normal>,
    texture_coordinates: Vec<TextureCoordinate>,
    groups: Vec<Group>,
    materials: Vec<Material>,
    state: ParserState,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub fn texture_coordinates(&self) -> &[TextureCoordinate] {
        &self.texture_coordinates
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Current length of an attribute sequence.
    pub fn attribute_len(&self, kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Position => self.vertices.len(),
            AttributeKind::TextureCoordinate => self.texture_coordinates.len(),
            AttributeKind::Normal => self.normals.len(),
        }
    }

    pub fn push_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn push_normal(&mut self, normal: Normal) {
        self.normals.push(normal);
    }

    pub fn push_texture_coordinate(&mut self, uv: TextureCoordinate) {
        self.texture_coordinates.push(uv);
    }

    /// Start a new group and make it current. Returns its position.
    pub fn begin_group(&mut self, name: &str) -> usize {
        log::debug!("Starting group '{}' (#{})", name, self.groups.len());
        self.groups.push(Group::new(name));
        let index = self.groups.len() - 1;
        self.state.current_group = Some(index);
        index
    }

    /// Current group, creating the default one on first use.
    pub fn current_group_mut(&mut self) -> &mut Group {
        let current = self.state.current_group;
        let index = match current {
            Some(index) => index,
            None => self.begin_group(DEFAULT_GROUP_NAME),
        };
        &mut self.groups[index]
    }

    pub fn push_face(&mut self, face: Face) {
        self.current_group_mut().faces.push(face);
    }

    /// Append a material and direct following material directives to it.
    pub fn begin_material(&mut self, name: &str) -> &mut Material {
        if self.find_material(name).is_some() {
            log::warn!("Material '{}' is defined more than once; the last definition wins", name);
        }
        self.materials.push(Material::named(name));
        let index = self.materials.len() - 1;
        self.state.current_material = Some(index);
        &mut self.materials[index]
    }

    pub fn current_material_mut(&mut self) -> Option<&mut Material> {
        let index = self.state.current_material?;
        self.materials.get_mut(index)
    }

    /// Close the library being read so its last material stops receiving directives.
    pub fn end_material_library(&mut self) {
        self.state.current_material = None;
    }

    /// Latest material with exactly this name.
    pub fn find_material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().rev().find(|material| material.name == name)
    }
}
