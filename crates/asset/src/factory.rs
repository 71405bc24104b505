//! Format selection by file extension.

use std::path::Path;

use crate::{
    assemble::MeshAssembler,
    error::{LoadError, LoadResult},
    mesh::Mesh,
    obj::ObjLoader,
    store::DataStore,
};

/// Model formats this crate can load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
}

impl ModelFormat {
    /// Case-insensitive match on the extension, without the dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        if extension.eq_ignore_ascii_case("obj") {
            Some(ModelFormat::Obj)
        } else {
            None
        }
    }
}

/// Entry point for loading a model file into a [`Mesh`].
#[derive(Clone, Debug)]
pub struct LoaderFactory {
    load_materials: bool,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self {
            load_materials: true,
        }
    }
}

impl LoaderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// When disabled, `mtllib` directives are skipped and every group is
    /// left without a material.
    pub fn with_materials(mut self, enabled: bool) -> Self {
        self.load_materials = enabled;
        self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<Mesh> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();

        match ModelFormat::from_extension(&extension) {
            Some(ModelFormat::Obj) => self.load_obj(path),
            None => Err(LoadError::UnsupportedFormat(extension)),
        }
    }

    fn load_obj(&self, path: &Path) -> LoadResult<Mesh> {
        let mut store = DataStore::new();
        let skipped = {
            let mut loader = ObjLoader::new(path, &mut store);
            if self.load_materials {
                loader.register_default_parsers();
            } else {
                loader.register_geometry_parsers();
            }
            loader.load()?;
            loader.unrecognized_lines().len()
        };
        if skipped > 0 {
            log::info!("Skipped {} unsupported lines in {}", skipped, path.display());
        }

        let mesh = MeshAssembler::new(&store).assemble()?;
        log::info!(
            "Loaded {}: {} vertices, {} triangles in {} groups",
            path.display(),
            mesh.vertices.len(),
            mesh.triangle_count(),
            mesh.groups.len()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CUBE_FACE: &str = "mtllib face.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nusemtl blue\nf 1 2 3 4\n";

    #[test]
    fn format_detection_ignores_case() {
        assert_eq!(ModelFormat::from_extension("obj"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_extension("OBJ"), Some(ModelFormat::Obj));
        assert_eq!(ModelFormat::from_extension("fbx"), None);
        assert_eq!(ModelFormat::from_extension(""), None);
    }

    #[test]
    fn unsupported_extension_names_it() {
        let err = LoaderFactory::new().load("scene.glb").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "glb"));

        let err = LoaderFactory::new().load("no_extension").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn loads_uppercase_obj_with_materials() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("face.mtl"), "newmtl blue\nKd 0 0 1\n").expect("write mtl");
        let path = dir.path().join("FACE.OBJ");
        fs::write(&path, CUBE_FACE).expect("write obj");

        let mesh = LoaderFactory::new().load(&path).expect("load");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].name, "default");
        assert_eq!(mesh.groups[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(
            mesh.groups[0].material.as_ref().and_then(|m| m.diffuse),
            Some([0.0, 0.0, 1.0])
        );
    }

    #[test]
    fn materials_can_be_disabled() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("face.mtl"), "newmtl blue\nKd 0 0 1\n").expect("write mtl");
        let path = dir.path().join("face.obj");
        fs::write(&path, CUBE_FACE).expect("write obj");

        let mesh = LoaderFactory::new()
            .with_materials(false)
            .load(&path)
            .expect("load");
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.groups[0].material.is_none());
    }

    #[test]
    fn missing_model_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = LoaderFactory::new()
            .load(dir.path().join("ghost.obj"))
            .unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }

    #[test]
    fn out_of_range_index_yields_no_mesh() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.obj");
        fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 3\n").expect("write obj");

        let err = LoaderFactory::new().load(&path).unwrap_err();
        assert!(matches!(err, LoadError::OutOfRangeIndex { index: 3, len: 2, .. }));
    }
}
