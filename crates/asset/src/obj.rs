//! OBJ model loading: drives the keyword parsers over a model file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{
    assemble::MeshAssembler,
    error::{LoadError, LoadResult},
    mesh::Mesh,
    parser::{
        FaceParser, GroupParser, KeywordParser, MaterialLibraryParser, NormalParser, ParserSet,
        TextureParser, UseMaterialParser, VertexParser, dispatch_lines,
    },
    store::DataStore,
};

/// Load an OBJ file and assemble it, following `mtllib` references.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> LoadResult<Mesh> {
    let mut store = DataStore::new();
    ObjLoader::new(path.as_ref(), &mut store)
        .with_default_parsers()
        .load()?;
    MeshAssembler::new(&store).assemble()
}

/// Convenience helper to parse an OBJ string literal. Material libraries
/// resolve against the working directory.
pub fn load_obj_from_str(contents: &str) -> LoadResult<Mesh> {
    let mut store = DataStore::new();
    ObjLoader::new("<memory>", &mut store)
        .with_default_parsers()
        .load_reader(io::Cursor::new(contents))?;
    MeshAssembler::new(&store).assemble()
}

/// Directory `path` lives in; empty for bare file names.
pub(crate) fn base_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Line-by-line reader for one model file. Parsers are registered up front;
/// [`load`](Self::load) fills the store and leaves assembly to the caller.
pub struct ObjLoader<'a> {
    path: PathBuf,
    store: &'a mut DataStore,
    parsers: ParserSet,
    unrecognized: Vec<String>,
}

impl<'a> ObjLoader<'a> {
    pub fn new(path: impl Into<PathBuf>, store: &'a mut DataStore) -> Self {
        Self {
            path: path.into(),
            store,
            parsers: Vec::new(),
            unrecognized: Vec::new(),
        }
    }

    /// Append a parser. Earlier registrations win when keywords overlap.
    pub fn register(&mut self, parser: impl KeywordParser + 'static) -> &mut Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Geometry, grouping and `usemtl`; `mtllib` lines stay unrecognized.
    pub fn register_geometry_parsers(&mut self) -> &mut Self {
        self.register(VertexParser)
            .register(NormalParser)
            .register(TextureParser)
            .register(FaceParser)
            .register(GroupParser)
            .register(UseMaterialParser)
    }

    /// Full parser set, including `mtllib` relative to the model's directory.
    pub fn register_default_parsers(&mut self) -> &mut Self {
        let base = base_dir(&self.path);
        self.register_geometry_parsers()
            .register(MaterialLibraryParser::new(base))
    }

    pub fn with_default_parsers(mut self) -> Self {
        self.register_default_parsers();
        self
    }

    /// Open the model file and parse every line into the store.
    pub fn load(&mut self) -> LoadResult<()> {
        let file = File::open(&self.path).map_err(|err| LoadError::from_io(&self.path, err))?;
        self.load_reader(BufReader::new(file))
    }

    /// Parse model text from any reader. The loader's path is still used for
    /// diagnostics and for resolving `mtllib`.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> LoadResult<()> {
        let skipped = dispatch_lines(reader, &self.path, &self.parsers, self.store)?;
        self.unrecognized.extend(skipped);

        log::info!(
            "Parsed {}: {} positions, {} normals, {} uvs, {} groups",
            self.path.display(),
            self.store.vertices().len(),
            self.store.normals().len(),
            self.store.texture_coordinates().len(),
            self.store.groups().len()
        );
        Ok(())
    }

    /// Lines whose keyword no registered parser accepted.
    pub fn unrecognized_lines(&self) -> &[String] {
        &self.unrecognized
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::{error::ParseError, store::DEFAULT_GROUP_NAME};

    #[test]
    fn textured_triangle_keeps_attributes() {
        let src = "
            vt 0.5 1.0
            vn 0 1 0
            v -1 0 -1
            v 1 0 -1
            v 0 0 1
            f 3/1/1 2/1/1 1/1/1
        ";
        let mesh = load_obj_from_str(src).expect("textured triangle");
        assert_eq!(mesh.groups[0].indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 1.0]);
        assert!(
            mesh.vertices
                .iter()
                .all(|v| v.uv == [0.5, 1.0] && v.normal == [0.0, 1.0, 0.0])
        );
    }

    #[test]
    fn byte_order_mark_keeps_first_vertex() {
        let mesh = load_obj_from_str("\u{feff}v 9 9 9\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n")
            .expect("bom-prefixed model");
        let positions: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions, vec![[9.0, 9.0, 9.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
    }

    #[test]
    fn faces_without_group_land_in_default() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].name, DEFAULT_GROUP_NAME);
        assert_eq!(mesh.groups[0].triangle_count(), 2);
    }

    #[test]
    fn loader_keeps_unrecognized_lines() {
        let mut store = DataStore::new();
        let mut loader = ObjLoader::new("scene.obj", &mut store);
        loader.register_geometry_parsers();
        loader
            .load_reader(io::Cursor::new("o thing\nv 0 0 0\ns 1\nmtllib scene.mtl\n"))
            .expect("parse");

        assert_eq!(
            loader.unrecognized_lines(),
            &["o thing".to_string(), "s 1".to_string(), "mtllib scene.mtl".to_string()]
        );
    }

    #[test]
    fn missing_model_is_file_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nope.obj");
        let err = load_obj_from_path(&path).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(p) if p == path));
    }

    #[test]
    fn materials_resolve_relative_to_model() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir(dir.path().join("models")).expect("models dir");
        fs::write(
            dir.path().join("models/crate.mtl"),
            "newmtl wood\nKd 0.5 0.3 0.1\nmap_Kd wood.png\n",
        )
        .expect("write mtl");
        fs::write(
            dir.path().join("models/crate.obj"),
            "mtllib crate.mtl\n\
             v 0 0 0\nv 1 0 0\nv 1 1 0\n\
             g lid\nusemtl wood\nf 1 2 3\n\
             g base\nusemtl metal\nf 3 2 1\n",
        )
        .expect("write obj");

        let mesh = load_obj_from_path(dir.path().join("models/crate.obj")).expect("load");
        assert_eq!(mesh.groups.len(), 2);

        let wood = mesh.groups[0].material.as_ref().expect("lid has wood");
        assert_eq!(wood.name, "wood");
        assert_eq!(wood.diffuse_map, Some(dir.path().join("models/wood.png")));
        assert!(mesh.groups[1].material.is_none());
    }

    #[test]
    fn missing_material_library_keeps_geometry() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("lonely.obj");
        fs::write(
            &path,
            "mtllib gone.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\ng a\nusemtl paint\nf 1 2 3\ng b\nf 1 3 2\n",
        )
        .expect("write obj");

        let mesh = load_obj_from_path(&path).expect("missing mtllib is not fatal");
        assert_eq!(mesh.groups.len(), 2);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.groups.iter().all(|group| group.material.is_none()));
    }

    #[test]
    fn malformed_material_library_fails_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("bad.mtl"), "newmtl x\nKd red\n").expect("write mtl");
        let path = dir.path().join("model.obj");
        fs::write(&path, "mtllib bad.mtl\nv 0 0 0\n").expect("write obj");

        let err = load_obj_from_path(&path).unwrap_err();
        match err {
            LoadError::Parse {
                path: failed,
                line_no,
                source,
                ..
            } => {
                assert_eq!(failed, dir.path().join("bad.mtl"));
                assert_eq!(line_no, 2);
                assert!(matches!(source, ParseError::TokenCount { found: 1, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_index_aborts_without_mesh() {
        let err = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 three\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                line_no: 4,
                source: ParseError::MalformedIndexToken(_),
                ..
            }
        ));
    }
}
