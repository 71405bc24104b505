//! Asset loading for OBJ models and their MTL material libraries.
//!
//! Pipeline: [`ObjLoader`] dispatches each line to a [`KeywordParser`], which
//! fills a [`DataStore`]; [`MeshAssembler`] lowers the store into a [`Mesh`]
//! with one deduplicated vertex buffer and an index buffer per group.
//! [`LoaderFactory`] wires the steps together by file extension.

pub mod assemble;
pub mod error;
pub mod factory;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod parser;
pub mod records;
pub mod store;

pub use assemble::MeshAssembler;
pub use error::{AttributeKind, LoadError, LoadResult, ParseError};
pub use factory::{LoaderFactory, ModelFormat};
pub use mesh::{Mesh, MeshGroup, MeshVertex};
pub use mtl::MaterialLibraryLoader;
pub use obj::{ObjLoader, load_obj_from_path, load_obj_from_str};
pub use parser::KeywordParser;
pub use records::{Face, FaceVertex, Group, Material, Normal, TextureCoordinate, Vertex};
pub use store::{DEFAULT_GROUP_NAME, DataStore, ParserState};
