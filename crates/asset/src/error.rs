//! Error types shared by the loaders and the mesh assembler.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Attribute sequence a face vertex can index into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    TextureCoordinate,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TextureCoordinate => "texture coordinate",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Failure local to a single directive. The line loop wraps it into
/// [`LoadError::Parse`] together with the file, line number and raw text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed numeric token '{0}'")]
    MalformedNumericToken(String),

    #[error("malformed index token '{0}'")]
    MalformedIndexToken(String),

    #[error("'{keyword}' expects {expected} values, found {found}")]
    TokenCount {
        keyword: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("face has {0} vertices, at least 3 are required")]
    DegenerateFace(usize),

    #[error("'{0}' requires an argument")]
    MissingArgument(&'static str),

    /// Internal carrier for a failed nested material library. The line loop
    /// unwraps it back into the library's own [`LoadError`], so callers never
    /// receive this variant.
    #[doc(hidden)]
    #[error(transparent)]
    Library(Box<LoadError>),
}

/// Fatal load failure. No partial mesh is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line_no}: {source} (line: '{line}')", .path.display())]
    Parse {
        path: PathBuf,
        line_no: usize,
        line: String,
        #[source]
        source: ParseError,
    },

    #[error(
        "face {face} of group '{group}' references {sequence} index {index}, valid range is 1..={len}"
    )]
    OutOfRangeIndex {
        group: String,
        face: usize,
        sequence: AttributeKind,
        index: i64,
        len: usize,
    },

    #[error("unsupported model format '{0}'")]
    UnsupportedFormat(String),

    #[error("mesh has more unique vertices than a u32 index buffer can address")]
    TooManyVertices,
}

impl LoadError {
    /// Map an `io::Error` from opening or reading `path`, keeping `NotFound` distinct.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::FileNotFound(path)
        } else {
            LoadError::Io { path, source }
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
