//! Line dispatch and the OBJ keyword parsers.
//!
//! A line is split into a keyword and the remaining data. The first registered
//! [`KeywordParser`] accepting the keyword handles it; registration order is
//! the tie-break. Lines nobody accepts are collected, not rejected.

use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

use crate::{
    error::{AttributeKind, LoadError, LoadResult, ParseError},
    mtl::MaterialLibraryLoader,
    records::{Face, FaceVertex, Normal, TextureCoordinate, Vertex},
    store::{DEFAULT_GROUP_NAME, DataStore},
};

/// Handler for one directive keyword. Implementations keep no per-file
/// state; everything they produce goes into the [`DataStore`].
pub trait KeywordParser {
    /// Keyword this parser handles, e.g. `"vn"`.
    fn keyword(&self) -> &'static str;

    /// Case-insensitive exact match against [`keyword`](Self::keyword).
    fn can_parse(&self, keyword: &str) -> bool {
        keyword.eq_ignore_ascii_case(self.keyword())
    }

    /// Consume the data following the keyword.
    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError>;
}

/// Parsers in priority order.
pub type ParserSet = Vec<Box<dyn KeywordParser>>;

/// Run every line of `reader` through `parsers`. Returns the lines no parser
/// accepted. `path` is only used for diagnostics.
pub(crate) fn dispatch_lines<R: BufRead>(
    reader: R,
    path: &Path,
    parsers: &[Box<dyn KeywordParser>],
    store: &mut DataStore,
) -> LoadResult<Vec<String>> {
    let mut unrecognized = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let mut line = line.map_err(|source| LoadError::from_io(path, source))?;
        if line_no == 0 && line.starts_with('\u{feff}') {
            line.remove(0);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (keyword, data) = split_keyword(trimmed);
        let Some(parser) = parsers.iter().find(|parser| parser.can_parse(keyword)) else {
            log::debug!(
                "{}:{}: skipping unsupported directive '{}'",
                path.display(),
                line_no + 1,
                keyword
            );
            unrecognized.push(line);
            continue;
        };

        if let Err(err) = parser.parse(data, store) {
            return Err(match err {
                ParseError::Library(inner) => *inner,
                source => LoadError::Parse {
                    path: path.to_path_buf(),
                    line_no: line_no + 1,
                    line,
                    source,
                },
            });
        }
    }

    Ok(unrecognized)
}

/// Split a trimmed line into its keyword and trimmed remainder.
pub(crate) fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, data)) => (keyword, data.trim()),
        None => (line, ""),
    }
}

/// Parse exactly `N` whitespace-separated floats.
pub(crate) fn parse_floats<const N: usize>(
    keyword: &'static str,
    data: &str,
) -> Result<[f32; N], ParseError> {
    let tokens: Vec<&str> = data.split_whitespace().collect();
    if tokens.len() != N {
        return Err(ParseError::TokenCount {
            keyword,
            expected: N,
            found: tokens.len(),
        });
    }

    let mut values = [0.0_f32; N];
    for (value, token) in values.iter_mut().zip(&tokens) {
        *value = token
            .parse::<f32>()
            .map_err(|_| ParseError::MalformedNumericToken((*token).to_string()))?;
    }
    Ok(values)
}

/// `v x y z`
pub struct VertexParser;

impl KeywordParser for VertexParser {
    fn keyword(&self) -> &'static str {
        "v"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        store.push_vertex(Vertex::from(parse_floats::<3>("v", data)?));
        Ok(())
    }
}

/// `vn x y z`
pub struct NormalParser;

impl KeywordParser for NormalParser {
    fn keyword(&self) -> &'static str {
        "vn"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        store.push_normal(Normal::from(parse_floats::<3>("vn", data)?));
        Ok(())
    }
}

/// `vt u v`
pub struct TextureParser;

impl KeywordParser for TextureParser {
    fn keyword(&self) -> &'static str {
        "vt"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        store.push_texture_coordinate(TextureCoordinate::from(parse_floats::<2>("vt", data)?));
        Ok(())
    }
}

/// `f v1[/t1][/n1] v2... v3...`
pub struct FaceParser;

impl KeywordParser for FaceParser {
    fn keyword(&self) -> &'static str {
        "f"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let corners = data
            .split_whitespace()
            .map(|token| parse_face_vertex(token, store))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            return Err(ParseError::DegenerateFace(corners.len()));
        }
        store.push_face(Face::new(corners));
        Ok(())
    }
}

fn parse_face_vertex(token: &str, store: &DataStore) -> Result<FaceVertex, ParseError> {
    let malformed = || ParseError::MalformedIndexToken(token.to_string());

    let mut parts = token.split('/');
    let position = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let texture = parts.next().filter(|s| !s.is_empty());
    let normal = parts.next().filter(|s| !s.is_empty());
    if parts.next().is_some() {
        return Err(malformed());
    }

    let resolve = |sub: &str, kind: AttributeKind| {
        let raw = sub.parse::<i64>().map_err(|_| malformed())?;
        Ok::<_, ParseError>(resolve_relative(raw, store.attribute_len(kind)))
    };

    Ok(FaceVertex::new(
        resolve(position, AttributeKind::Position)?,
        texture
            .map(|sub| resolve(sub, AttributeKind::TextureCoordinate))
            .transpose()?,
        normal.map(|sub| resolve(sub, AttributeKind::Normal)).transpose()?,
    ))
}

/// Turn a negative index into its absolute form against the sequence as it
/// stands now: `-1` is the last element read so far.
fn resolve_relative(raw: i64, len: usize) -> i64 {
    if raw < 0 {
        i64::try_from(len)
            .unwrap_or(i64::MAX)
            .saturating_add(raw)
            .saturating_add(1)
    } else {
        raw
    }
}

/// `g name`
pub struct GroupParser;

impl KeywordParser for GroupParser {
    fn keyword(&self) -> &'static str {
        "g"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let name = if data.is_empty() { DEFAULT_GROUP_NAME } else { data };
        store.begin_group(name);
        Ok(())
    }
}

/// `usemtl name`. An unknown name leaves the group without a material.
pub struct UseMaterialParser;

impl KeywordParser for UseMaterialParser {
    fn keyword(&self) -> &'static str {
        "usemtl"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        if data.is_empty() {
            return Err(ParseError::MissingArgument("usemtl"));
        }

        let material = store.find_material(data).cloned();
        if material.is_none() {
            log::warn!("Material '{}' is not defined; group keeps no material", data);
        }
        store.current_group_mut().material = material;
        Ok(())
    }
}

/// `mtllib file [file...]`, resolved against the model's directory.
pub struct MaterialLibraryParser {
    base_dir: PathBuf,
}

impl MaterialLibraryParser {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl KeywordParser for MaterialLibraryParser {
    fn keyword(&self) -> &'static str {
        "mtllib"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        if data.is_empty() {
            return Err(ParseError::MissingArgument("mtllib"));
        }

        for name in data.split_whitespace() {
            MaterialLibraryLoader::new(self.base_dir.join(name), store)
                .load()
                .map_err(|err| ParseError::Library(Box::new(err)))?;
        }
        Ok(())
    }
}
