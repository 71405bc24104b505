//! Material library (`.mtl`) loading.
//!
//! Libraries are read through the same line dispatch as models, with a
//! material-specific parser set. Every directive after `newmtl` fills the
//! material it opened until the next `newmtl` or the end of the file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::{
    error::{LoadError, LoadResult, ParseError},
    obj::base_dir,
    parser::{KeywordParser, ParserSet, dispatch_lines, parse_floats},
    records::Material,
    store::DataStore,
};

/// Reads one material library into a shared [`DataStore`].
pub struct MaterialLibraryLoader<'a> {
    path: PathBuf,
    store: &'a mut DataStore,
    parsers: ParserSet,
    unrecognized: Vec<String>,
}

impl<'a> MaterialLibraryLoader<'a> {
    pub fn new(path: impl Into<PathBuf>, store: &'a mut DataStore) -> Self {
        let path = path.into();
        let parsers = material_parsers(&base_dir(&path));
        Self {
            path,
            store,
            parsers,
            unrecognized: Vec::new(),
        }
    }

    /// Load the library. A missing file is logged and skipped.
    pub fn load(&mut self) -> LoadResult<()> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "Material library {} not found; continuing without its materials",
                    self.path.display()
                );
                return Ok(());
            }
            Err(err) => return Err(LoadError::from_io(&self.path, err)),
        };
        self.load_reader(BufReader::new(file))
    }

    /// Load library contents from any reader. The loader's path is still
    /// used for diagnostics and for resolving texture maps.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> LoadResult<()> {
        let before = self.store.materials().len();
        let result = dispatch_lines(reader, &self.path, &self.parsers, self.store);
        self.store.end_material_library();
        self.unrecognized = result?;

        log::info!(
            "Loaded {} materials from {}",
            self.store.materials().len() - before,
            self.path.display()
        );
        Ok(())
    }

    pub fn unrecognized_lines(&self) -> &[String] {
        &self.unrecognized
    }
}

/// Parser set for material libraries; texture maps resolve against `base_dir`.
pub fn material_parsers(base_dir: &Path) -> ParserSet {
    vec![
        Box::new(NewMaterialParser),
        Box::new(TextureMapParser::new("map_Kd", MapSlot::Diffuse, base_dir)),
        Box::new(TextureMapParser::new("map_Ks", MapSlot::Specular, base_dir)),
        Box::new(TextureMapParser::new("map_Bump", MapSlot::Normal, base_dir)),
        Box::new(TextureMapParser::new("bump", MapSlot::Normal, base_dir)),
        Box::new(ColorParser::new("Ka", ColorSlot::Ambient)),
        Box::new(ColorParser::new("Kd", ColorSlot::Diffuse)),
        Box::new(ColorParser::new("Ks", ColorSlot::Specular)),
        Box::new(ColorParser::new("Ke", ColorSlot::Emissive)),
        Box::new(ScalarParser::new("Ns", ScalarSlot::Shininess)),
        Box::new(ScalarParser::new("d", ScalarSlot::Dissolve)),
        Box::new(ScalarParser::new("Tr", ScalarSlot::Transparency)),
        Box::new(ScalarParser::new("Ni", ScalarSlot::OpticalDensity)),
        Box::new(IllumParser),
    ]
}

/// Apply `update` to the open material, or warn when no `newmtl` came first.
fn with_current(store: &mut DataStore, keyword: &str, update: impl FnOnce(&mut Material)) {
    match store.current_material_mut() {
        Some(material) => update(material),
        None => log::warn!("'{}' appears before any newmtl; ignored", keyword),
    }
}

/// `newmtl name`
pub struct NewMaterialParser;

impl KeywordParser for NewMaterialParser {
    fn keyword(&self) -> &'static str {
        "newmtl"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        if data.is_empty() {
            return Err(ParseError::MissingArgument("newmtl"));
        }
        store.begin_material(data);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MapSlot {
    Diffuse,
    Specular,
    Normal,
}

/// `map_* [options] file`. Options are skipped; the last token is the path.
pub struct TextureMapParser {
    keyword: &'static str,
    slot: MapSlot,
    base_dir: PathBuf,
}

impl TextureMapParser {
    pub fn new(keyword: &'static str, slot: MapSlot, base_dir: &Path) -> Self {
        Self {
            keyword,
            slot,
            base_dir: base_dir.to_path_buf(),
        }
    }
}

impl KeywordParser for TextureMapParser {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let file = data
            .split_whitespace()
            .last()
            .ok_or(ParseError::MissingArgument(self.keyword))?;
        let path = self.base_dir.join(file);

        with_current(store, self.keyword, |material| {
            let target = match self.slot {
                MapSlot::Diffuse => &mut material.diffuse_map,
                MapSlot::Specular => &mut material.specular_map,
                MapSlot::Normal => &mut material.normal_map,
            };
            *target = Some(path);
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ColorSlot {
    Ambient,
    Diffuse,
    Specular,
    Emissive,
}

/// `Ka`/`Kd`/`Ks`/`Ke r g b`
pub struct ColorParser {
    keyword: &'static str,
    slot: ColorSlot,
}

impl ColorParser {
    pub fn new(keyword: &'static str, slot: ColorSlot) -> Self {
        Self { keyword, slot }
    }
}

impl KeywordParser for ColorParser {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let rgb = parse_floats::<3>(self.keyword, data)?;
        with_current(store, self.keyword, |material| {
            let target = match self.slot {
                ColorSlot::Ambient => &mut material.ambient,
                ColorSlot::Diffuse => &mut material.diffuse,
                ColorSlot::Specular => &mut material.specular,
                ColorSlot::Emissive => &mut material.emissive,
            };
            *target = Some(rgb);
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ScalarSlot {
    Shininess,
    Dissolve,
    Transparency,
    OpticalDensity,
}

/// Single-float directives (`Ns`, `d`, `Tr`, `Ni`).
pub struct ScalarParser {
    keyword: &'static str,
    slot: ScalarSlot,
}

impl ScalarParser {
    pub fn new(keyword: &'static str, slot: ScalarSlot) -> Self {
        Self { keyword, slot }
    }
}

impl KeywordParser for ScalarParser {
    fn keyword(&self) -> &'static str {
        self.keyword
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let [value] = parse_floats::<1>(self.keyword, data)?;
        with_current(store, self.keyword, |material| {
            let target = match self.slot {
                ScalarSlot::Shininess => &mut material.shininess,
                ScalarSlot::Dissolve => &mut material.dissolve,
                ScalarSlot::Transparency => &mut material.transparency,
                ScalarSlot::OpticalDensity => &mut material.optical_density,
            };
            *target = Some(value);
        });
        Ok(())
    }
}

/// `illum n`
pub struct IllumParser;

impl KeywordParser for IllumParser {
    fn keyword(&self) -> &'static str {
        "illum"
    }

    fn parse(&self, data: &str, store: &mut DataStore) -> Result<(), ParseError> {
        let tokens: Vec<&str> = data.split_whitespace().collect();
        let [token] = tokens.as_slice() else {
            return Err(ParseError::TokenCount {
                keyword: "illum",
                expected: 1,
                found: tokens.len(),
            });
        };
        let model = token
            .parse::<u32>()
            .map_err(|_| ParseError::MalformedNumericToken((*token).to_string()))?;
        with_current(store, "illum", |material| material.illumination_model = Some(model));
        Ok(())
    }
}
