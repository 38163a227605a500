//! Category of a pack entry, derived from its top-level category directory.

use std::{fmt, str::FromStr};

/// Semantic bucket of an entry, used to select processors.
///
/// Categories carry no ordering, only identity. [Category::All] is a
/// pseudo-category matching every non-directory entry, [Category::Custom] is
/// the fallback for unrecognized (or missing) category directories.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// Wildcard, processors registered here run for every file.
    All,
    /// Texture atlases, `atlases` directory.
    Atlases,
    /// Block states, `blockstates` directory.
    Blockstates,
    /// Equipment, `equipment` directory.
    Equipment,
    /// Fonts, `font` directory.
    Font,
    /// Item definitions, `items` directory.
    Items,
    /// Languages, `lang` directory.
    Languages,
    /// Item and block models, `models` directory.
    Models,
    /// Particle definitions, `particles` directory.
    Particles,
    /// Post processing effects, `post_effects` directory.
    PostEffect,
    /// Shaders, `shaders` directory.
    Shaders,
    /// Sounds, `sounds` directory.
    Sounds,
    /// Texts, `texts` directory.
    Texts,
    /// Textures, `textures` directory.
    Textures,
    /// Waypoint styles, `waypoint_style` directory.
    WaypointStyle,
    /// Anything not mapped to another category, including namespace root
    /// files.
    Custom,
}
impl Category {
    /// Every category, wildcard and fallback included.
    pub const VALUES: [Category; 16] = [
        Category::All,
        Category::Atlases,
        Category::Blockstates,
        Category::Equipment,
        Category::Font,
        Category::Items,
        Category::Languages,
        Category::Models,
        Category::Particles,
        Category::PostEffect,
        Category::Shaders,
        Category::Sounds,
        Category::Texts,
        Category::Textures,
        Category::WaypointStyle,
        Category::Custom,
    ];

    /// Stable snake_case identifier, used in configuration and logs.
    ///
    /// This is the category name, not its directory name (ex.
    /// [Category::Languages] is `languages`, while its directory is `lang`).
    pub fn identifier(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Atlases => "atlases",
            Category::Blockstates => "blockstates",
            Category::Equipment => "equipment",
            Category::Font => "font",
            Category::Items => "items",
            Category::Languages => "languages",
            Category::Models => "models",
            Category::Particles => "particles",
            Category::PostEffect => "post_effect",
            Category::Shaders => "shaders",
            Category::Sounds => "sounds",
            Category::Texts => "texts",
            Category::Textures => "textures",
            Category::WaypointStyle => "waypoint_style",
            Category::Custom => "custom",
        }
    }

    /// Directory name used by the standard (vanilla) layout. [None] for the
    /// wildcard and fallback categories.
    pub fn standard_directory(self) -> Option<&'static str> {
        let directory = match self {
            Category::All | Category::Custom => return None,
            Category::Atlases => "atlases",
            Category::Blockstates => "blockstates",
            Category::Equipment => "equipment",
            Category::Font => "font",
            Category::Items => "items",
            Category::Languages => "lang",
            Category::Models => "models",
            Category::Particles => "particles",
            Category::PostEffect => "post_effects",
            Category::Shaders => "shaders",
            Category::Sounds => "sounds",
            Category::Texts => "texts",
            Category::Textures => "textures",
            Category::WaypointStyle => "waypoint_style",
        };
        Some(directory)
    }

    /// Whether this is the wildcard category.
    pub fn is_wildcard(self) -> bool {
        self == Category::All
    }
}
impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Error returned when parsing unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);
impl fmt::Display for UnknownCategory {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}
impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::VALUES
            .into_iter()
            .find(|category| category.identifier() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
