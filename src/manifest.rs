//! Resource manifests: what to load, keyed by kind and name.
//!
//! A manifest maps each resource kind to a set of named locators. It is a
//! plain description of work; the loader never mutates it.

use std::collections::HashMap;

/// The closed set of loadable resource kinds.
///
/// Each kind has exactly one handler and one decode step. Adding a kind
/// means adding a variant here and one entry to the handler table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Texture,
    Cubemap,
    Geometry,
    AnalysisMap,
    Image,
    Sound,
}

impl ResourceKind {
    /// All kinds, in manifest iteration order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Texture,
        ResourceKind::Cubemap,
        ResourceKind::Geometry,
        ResourceKind::AnalysisMap,
        ResourceKind::Image,
        ResourceKind::Sound,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Texture => "texture",
            ResourceKind::Cubemap => "cubemap",
            ResourceKind::Geometry => "geometry",
            ResourceKind::AnalysisMap => "analysis_map",
            ResourceKind::Image => "image",
            ResourceKind::Sound => "sound",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor for one sound resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSpec {
    pub src: String,
    pub looped: bool,
    pub use_panner: bool,
}

impl SoundSpec {
    pub fn new(src: impl Into<String>, looped: bool, use_panner: bool) -> Self {
        Self {
            src: src.into(),
            looped,
            use_panner,
        }
    }
}

/// Where to find one resource.
///
/// Every kind except sound is located by a single URL (cubemaps use a
/// face template, see [`expand_cube_faces`]). Sounds carry playback
/// options alongside the source URL.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    Url(String),
    Sound(SoundSpec),
}

impl Locator {
    pub fn url(url: impl Into<String>) -> Self {
        Locator::Url(url.into())
    }
}

/// Cube face identifiers, in the conventional +x -x +y -y +z -z order.
pub const CUBE_FACES: [&str; 6] = ["px", "nx", "py", "ny", "pz", "nz"];

/// Expand a cubemap URL template into its six face URLs.
///
/// The template's `%1` placeholder is substituted with each face id. A
/// template without the placeholder expands to the same URL six times.
pub fn expand_cube_faces(template: &str) -> [String; 6] {
    CUBE_FACES.map(|face| template.replace("%1", face))
}

/// A set of requested resources, keyed by kind then name.
///
/// Names are unique within a kind. Insertion order is not meaningful;
/// sibling resources may complete in any order.
#[derive(Debug, Clone, Default)]
pub struct ResourceManifest {
    entries: HashMap<ResourceKind, HashMap<String, Locator>>,
}

impl ResourceManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource of any kind.
    pub fn insert(&mut self, kind: ResourceKind, name: impl Into<String>, locator: Locator) {
        self.entries
            .entry(kind)
            .or_default()
            .insert(name.into(), locator);
    }

    /// Add a texture by URL.
    pub fn texture(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(ResourceKind::Texture, name, Locator::url(url));
        self
    }

    /// Add a cubemap by face-template URL (`%1` placeholder).
    pub fn cubemap(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(ResourceKind::Cubemap, name, Locator::url(template));
        self
    }

    /// Add a geometry by URL.
    pub fn geometry(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(ResourceKind::Geometry, name, Locator::url(url));
        self
    }

    /// Add an analysis map (collision/elevation image) by URL.
    pub fn analysis_map(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(ResourceKind::AnalysisMap, name, Locator::url(url));
        self
    }

    /// Add a plain image by URL.
    pub fn image(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.insert(ResourceKind::Image, name, Locator::url(url));
        self
    }

    /// Add a sound with its playback options.
    pub fn sound(mut self, name: impl Into<String>, spec: SoundSpec) -> Self {
        self.insert(ResourceKind::Sound, name, Locator::Sound(spec));
        self
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<&Locator> {
        self.entries.get(&kind)?.get(name)
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.get(kind, name).is_some()
    }

    /// Names requested for one kind.
    pub fn names(&self, kind: ResourceKind) -> impl Iterator<Item = &str> {
        self.entries
            .get(&kind)
            .into_iter()
            .flat_map(|m| m.keys().map(String::as_str))
    }

    /// Kinds that have at least one entry.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        ResourceKind::ALL
            .into_iter()
            .filter(|k| self.entries.get(k).is_some_and(|m| !m.is_empty()))
    }

    /// Iterate every (kind, name, locator) entry.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &str, &Locator)> {
        ResourceKind::ALL.into_iter().flat_map(move |kind| {
            self.entries
                .get(&kind)
                .into_iter()
                .flat_map(move |m| m.iter().map(move |(n, l)| (kind, n.as_str(), l)))
        })
    }

    /// Total number of resources across all kinds.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
