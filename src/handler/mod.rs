//! Per-kind resource handlers behind one polymorphic fetch contract.
//!
//! Each [`ResourceKind`] maps to exactly one [`ResourceHandler`] in a
//! [`HandlerTable`]. A handler turns a locator into a decoded
//! [`ResourceValue`]; the loader never branches on kind itself, so adding
//! a kind means one new handler plus one table entry.

pub mod analysis;
pub mod cubemap;
pub mod fetch;
pub mod geometry;
pub mod image;
pub mod sound;
pub mod texture;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind};

pub use analysis::AnalysisMap;
pub use cubemap::CubemapAsset;
pub use fetch::{ByteFetcher, MockFetcher};
pub use geometry::GeometryAsset;
pub use self::image::ImageAsset;
pub use sound::{AudioCall, AudioService, MockAudio, SoundHandle};
pub use texture::{TextureAsset, TextureFormat};

#[cfg(feature = "runtime-tokio")]
pub use fetch::FsFetcher;

/// A decoded, in-memory resource of any kind.
pub enum ResourceValue {
    Texture(TextureAsset),
    Cubemap(CubemapAsset),
    Geometry(GeometryAsset),
    AnalysisMap(AnalysisMap),
    Image(ImageAsset),
    Sound(SoundHandle),
}

impl ResourceValue {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceValue::Texture(_) => ResourceKind::Texture,
            ResourceValue::Cubemap(_) => ResourceKind::Cubemap,
            ResourceValue::Geometry(_) => ResourceKind::Geometry,
            ResourceValue::AnalysisMap(_) => ResourceKind::AnalysisMap,
            ResourceValue::Image(_) => ResourceKind::Image,
            ResourceValue::Sound(_) => ResourceKind::Sound,
        }
    }

    pub fn as_texture(&self) -> Option<&TextureAsset> {
        match self {
            ResourceValue::Texture(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_cubemap(&self) -> Option<&CubemapAsset> {
        match self {
            ResourceValue::Cubemap(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&GeometryAsset> {
        match self {
            ResourceValue::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_analysis_map(&self) -> Option<&AnalysisMap> {
        match self {
            ResourceValue::AnalysisMap(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            ResourceValue::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_sound(&self) -> Option<&SoundHandle> {
        match self {
            ResourceValue::Sound(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Debug for ResourceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceValue::{}", self.kind())
    }
}

/// Fetch-and-decode contract implemented once per resource kind.
///
/// Uses async-trait for dyn compatibility.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// The kind this handler serves.
    fn kind(&self) -> ResourceKind;

    /// Fetch and decode one resource.
    async fn fetch(&self, name: &str, locator: &Locator) -> Result<ResourceValue, FetchError>;
}

/// Handler registry: one entry per resource kind.
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<ResourceKind, Arc<dyn ResourceHandler>>,
}

impl HandlerTable {
    /// An empty table; register handlers one by one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full table: all six kinds wired to the given byte and audio
    /// services.
    pub fn standard(fetcher: Arc<dyn ByteFetcher>, audio: Arc<dyn AudioService>) -> Self {
        let mut table = Self::new();
        table.register(Arc::new(texture::TextureHandler::new(fetcher.clone())));
        table.register(Arc::new(cubemap::CubemapHandler::new(fetcher.clone())));
        table.register(Arc::new(geometry::GeometryHandler::new(fetcher.clone())));
        table.register(Arc::new(analysis::AnalysisMapHandler::new(fetcher.clone())));
        table.register(Arc::new(image::ImageHandler::new(fetcher)));
        table.register(Arc::new(sound::SoundHandler::new(audio)));
        table
    }

    /// Register a handler under its own kind, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn ResourceHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: ResourceKind) -> Option<Arc<dyn ResourceHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_all_kinds() {
        let table = HandlerTable::standard(Arc::new(MockFetcher::new()), Arc::new(MockAudio::new()));
        for kind in ResourceKind::ALL {
            assert!(table.contains(kind), "missing handler for {kind}");
        }
    }

    #[test]
    fn register_replaces_by_kind() {
        let fetcher: Arc<dyn ByteFetcher> = Arc::new(MockFetcher::new());
        let mut table = HandlerTable::new();
        table.register(Arc::new(texture::TextureHandler::new(fetcher.clone())));
        table.register(Arc::new(texture::TextureHandler::new(fetcher)));

        assert!(table.contains(ResourceKind::Texture));
        assert!(!table.contains(ResourceKind::Sound));
    }
}
