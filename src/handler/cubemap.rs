//! Cubemap fetching: six faces per locator template.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use super::texture::{decode_texture, TextureAsset};
use super::{ByteFetcher, ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{expand_cube_faces, Locator, ResourceKind};

/// Six decoded faces in px, nx, py, ny, pz, nz order.
#[derive(Debug, Clone)]
pub struct CubemapAsset {
    pub faces: [TextureAsset; 6],
}

impl CubemapAsset {
    pub fn face(&self, index: usize) -> Option<&TextureAsset> {
        self.faces.get(index)
    }
}

/// Handler for [`ResourceKind::Cubemap`] resources.
///
/// The six face fetches run concurrently; one failed face fails the
/// whole cubemap.
pub struct CubemapHandler {
    fetcher: Arc<dyn ByteFetcher>,
}

impl CubemapHandler {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ResourceHandler for CubemapHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Cubemap
    }

    async fn fetch(&self, _name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Url(template) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };

        let urls = expand_cube_faces(template);
        let face_bytes = try_join_all(urls.iter().map(|url| self.fetcher.fetch(url))).await?;

        let mut faces = Vec::with_capacity(6);
        for bytes in &face_bytes {
            faces.push(decode_texture(bytes)?);
        }
        let faces: [TextureAsset; 6] = faces
            .try_into()
            .map_err(|_| FetchError::Decode("expected six cube faces".into()))?;

        Ok(ResourceValue::Cubemap(CubemapAsset { faces }))
    }
}
