//! Plain image fetching (HUD overlays and the like).

use std::sync::Arc;

use async_trait::async_trait;

use super::texture::decode_rgba;
use super::{ByteFetcher, ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind};

/// A decoded RGBA image.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Handler for [`ResourceKind::Image`] resources.
pub struct ImageHandler {
    fetcher: Arc<dyn ByteFetcher>,
}

impl ImageHandler {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ResourceHandler for ImageHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Image
    }

    async fn fetch(&self, _name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Url(url) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };
        let bytes = self.fetcher.fetch(url).await?;
        let (width, height, data) = decode_rgba(&bytes)?;
        Ok(ResourceValue::Image(ImageAsset {
            width,
            height,
            data,
        }))
    }
}
