//! Analysis maps: image-derived grids queried for collision and
//! elevation, never rendered.

use std::sync::Arc;

use async_trait::async_trait;

use super::texture::decode_rgba;
use super::{ByteFetcher, ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind};

/// A decoded RGBA pixel grid with point and bilinear sampling.
#[derive(Debug, Clone)]
pub struct AnalysisMap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AnalysisMap {
    /// Build from a tightly packed RGBA8 buffer.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode PNG/JPEG bytes into a map.
    pub fn decode(data: &[u8]) -> Result<Self, FetchError> {
        let (width, height, pixels) = decode_rgba(data)?;
        Self::from_rgba(width, height, pixels)
            .ok_or_else(|| FetchError::Decode("analysis map size mismatch".into()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA pixel at (x, y), or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = &self.pixels[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Bilinearly interpolated RGBA at fractional coordinates, clamped to
    /// the map edges. Used for smooth elevation queries.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Option<[f32; 4]> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let x = x.clamp(0.0, (self.width - 1) as f32);
        let y = y.clamp(0.0, (self.height - 1) as f32);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = self.pixel(x0, y0)?;
        let p10 = self.pixel(x1, y0)?;
        let p01 = self.pixel(x0, y1)?;
        let p11 = self.pixel(x1, y1)?;

        let mut out = [0.0f32; 4];
        for channel in 0..4 {
            let top = p00[channel] as f32 * (1.0 - fx) + p10[channel] as f32 * fx;
            let bottom = p01[channel] as f32 * (1.0 - fx) + p11[channel] as f32 * fx;
            out[channel] = top * (1.0 - fy) + bottom * fy;
        }
        Some(out)
    }
}

/// Handler for [`ResourceKind::AnalysisMap`] resources.
pub struct AnalysisMapHandler {
    fetcher: Arc<dyn ByteFetcher>,
}

impl AnalysisMapHandler {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ResourceHandler for AnalysisMapHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::AnalysisMap
    }

    async fn fetch(&self, _name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Url(url) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };
        let bytes = self.fetcher.fetch(url).await?;
        Ok(ResourceValue::AnalysisMap(AnalysisMap::decode(&bytes)?))
    }
}
