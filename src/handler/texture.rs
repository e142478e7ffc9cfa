//! Texture fetching and decoding.

use std::sync::Arc;

use async_trait::async_trait;
use image::io::Reader as ImageReader;
use image::ImageFormat;

use super::{ByteFetcher, ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind};

/// Pixel layout of a decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    Rgb8,
}

/// A decoded texture ready for upload.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: TextureFormat,
}

/// Decode PNG or JPEG bytes to tightly packed RGBA8.
///
/// Shared by the texture, image, cubemap and analysis-map handlers.
pub(crate) fn decode_rgba(data: &[u8]) -> Result<(u32, u32, Vec<u8>), FetchError> {
    let format = image::guess_format(data).map_err(|e| FetchError::Decode(e.to_string()))?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png => {}
        _ => {
            return Err(FetchError::UnsupportedFormat(format!(
                "only JPEG and PNG are supported, got {:?}",
                format.extensions_str()
            )))
        }
    }

    let img = ImageReader::with_format(std::io::Cursor::new(data), format)
        .decode()
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok((width, height, rgba.into_raw()))
}

/// Decode bytes into a [`TextureAsset`].
pub fn decode_texture(data: &[u8]) -> Result<TextureAsset, FetchError> {
    let (width, height, data) = decode_rgba(data)?;
    Ok(TextureAsset {
        width,
        height,
        data,
        format: TextureFormat::Rgba8,
    })
}

/// Handler for [`ResourceKind::Texture`] resources.
pub struct TextureHandler {
    fetcher: Arc<dyn ByteFetcher>,
}

impl TextureHandler {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ResourceHandler for TextureHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Texture
    }

    async fn fetch(&self, _name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Url(url) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };
        let bytes = self.fetcher.fetch(url).await?;
        Ok(ResourceValue::Texture(decode_texture(&bytes)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::handler::MockFetcher;

    /// A 1x1 white PNG, encoded in-memory.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));

        let mut data = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut data), ImageFormat::Png)
            .expect("failed to encode test image");
        data
    }

    #[test]
    fn decode_png() {
        let texture = decode_texture(&tiny_png()).unwrap();
        assert_eq!(texture.width, 1);
        assert_eq!(texture.height, 1);
        assert_eq!(texture.format, TextureFormat::Rgba8);
        assert_eq!(texture.data.len(), 4);
    }

    #[test]
    fn decode_rejects_garbage() {
        let result = decode_texture(&[0u8; 16]);
        assert!(result.is_err());
    }

    #[test]
    fn decode_rejects_unsupported_container() {
        // A valid GIF header should be refused by the format allow-list.
        let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
        let err = decode_texture(gif).unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedFormat(_)));
    }

    #[test]
    fn handler_fetches_and_decodes() {
        let fetcher = Arc::new(MockFetcher::new());
        fetcher.insert("hex.png", tiny_png());

        let handler = TextureHandler::new(fetcher);
        let value = futures::executor::block_on(
            handler.fetch("hex", &Locator::url("hex.png")),
        )
        .unwrap();

        assert!(value.as_texture().is_some());
    }

    #[test]
    fn handler_rejects_sound_locator() {
        let handler = TextureHandler::new(Arc::new(MockFetcher::new()));
        let locator = Locator::Sound(crate::manifest::SoundSpec::new("bg.ogg", true, false));
        let err = futures::executor::block_on(handler.fetch("bg", &locator)).unwrap_err();
        assert!(matches!(err, FetchError::LocatorMismatch { .. }));
    }
}
