//! Geometry fetching and GLB parsing.

use std::sync::Arc;

use async_trait::async_trait;
use glam::Vec3;

use super::{ByteFetcher, ResourceHandler, ResourceValue};
use crate::error::FetchError;
use crate::manifest::{Locator, ResourceKind};

/// Parsed triangle geometry with an axis-aligned bounding box.
///
/// All primitives of the source file are merged into one vertex/index
/// stream; indices are rebased per primitive.
#[derive(Debug, Clone)]
pub struct GeometryAsset {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub min: Vec3,
    pub max: Vec3,
}

impl GeometryAsset {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Parse binary glTF bytes into a [`GeometryAsset`].
pub fn parse_glb(data: &[u8]) -> Result<GeometryAsset, FetchError> {
    let gltf = gltf::Gltf::from_slice(data)?;
    let blob = gltf
        .blob
        .as_deref()
        .ok_or_else(|| FetchError::Decode("GLB file is missing binary data".into()))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);

    for mesh in gltf.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => Some(blob),
                gltf::buffer::Source::Uri(_) => None,
            });

            let Some(positions) = reader.read_positions() else {
                log::warn!("primitive without positions in mesh {:?}", mesh.name());
                continue;
            };

            let base = vertices.len() as u32;
            for position in positions {
                let v = Vec3::from(position);
                min = min.min(v);
                max = max.max(v);
                vertices.push(position);
            }

            if let Some(read_indices) = reader.read_indices() {
                indices.extend(read_indices.into_u32().map(|i| i + base));
            }
        }
    }

    if vertices.is_empty() {
        return Err(FetchError::Decode("geometry contains no vertices".into()));
    }

    log::debug!(
        "parsed geometry: {} vertices, {} indices",
        vertices.len(),
        indices.len()
    );

    Ok(GeometryAsset {
        vertices,
        indices,
        min,
        max,
    })
}

/// Handler for [`ResourceKind::Geometry`] resources.
pub struct GeometryHandler {
    fetcher: Arc<dyn ByteFetcher>,
}

impl GeometryHandler {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ResourceHandler for GeometryHandler {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Geometry
    }

    async fn fetch(&self, _name: &str, locator: &Locator) -> Result<ResourceValue, FetchError> {
        let Locator::Url(url) = locator else {
            return Err(FetchError::LocatorMismatch { kind: self.kind() });
        };
        let bytes = self.fetcher.fetch(url).await?;
        Ok(ResourceValue::Geometry(parse_glb(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_glb(&[0u8; 32]).is_err());
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(parse_glb(&[]).is_err());
    }

    #[test]
    fn geometry_counts() {
        let asset = GeometryAsset {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
            min: Vec3::ZERO,
            max: Vec3::new(1.0, 1.0, 0.0),
        };
        assert_eq!(asset.vertex_count(), 3);
        assert_eq!(asset.triangle_count(), 1);
    }
}
