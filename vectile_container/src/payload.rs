//! Decoded tile content as stored in the cache.

use crate::FetchError;
use image::RgbaImage;
use std::sync::Arc;
use vectile_core::{Blob, LayerKind};
use vectile_geometry::{Feature, decode_layer};
use vectile_image::{TileContent, blob2image};

/// The decoded content of one tile. Cloning only bumps reference counts.
#[derive(Clone, Debug)]
pub enum TilePayload {
	Vector { features: Arc<Vec<Feature>>, extent: u32 },
	Raster(Arc<RgbaImage>),
	/// The server confirmed that there is nothing at this position.
	Empty,
}

impl TilePayload {
	pub fn is_empty(&self) -> bool {
		matches!(self, TilePayload::Empty)
	}

	/// Borrows the payload as drawable content; `Empty` draws nothing.
	pub fn as_content(&self) -> Option<TileContent<'_>> {
		match self {
			TilePayload::Vector { features, extent } => Some(TileContent::Vector {
				features: features.as_slice(),
				extent: *extent,
			}),
			TilePayload::Raster(image) => Some(TileContent::Raster(image)),
			TilePayload::Empty => None,
		}
	}

	pub fn feature_count(&self) -> usize {
		match self {
			TilePayload::Vector { features, .. } => features.len(),
			_ => 0,
		}
	}
}

/// Decodes fetched bytes according to the layer they were requested for.
///
/// A zero-length body becomes [`TilePayload::Empty`]. A malformed vector tile decodes to zero
/// features (and is logged), while an undecodable raster image is an error.
pub fn decode_payload(layer: LayerKind, blob: &Blob) -> Result<TilePayload, FetchError> {
	if blob.is_empty() {
		return Ok(TilePayload::Empty);
	}
	match layer {
		LayerKind::Vector => {
			let decoded = decode_layer(blob);
			Ok(TilePayload::Vector {
				features: Arc::new(decoded.features),
				extent: decoded.extent,
			})
		}
		LayerKind::Raster => {
			let image = blob2image(blob).map_err(|e| FetchError::Decode(format!("{e:#}")))?;
			Ok(TilePayload::Raster(Arc::new(image.to_rgba8())))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{DynamicImage, Rgba};
	use vectile_geometry::{GeoProperties, GeometryKind, vector_tile::{VectorTile, VectorTileLayer}};
	use vectile_image::image2blob;

	#[test]
	fn empty_blob_is_empty_payload() {
		assert!(decode_payload(LayerKind::Vector, &Blob::new_empty()).unwrap().is_empty());
		assert!(decode_payload(LayerKind::Raster, &Blob::new_empty()).unwrap().is_empty());
	}

	#[test]
	fn vector_payload() {
		let mut layer = VectorTileLayer::new("tile".to_string(), 1024, 2);
		layer
			.add_feature(Some(7), GeometryKind::Point, &[vec![[1, 2]]], &GeoProperties::new())
			.unwrap();
		let blob = VectorTile::new(vec![layer]).to_blob().unwrap();
		let payload = decode_payload(LayerKind::Vector, &blob).unwrap();
		assert_eq!(payload.feature_count(), 1);
		match payload.as_content() {
			Some(TileContent::Vector { features, extent }) => {
				assert_eq!(extent, 1024);
				assert_eq!(features[0].id, Some(7));
			}
			other => panic!("unexpected content {other:?}"),
		}
	}

	#[test]
	fn malformed_vector_tile_has_no_features() {
		let payload = decode_payload(LayerKind::Vector, &Blob::from(&[0x1a, 0x7f, 0x00])).unwrap();
		assert!(!payload.is_empty());
		assert_eq!(payload.feature_count(), 0);
	}

	#[test]
	fn raster_payload() {
		let image = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
		let blob = image2blob(&DynamicImage::ImageRgba8(image)).unwrap();
		match decode_payload(LayerKind::Raster, &blob).unwrap() {
			TilePayload::Raster(decoded) => assert_eq!(decoded.get_pixel(3, 3), &Rgba([10, 20, 30, 255])),
			other => panic!("expected raster payload, got {other:?}"),
		}
	}

	#[test]
	fn broken_png_is_a_decode_error() {
		let result = decode_payload(LayerKind::Raster, &Blob::from("not a png"));
		assert!(matches!(result, Err(FetchError::Decode(_))));
	}
}
