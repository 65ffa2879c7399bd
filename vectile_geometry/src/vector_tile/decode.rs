//! Whole-tile decoding into drawable features.

use super::{
	layer::{DEFAULT_EXTENT, VectorTileLayer},
	tile::VectorTile,
};
use crate::Feature;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use vectile_core::Blob;

/// Name of the layer that carries the drawable features.
pub const APPLICATION_LAYER: &str = "tile";

/// The application layer of a tile, decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedLayer {
	pub name: String,
	pub extent: u32,
	pub features: Vec<Feature>,
}

impl Default for DecodedLayer {
	fn default() -> Self {
		DecodedLayer {
			name: String::new(),
			extent: DEFAULT_EXTENT,
			features: Vec::new(),
		}
	}
}

/// Picks the layer named [`APPLICATION_LAYER`], or the first layer when no layer has that name.
fn application_layer(tile: &VectorTile) -> Option<&VectorTileLayer> {
	tile.find_layer(APPLICATION_LAYER).or_else(|| tile.layers.first())
}

/// Decodes the application layer of a tile, keeping its name and extent.
///
/// An empty blob, or a tile without layers, yields an empty layer with the default extent.
///
/// # Errors
/// Malformed buffers: broken varints, truncated fields, unsupported wire types, dictionary
/// indices out of range or unknown geometry commands.
pub fn try_decode_layer(blob: &Blob) -> Result<DecodedLayer> {
	if blob.is_empty() {
		return Ok(DecodedLayer::default());
	}
	let tile = VectorTile::from_blob(blob).context("Failed to parse vector tile")?;
	let Some(layer) = application_layer(&tile) else {
		return Ok(DecodedLayer::default());
	};
	if layer.name != APPLICATION_LAYER {
		debug!("no layer named '{APPLICATION_LAYER}', using '{}'", layer.name);
	}
	Ok(DecodedLayer {
		name: layer.name.clone(),
		extent: layer.extent,
		features: layer.to_features()?,
	})
}

/// Like [`try_decode_layer`], but a malformed tile decodes as an empty layer.
///
/// The error is logged, so one corrupt tile never aborts the rest of a frame.
pub fn decode_layer(blob: &Blob) -> DecodedLayer {
	match try_decode_layer(blob) {
		Ok(layer) => layer,
		Err(err) => {
			warn!("ignoring malformed vector tile ({} bytes): {err:#}", blob.len());
			DecodedLayer::default()
		}
	}
}

/// Decodes the features of the application layer.
pub fn try_decode_tile(blob: &Blob) -> Result<Vec<Feature>> {
	Ok(try_decode_layer(blob)?.features)
}

/// Decodes the features of the application layer; a malformed tile yields no features.
pub fn decode_tile(blob: &Blob) -> Vec<Feature> {
	decode_layer(blob).features
}

/// Decodes every layer of a tile, keyed by layer name.
///
/// Layers that share a name are concatenated in wire order.
pub fn decode_tile_layers(blob: &Blob) -> Result<BTreeMap<String, Vec<Feature>>> {
	let tile = VectorTile::from_blob(blob).context("Failed to parse vector tile")?;
	let mut layers: BTreeMap<String, Vec<Feature>> = BTreeMap::new();
	for layer in &tile.layers {
		layers
			.entry(layer.name.clone())
			.or_default()
			.extend(layer.to_features()?);
	}
	Ok(layers)
}
