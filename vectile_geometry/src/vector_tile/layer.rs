//! A single vector tile layer.
//!
//! The encoding follows the MVT schema:
//!  * field 1: `name` (string)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint, default 4096)
//!  * field 15: `version` (varint, default 1)
//!
//! Any other field is skipped.

use super::{feature::VectorTileFeature, geometry::Ring, property_manager::PropertyManager, value::GeoValuePBF};
use crate::{Feature, GeoProperties, GeoValue, GeometryKind};
use anyhow::{Context, Result};
use byteorder::LE;
use log::trace;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

pub const DEFAULT_EXTENT: u32 = 4096;

#[derive(Clone, Debug, PartialEq)]
pub struct VectorTileLayer {
	pub extent: u32,
	pub features: Vec<VectorTileFeature>,
	pub name: String,
	pub property_manager: PropertyManager,
	pub version: u32,
}

impl VectorTileLayer {
	#[must_use]
	pub fn new(name: String, extent: u32, version: u32) -> VectorTileLayer {
		VectorTileLayer {
			extent,
			features: vec![],
			name,
			property_manager: PropertyManager::default(),
			version,
		}
	}

	/// A layer with `extent = 4096` and `version = 2`.
	#[must_use]
	pub fn new_standard(name: &str) -> VectorTileLayer {
		VectorTileLayer::new(name.to_string(), DEFAULT_EXTENT, 2)
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileLayer> {
		let mut layer = VectorTileLayer::new(String::new(), DEFAULT_EXTENT, 1);

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => layer.name = reader.read_pbf_string().context("Failed to read layer name")?,
				(2, 2) => layer.features.push(
					VectorTileFeature::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?
							.as_mut(),
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					let key = reader.read_pbf_string().context("Failed to read property key")?;
					layer.property_manager.key.push(key);
				}
				(4, 2) => {
					let value = GeoValue::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for property value")?
							.as_mut(),
					)
					.context("Failed to read GeoValue")?;
					layer.property_manager.val.push(value);
				}
				(5, 0) => layer.extent = reader.read_varint().context("Failed to read extent")?,
				(15, 0) => layer.version = reader.read_varint().context("Failed to read version")?,
				(field, w) => {
					trace!("skipping layer field {field} (wire type {w})");
					reader.skip_pbf_field(w).context("Failed to skip unknown layer field")?;
				}
			}
		}

		Ok(layer)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer.write_pbf_key(15, 0)?;
		writer
			.write_varint(u64::from(self.version))
			.context("Failed to write version")?;

		writer.write_pbf_key(1, 2)?;
		writer.write_pbf_string(&self.name).context("Failed to write layer name")?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in self.property_manager.key.iter() {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in self.property_manager.val.iter() {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		if self.extent != DEFAULT_EXTENT {
			writer.write_pbf_key(5, 0)?;
			writer
				.write_varint(u64::from(self.extent))
				.context("Failed to write extent")?;
		}

		Ok(writer.into_blob())
	}

	/// Appends a feature, adding its properties to the layer dictionaries.
	pub fn add_feature(
		&mut self,
		id: Option<u64>,
		kind: GeometryKind,
		rings: &[Ring],
		properties: &GeoProperties,
	) -> Result<()> {
		let tag_ids = self.property_manager.encode_tag_ids(properties);
		self
			.features
			.push(VectorTileFeature::from_rings(id, kind, rings, tag_ids).context("Failed to encode feature")?);
		Ok(())
	}

	/// Decodes every feature of the layer, in order.
	///
	/// # Errors
	/// Property indices outside the dictionaries and malformed command streams.
	pub fn to_features(&self) -> Result<Vec<Feature>> {
		let mut features = Vec::new();
		for (index, feature) in self.features.iter().enumerate() {
			features.extend(
				feature
					.to_features(&self.property_manager)
					.with_context(|| format!("Failed to decode feature #{index} of layer '{}'", self.name))?,
			);
		}
		Ok(features)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use vectile_core::io::ValueReaderSlice;

	fn read(blob: &Blob) -> Result<VectorTileLayer> {
		VectorTileLayer::read(&mut ValueReaderSlice::new_le(blob.as_slice()))
	}

	#[test]
	fn defaults_when_fields_absent() -> Result<()> {
		let layer = read(&Blob::new_empty())?;
		assert_eq!(layer.extent, 4096);
		assert_eq!(layer.version, 1);
		assert_eq!(layer.name, "");
		assert!(layer.features.is_empty());
		Ok(())
	}

	#[test]
	fn reads_extent_and_skips_unknown() -> Result<()> {
		let data = Blob::from(&[
			0x0A, 0x04, b't', b'i', b'l', b'e', // name
			0x28, 0x80, 0x20, // extent = 4096
			0x30, 0x05, // field 6, varint: unknown
			0x28, 0x80, 0x04, // extent = 512
		]);
		let layer = read(&data)?;
		assert_eq!(layer.name, "tile");
		assert_eq!(layer.extent, 512);
		Ok(())
	}

	#[test]
	fn blob_round_trip() -> Result<()> {
		let mut layer = VectorTileLayer::new("roads".to_string(), 512, 2);
		layer.add_feature(
			Some(3),
			GeometryKind::LineString,
			&[vec![[0, 0], [100, 50]]],
			&GeoProperties::from(vec![("highway", "primary")]),
		)?;
		layer.add_feature(
			None,
			GeometryKind::Point,
			&[vec![[5, 5]]],
			&GeoProperties::from(vec![("highway", GeoValue::from("stop")), ("ref", GeoValue::from(12u32))]),
		)?;
		let copy = read(&layer.to_blob()?)?;
		assert_eq!(copy, layer);
		Ok(())
	}

	#[test]
	fn to_features_in_order() -> Result<()> {
		let mut layer = VectorTileLayer::new_standard("tile");
		layer.add_feature(None, GeometryKind::Point, &[vec![[1, 1]]], &GeoProperties::new())?;
		layer.add_feature(None, GeometryKind::LineString, &[vec![[1, 1], [2, 2]]], &GeoProperties::new())?;
		let kinds: Vec<GeometryKind> = layer.to_features()?.iter().map(|f| f.geom_type).collect();
		assert_eq!(kinds, vec![GeometryKind::Point, GeometryKind::LineString]);
		Ok(())
	}

	#[test]
	fn bad_feature_names_index() {
		let mut layer = VectorTileLayer::new_standard("tile");
		layer
			.features
			.push(VectorTileFeature::from_rings(None, GeometryKind::Point, &[vec![[1, 1]]], vec![4, 0]).unwrap());
		let err = layer.to_features().unwrap_err();
		assert_eq!(err.to_string(), "Failed to decode feature #0 of layer 'tile'");
	}
}
