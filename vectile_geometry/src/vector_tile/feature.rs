use super::{
	geometry::{Ring, assemble_rings, encode_rings, shape_rings},
	geometry_type::GeomType,
	property_manager::PropertyManager,
};
use crate::{Feature, GeometryKind};
use anyhow::{Context, Result};
use byteorder::LE;
use log::trace;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// A feature as stored in a layer: tag indices plus the undecoded command stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl VectorTileFeature {
	/// Builds a feature from rings, encoding them into a command stream.
	pub fn from_rings(id: Option<u64>, kind: GeometryKind, rings: &[Ring], tag_ids: Vec<u32>) -> Result<Self> {
		let mut writer = ValueWriterBlob::new_le();
		for command in encode_rings(kind, rings) {
			writer.write_varint(u64::from(command))?;
		}
		Ok(VectorTileFeature {
			id,
			tag_ids,
			geom_type: GeomType::from(kind),
			geom_data: writer.into_blob(),
		})
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint_u64().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => {
					f.geom_type = GeomType::from(u64::from(
						reader.read_varint().context("Failed to read geometry type")?,
					));
				}
				(4, 2) => f.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?,
				(field, w) => {
					trace!("skipping feature field {field} (wire type {w})");
					reader.skip_pbf_field(w).context("Failed to skip unknown feature field")?;
				}
			}
		}

		Ok(f)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0)?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2)?;
			writer
				.write_pbf_packed_uint32(&self.tag_ids)
				.context("Failed to write tag IDs")?;
		}

		writer.write_pbf_key(3, 0)?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geom_data.is_empty() {
			writer.write_pbf_key(4, 2)?;
			writer
				.write_pbf_blob(&self.geom_data)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}

	/// Resolves properties and geometry into drawable features.
	///
	/// Returns no features for an unknown geometry type or when every ring is too short.
	pub fn to_features(&self, property_manager: &PropertyManager) -> Result<Vec<Feature>> {
		let properties = property_manager
			.decode_tag_ids(&self.tag_ids)
			.context("Failed to decode feature properties")?;

		let Some(kind) = self.geom_type.kind() else {
			trace!("ignoring feature {:?} with unknown geometry type", self.id);
			return Ok(Vec::new());
		};

		let rings = assemble_rings(self.geom_data.as_slice()).context("Failed to assemble feature geometry")?;

		Ok(shape_rings(kind, rings)
			.into_iter()
			.map(|coords| Feature {
				id: self.id,
				geom_type: kind,
				coords,
				properties: properties.clone(),
			})
			.collect())
	}
}
