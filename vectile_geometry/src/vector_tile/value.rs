use crate::GeoValue;
use anyhow::{Context, Result};
use byteorder::LE;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// Protobuf encoding of the MVT `Value` message.
pub trait GeoValuePBF<'a> {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue>;
	fn to_blob(&self) -> Result<Blob>;
}

impl<'a> GeoValuePBF<'a> for GeoValue {
	/// Reads one value message. The last recognised field wins; a message without any
	/// recognised field reads as `Null`.
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue> {
		use GeoValue::*;
		let mut value = Null;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => value = String(reader.read_pbf_string().context("Failed to read string value")?),
				(2, 5) => value = Float(reader.read_f32().context("Failed to read f32 value")?),
				(3, 1) => value = Double(reader.read_f64().context("Failed to read f64 value")?),
				(4, 0) => {
					value = Int(
						reader
							.read_varint_u64()
							.context("Failed to read varint for int value")? as i64,
					);
				}
				(5, 0) => {
					value = UInt(
						reader
							.read_varint_u64()
							.context("Failed to read varint for uint value")?,
					);
				}
				(6, 0) => value = Int(reader.read_svarint_i64().context("Failed to read svarint value")?),
				(7, 0) => {
					value = Bool(
						reader
							.read_varint_u64()
							.context("Failed to read varint for bool value")?
							!= 0,
					);
				}
				(_, w) => reader.skip_pbf_field(w).context("Failed to skip unknown value field")?,
			}
		}
		Ok(value)
	}

	fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeoValue::String(s) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			GeoValue::Float(f) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*f).context("Failed to write float value")?;
			}
			GeoValue::Double(f) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			GeoValue::UInt(u) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*u).context("Failed to write uint value")?;
			}
			GeoValue::Int(s) => {
				writer.write_pbf_key(6, 0)?;
				writer
					.write_varint(((*s << 1) ^ (*s >> 63)) as u64)
					.context("Failed to write int value")?;
			}
			GeoValue::Bool(b) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*b)).context("Failed to write bool value")?;
			}
			GeoValue::Null => {}
		}

		Ok(writer.into_blob())
	}
}
