// This module defines the `ValueReader` trait for reading values out of a binary buffer.
//
// # Overview
//
// The `ValueReader` trait provides an interface for reading varints, zigzag integers, fixed-width
// floats and Protocol Buffers fields from a buffer with a monotonically advancing cursor. The only
// required methods are the cursor bookkeeping (`len`, `position`, `set_position`), raw slice access
// (`read_slice`) and `get_sub_reader`; everything else is provided on top of them.
//
// Structural problems are reported as `PbfError` values wrapped in `anyhow::Error`.
//
// # Examples
//
// ```rust
// use vectile_core::io::{ValueReader, ValueReaderSlice};
//
// let mut reader = ValueReaderSlice::new_le(&[0xAC, 0x02]);
// assert_eq!(reader.read_varint().unwrap(), 300);
// assert!(reader.is_eof());
// ```

use super::{PbfError, decode_zigzag};
use crate::Blob;
use anyhow::{Context, Result};
use byteorder::ByteOrder;

/// A trait for reading values from a borrowed buffer with a given byte order.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	/// Returns the total length of the readable data.
	fn len(&self) -> u64;

	/// Returns the current cursor position.
	fn position(&self) -> u64;

	/// Moves the cursor. Positions beyond the end are rejected.
	fn set_position(&mut self, position: u64) -> Result<()>;

	/// Returns the next `length` bytes and advances the cursor past them.
	///
	/// # Errors
	/// Returns [`PbfError::TruncatedField`] if fewer than `length` bytes remain. The cursor is not
	/// moved in that case.
	fn read_slice(&mut self, length: u64) -> Result<&'a [u8]>;

	/// Returns a sub-reader over the next `length` bytes and advances the cursor past them.
	///
	/// This is used for embedded messages, whose fields are read until the sub-reader is exhausted.
	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b;

	/// Checks if the buffer is empty.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of bytes remaining to be read.
	fn remaining(&self) -> u64 {
		self.len().saturating_sub(self.position())
	}

	/// Checks if there are any bytes remaining to be read.
	fn has_remaining(&self) -> bool {
		self.remaining() > 0
	}

	/// True once the cursor has reached the end of the buffer.
	fn is_eof(&self) -> bool {
		!self.has_remaining()
	}

	fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_slice(1)?[0])
	}

	/// Reads a base-128 varint of at most `max_bytes` bytes.
	///
	/// Each byte carries 7 payload bits, least significant group first; a set MSB means another
	/// byte follows.
	fn read_varint_with_limit(&mut self, max_bytes: u32) -> Result<u64> {
		let position = self.position();
		let mut value = 0u64;
		let mut shift = 0u32;
		loop {
			if self.is_eof() {
				return Err(PbfError::MalformedVarint { position }.into());
			}
			let byte = self.read_u8()?;
			value |= u64::from(byte & 0x7F) << shift;
			if byte & 0x80 == 0 {
				return Ok(value);
			}
			shift += 7;
			if shift >= 7 * max_bytes {
				return Err(PbfError::MalformedVarint { position }.into());
			}
		}
	}

	/// Reads an unsigned 32-bit varint.
	///
	/// # Errors
	/// [`PbfError::MalformedVarint`] if the buffer ends before the terminating byte, or if the value
	/// needs more than 32 bits. Wider values are rejected, never truncated.
	fn read_varint(&mut self) -> Result<u32> {
		let position = self.position();
		let value = self.read_varint_with_limit(5)?;
		u32::try_from(value).map_err(|_| PbfError::MalformedVarint { position }.into())
	}

	/// Reads an unsigned 64-bit varint (up to 10 bytes), for `uint64`/`int64` wire fields.
	fn read_varint_u64(&mut self) -> Result<u64> {
		self.read_varint_with_limit(10)
	}

	/// Reads a zigzag-encoded signed 32-bit varint: `(v >> 1) ^ -(v & 1)`.
	fn read_svarint(&mut self) -> Result<i32> {
		Ok(decode_zigzag(self.read_varint()?))
	}

	/// Reads a zigzag-encoded signed 64-bit varint, for `sint64` wire fields.
	fn read_svarint_i64(&mut self) -> Result<i64> {
		let value = self.read_varint_u64()?;
		Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
	}

	/// Reads a 32-bit IEEE754 float (4 bytes).
	fn read_f32(&mut self) -> Result<f32> {
		Ok(E::read_f32(self.read_slice(4)?))
	}

	/// Reads a 64-bit IEEE754 float (8 bytes).
	fn read_f64(&mut self) -> Result<f64> {
		Ok(E::read_f64(self.read_slice(8)?))
	}

	fn read_u32(&mut self) -> Result<u32> {
		Ok(E::read_u32(self.read_slice(4)?))
	}

	fn read_u64(&mut self) -> Result<u64> {
		Ok(E::read_u64(self.read_slice(8)?))
	}

	/// Reads a binary blob of the specified length.
	fn read_blob(&mut self, length: u64) -> Result<Blob> {
		Ok(Blob::from(self.read_slice(length)?))
	}

	/// Reads a UTF-8 encoded string of the specified length.
	fn read_string(&mut self, length: u64) -> Result<String> {
		let bytes = self.read_slice(length)?;
		String::from_utf8(bytes.to_vec()).context("string is not valid UTF-8")
	}

	/// Reads a Protocol Buffers key and splits it into `(field_number, wire_type)`.
	fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		Ok((value >> 3, (value & 0x07) as u8))
	}

	/// Reads a length-delimited field: a varint length followed by exactly that many bytes.
	fn read_pbf_bytes(&mut self) -> Result<&'a [u8]> {
		let length = self.read_varint().context("Failed to read varint for field length")?;
		self.read_slice(u64::from(length))
	}

	/// Returns a sub-reader for a Protocol Buffers embedded message.
	fn get_pbf_sub_reader<'b>(&'b mut self) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b,
	{
		let length = self
			.read_varint()
			.context("Failed to read varint for sub-reader length")?;
		self
			.get_sub_reader(u64::from(length))
			.context("Failed to get sub-reader")
	}

	/// Reads a packed repeated field of unsigned 32-bit varints.
	fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let mut reader = self
			.get_pbf_sub_reader()
			.context("Failed to get PBF sub-reader for packed uint32")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			values.push(
				reader
					.read_varint()
					.context("Failed to read varint for packed uint32")?,
			);
		}
		Ok(values)
	}

	/// Reads a Protocol Buffers string field.
	fn read_pbf_string(&mut self) -> Result<String> {
		let length = self.read_varint().context("Failed to read varint for string length")?;
		self.read_string(u64::from(length)).context("Failed to read PBF string")
	}

	/// Reads a Protocol Buffers binary blob field.
	fn read_pbf_blob(&mut self) -> Result<Blob> {
		Ok(Blob::from(self.read_pbf_bytes().context("Failed to read PBF blob")?))
	}

	/// Advances past one value of the given wire type.
	///
	/// # Errors
	/// [`PbfError::UnsupportedWireType`] for anything other than 0 (varint), 1 (fixed64),
	/// 2 (length-delimited) and 5 (fixed32).
	fn skip_pbf_field(&mut self, wire_type: u8) -> Result<()> {
		match wire_type {
			0 => {
				self.read_varint_u64()?;
			}
			1 => {
				self.read_slice(8)?;
			}
			2 => {
				self.read_pbf_bytes()?;
			}
			5 => {
				self.read_slice(4)?;
			}
			w => return Err(PbfError::UnsupportedWireType(w).into()),
		}
		Ok(())
	}
}
