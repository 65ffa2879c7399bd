//! This module provides the `ValueReaderSlice` struct for reading values from a byte slice.
//!
//! # Overview
//!
//! `ValueReaderSlice` is the explicit cursor over a borrowed buffer: it holds the slice and the
//! current position, nothing else. Every read borrows the reader mutably and advances the position;
//! slices returned by [`ValueReader::read_slice`] borrow the underlying buffer, not the reader.
//!
//! # Examples
//!
//! ```rust
//! use vectile_core::io::{ValueReader, ValueReaderSlice};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let data = &[0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00];
//!
//!     let mut reader_le = ValueReaderSlice::new_le(data);
//!     assert_eq!(reader_le.read_u32()?, 1);
//!
//!     let mut reader_be = ValueReaderSlice::new_be(data);
//!     assert_eq!(reader_be.read_u32()?, 0x0100_0000);
//!
//!     Ok(())
//! }
//! ```

use super::{PbfError, ValueReader};
use anyhow::{Result, bail};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::marker::PhantomData;

/// A cursor over a byte slice using a specified byte order.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	slice: &'a [u8],
	position: u64,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			slice,
			position: 0,
		}
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	/// Creates a new `ValueReaderSlice` with little-endian byte order, as used by protobuf.
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a> ValueReaderSlice<'a, BigEndian> {
	#[must_use]
	pub fn new_be(slice: &'a [u8]) -> ValueReaderSlice<'a, BigEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn len(&self) -> u64 {
		self.slice.len() as u64
	}

	fn position(&self) -> u64 {
		self.position
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		if position > self.len() {
			bail!("set position outside length")
		}
		self.position = position;
		Ok(())
	}

	fn read_slice(&mut self, length: u64) -> Result<&'a [u8]> {
		let remaining = self.remaining();
		if length > remaining {
			return Err(PbfError::TruncatedField {
				needed: length,
				remaining,
			}
			.into());
		}
		let start = self.position as usize;
		let end = start + length as usize;
		self.position += length;
		Ok(&self.slice[start..end])
	}

	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b,
	{
		let slice = self.read_slice(length)?;
		Ok(Box::new(ValueReaderSlice::<E>::new(slice)))
	}
}
