//! This module provides the [`Blob`] struct, an immutable wrapper around the raw bytes of a tile.
//!
//! # Overview
//!
//! Every tile travels through the crates as a [`Blob`]: the fetchers produce one per response body,
//! the decoders borrow its slice, and the cache keeps the decoded result. A blob is never mutated
//! after construction; there is deliberately no `as_mut_slice`.
//!
//! # Examples
//!
//! ```rust
//! use vectile_core::Blob;
//!
//! let blob = Blob::from(vec![0, 1, 2, 3, 4, 5, 6, 7]);
//! assert_eq!(blob.len(), 8);
//! assert_eq!(blob.range(2..5), &[2, 3, 4]);
//!
//! let text = Blob::from("Xylofön");
//! assert_eq!(text.as_str(), "Xylofön");
//! ```

use anyhow::Result;
use std::{fmt::Debug, ops::Range, path::Path};

/// An immutable byte buffer, as received over the wire or read from disk.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	///
	/// ```rust
	/// use vectile_core::Blob;
	///
	/// let empty_blob = Blob::new_empty();
	/// assert!(empty_blob.is_empty());
	/// ```
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Returns a slice of the given byte range. Panics if the range is out of bounds.
	#[must_use]
	pub fn range(&self, range: Range<usize>) -> &[u8] {
		&self.0[range]
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the content as UTF-8, replacing invalid sequences.
	#[must_use]
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(&self.0).unwrap_or("<invalid utf-8>")
	}

	/// Returns the content as space separated hex bytes, e.g. `"1a 03 6b"`.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn save_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, &self.0)?;
		Ok(())
	}

	pub fn load_from_file(path: &Path) -> Result<Self> {
		Ok(Blob::from(std::fs::read(path)?))
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		const MAX: usize = 32;
		if self.0.len() <= MAX {
			write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
		} else {
			let head = Blob::from(&self.0[..MAX]);
			write!(f, "Blob({}): {} …", self.0.len(), head.as_hex())
		}
	}
}
