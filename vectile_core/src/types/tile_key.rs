//! Cache key of a single tile: layer kind plus coordinate.

use super::{LayerKind, TileCoord};
use anyhow::Result;
use std::fmt::{self, Debug, Display};

/// Identifies one tile of one layer. Displays as `"{layer}/{z}/{x}/{y}"`.
///
/// ```
/// use vectile_core::{LayerKind, TileKey};
///
/// let key = TileKey::new(LayerKind::Vector, 14, 8800, 5373).unwrap();
/// assert_eq!(key.to_string(), "vector/14/8800/5373");
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TileKey {
	pub layer: LayerKind,
	pub coord: TileCoord,
}

impl TileKey {
	/// Builds a key from raw indices; fails for indices outside the level's grid.
	pub fn new(layer: LayerKind, level: u8, x: u32, y: u32) -> Result<TileKey> {
		Ok(TileKey {
			layer,
			coord: TileCoord::new(level, x, y)?,
		})
	}

	#[must_use]
	pub fn from_coord(layer: LayerKind, coord: TileCoord) -> TileKey {
		TileKey { layer, coord }
	}

	#[must_use]
	pub fn level(&self) -> u8 {
		self.coord.level
	}
}

impl Display for TileKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.layer, self.coord)
	}
}

impl Debug for TileKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileKey({self})")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn format() {
		let key = TileKey::new(LayerKind::Raster, 3, 1, 2).unwrap();
		assert_eq!(key.to_string(), "raster/3/1/2");
		assert_eq!(format!("{key:?}"), "TileKey(raster/3/1/2)");
		assert_eq!(key.level(), 3);
	}

	#[test]
	fn rejects_out_of_bounds() {
		assert!(TileKey::new(LayerKind::Vector, 3, 8, 0).is_err());
	}
}
