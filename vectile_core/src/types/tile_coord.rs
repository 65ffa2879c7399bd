//! Three-dimensional tile coordinates in a Web Mercator pyramid
//!
//! [`TileCoord`] identifies one tile of the standard slippy-map quad-tree. A coordinate can only
//! be constructed with indices inside `[0, 2^level)`, so every value that reaches a fetcher or the
//! cache is a valid tile.
//!
//! # Examples
//!
//! ```
//! use vectile_core::TileCoord;
//!
//! let coord = TileCoord::new(5, 6, 7).unwrap();
//! assert_eq!(coord.to_string(), "5/6/7");
//!
//! // x = 8 does not exist at level 3
//! assert!(TileCoord::new(3, 8, 0).is_err());
//! ```

use anyhow::{Result, ensure};
use std::{
	cmp::Ordering,
	f64::consts::PI,
	fmt::{self, Debug, Display},
};

/// Highest zoom level whose indices still fit into `u32`.
pub const MAX_LEVEL: u8 = 31;

/// A 3D tile coordinate in a Web Mercator tile pyramid, with zoom level, x, and y indices.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The x index of the tile.
	pub x: u32,
	/// The y index of the tile.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord` at the given zoom `level` and tile indices `x`, `y`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or if `x`/`y` are outside `[0, 2^level)`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let size = TileCoord::grid_size(level);
		ensure!(u64::from(x) < size, "x ({x}) out of bounds for level {level}");
		ensure!(u64::from(y) < size, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Number of tiles along one axis at `level`, i.e. `2^level`.
	#[must_use]
	pub fn grid_size(level: u8) -> u64 {
		1u64 << level
	}

	/// Create the `TileCoord` that contains the geographic position (`lon`, `lat`) at level `z`.
	///
	/// Positions beyond the Web Mercator latitude limit are clamped into the outermost row.
	///
	/// ```
	/// use vectile_core::TileCoord;
	///
	/// // Berlin at zoom 10
	/// let coord = TileCoord::from_geo(13.404954, 52.520008, 10).unwrap();
	/// assert_eq!((coord.x, coord.y), (550, 335));
	/// ```
	pub fn from_geo(lon: f64, lat: f64, z: u8) -> Result<TileCoord> {
		ensure!(z <= MAX_LEVEL, "z ({z}) must be <= {MAX_LEVEL}");
		ensure!((-180.0..=180.0).contains(&lon), "longitude ({lon}) must be within [-180, 180]");
		ensure!((-90.0..=90.0).contains(&lat), "latitude ({lat}) must be within [-90, 90]");

		let size = TileCoord::grid_size(z) as f64;
		let x = size * (lon / 360.0 + 0.5);
		let y = size * (0.5 - 0.5 * (lat * PI / 360.0 + PI / 4.0).tan().ln() / PI);

		let clamp = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, size - 1.0).floor() };
		TileCoord::new(z, clamp(x) as u32, clamp(y) as u32)
	}

	/// Geographic `[longitude, latitude]` of the north-west corner of this tile, in degrees.
	#[must_use]
	pub fn as_geo(&self) -> [f64; 2] {
		let size = TileCoord::grid_size(self.level) as f64;
		[
			(f64::from(self.x) / size - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(self.y) / size)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// The largest valid x or y index at this level, `2^level - 1`.
	#[must_use]
	pub fn max_value(&self) -> u32 {
		(TileCoord::grid_size(self.level) - 1) as u32
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

/// Formats as `z/x/y`, the path segment used by tile servers.
impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

/// Ordered by zoom `level`, then `y`, then `x`.
impl Ord for TileCoord {
	fn cmp(&self, other: &Self) -> Ordering {
		self
			.level
			.cmp(&other.level)
			.then(self.y.cmp(&other.y))
			.then(self.x.cmp(&other.x))
	}
}

impl PartialOrd for TileCoord {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
