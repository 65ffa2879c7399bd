use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A point in geographic space:
/// - `f64` longitude (range: [-180, 180])
/// - `f64` latitude (range: [-90, 90])
#[derive(Clone, Copy, Default, PartialEq)]
pub struct GeoCenter(pub f64, pub f64);

impl GeoCenter {
	#[must_use]
	pub fn lon(&self) -> f64 {
		self.0
	}

	#[must_use]
	pub fn lat(&self) -> f64 {
		self.1
	}

	/// Checks that longitude and latitude are within valid ranges.
	pub fn check(&self) -> Result<()> {
		ensure!(-180.0 <= self.0, "center[0] (longitude) must be >= -180");
		ensure!(-90.0 <= self.1, "center[1] (latitude) must be >= -90");
		ensure!(self.0 <= 180.0, "center[0] (longitude) must be <= 180");
		ensure!(self.1 <= 90.0, "center[1] (latitude) must be <= 90");
		Ok(())
	}
}

impl Debug for GeoCenter {
	/// Formats the `GeoCenter` as `"longitude, latitude"`.
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}, {}", self.0, self.1)
	}
}
