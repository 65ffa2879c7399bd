//! The kind of tile layer a viewport shows.

use anyhow::{Result, bail};
use std::{
	fmt::{self, Display},
	str::FromStr,
};

/// Selects which tile set the renderer draws and how fetched bytes are decoded.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LayerKind {
	/// Mapbox vector tiles, fetched as `.pbf` and decoded into features.
	#[default]
	Vector,
	/// Raster tiles, fetched as `.png` and decoded into RGBA images.
	Raster,
}

impl LayerKind {
	/// File extension used in tile URLs and directory layouts.
	#[must_use]
	pub fn extension(&self) -> &'static str {
		match self {
			LayerKind::Vector => "pbf",
			LayerKind::Raster => "png",
		}
	}

	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			LayerKind::Vector => "vector",
			LayerKind::Raster => "raster",
		}
	}
}

impl Display for LayerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LayerKind {
	type Err = anyhow::Error;

	fn from_str(value: &str) -> Result<Self> {
		Ok(match value.to_lowercase().as_str() {
			"vector" | "pbf" | "mvt" => LayerKind::Vector,
			"raster" | "png" => LayerKind::Raster,
			_ => bail!("unknown layer kind '{value}', expected 'vector' or 'raster'"),
		})
	}
}
