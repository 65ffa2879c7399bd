use crate::FetchError;
use async_trait::async_trait;
use std::fmt::Debug;
use vectile_core::{Blob, TileKey};

/// An async source of raw tile bytes.
///
/// A fetcher only moves bytes; decoding and caching happen in [`TileLoader`](crate::TileLoader).
/// A tile that exists but is empty is returned as a zero-length [`Blob`].
#[async_trait]
pub trait TileFetcher: Debug + Send + Sync {
	fn name(&self) -> &str;

	async fn fetch(&self, key: &TileKey) -> Result<Blob, FetchError>;
}

/// Relative location of a tile, `{z}/{x}/{y}.{ext}`.
pub fn tile_path(key: &TileKey) -> String {
	let coord = &key.coord;
	format!("{}/{}/{}.{}", coord.level, coord.x, coord.y, key.layer.extension())
}

#[cfg(test)]
mod tests {
	use super::*;
	use vectile_core::LayerKind;

	#[test]
	fn paths() {
		let key = TileKey::new(LayerKind::Vector, 14, 8800, 5373).unwrap();
		assert_eq!(tile_path(&key), "14/8800/5373.pbf");
		let key = TileKey::new(LayerKind::Raster, 0, 0, 0).unwrap();
		assert_eq!(tile_path(&key), "0/0/0.png");
	}
}
