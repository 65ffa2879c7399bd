use crate::FetchError;
use vectile_core::TileKey;

/// Completion notice of one fetch, broadcast to every subscriber of a [`TileLoader`].
///
/// [`TileLoader`]: crate::TileLoader
#[derive(Clone, Debug, PartialEq)]
pub enum TileEvent {
	/// The tile is now in the cache.
	Loaded(TileKey),
	/// The fetch failed. Nothing was cached, so the next request retries.
	Failed { key: TileKey, error: FetchError },
}

impl TileEvent {
	pub fn key(&self) -> &TileKey {
		match self {
			TileEvent::Loaded(key) | TileEvent::Failed { key, .. } => key,
		}
	}
}
