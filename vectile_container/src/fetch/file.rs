//! Reads tiles from a `{z}/{x}/{y}.{ext}` directory tree.

use super::{TileFetcher, tile_path};
use crate::FetchError;
use async_trait::async_trait;
use log::trace;
use std::{io::ErrorKind, path::PathBuf};
use vectile_core::{Blob, TileKey};

#[derive(Debug)]
pub struct FileTileFetcher {
	dir: PathBuf,
	name: String,
}

impl FileTileFetcher {
	pub fn new(dir: impl Into<PathBuf>) -> FileTileFetcher {
		let dir = dir.into();
		let name = dir.display().to_string();
		FileTileFetcher { dir, name }
	}

	pub fn tile_file(&self, key: &TileKey) -> PathBuf {
		self.dir.join(tile_path(key))
	}
}

#[async_trait]
impl TileFetcher for FileTileFetcher {
	fn name(&self) -> &str {
		&self.name
	}

	/// A missing file answers like a tile server would, with status 404.
	async fn fetch(&self, key: &TileKey) -> Result<Blob, FetchError> {
		let path = self.tile_file(key);
		trace!("reading {}", path.display());
		match tokio::fs::read(&path).await {
			Ok(bytes) => Ok(Blob::from(bytes)),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::Status(404)),
			Err(e) => Err(FetchError::Io(format!("{}: {e}", path.display()))),
		}
	}
}
