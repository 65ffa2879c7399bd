//! Sources of raw tile bytes.

mod file;
mod http;
#[cfg(any(test, feature = "test"))]
mod mock;
mod traits;

pub use file::FileTileFetcher;
pub use http::HttpTileFetcher;
#[cfg(any(test, feature = "test"))]
pub use mock::MockTileFetcher;
pub use traits::{TileFetcher, tile_path};
