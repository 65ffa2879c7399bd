mod event;
mod tile_loader;

pub use event::TileEvent;
pub use tile_loader::{LoaderConfig, TileFuture, TileLoader};
