mod tile_cache;

pub use tile_cache::{CacheEntry, CacheStats, SharedTileCache, TileCache};
