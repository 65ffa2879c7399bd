//! Contains types like byte blobs, tile coordinates, layer kinds and cache keys.

mod blob;
pub use blob::*;

mod geo_center;
pub use geo_center::*;

mod layer_kind;
pub use layer_kind::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_key;
pub use tile_key::*;
