//! Mapbox Vector Tile (MVT) support.
//!
//! - [`tile`]: the top-level container of layers.
//! - [`layer`]: one layer with its key/value dictionaries and features.
//! - [`feature`]: tag indices plus the raw geometry command stream.
//! - [`geometry`]: assembles and encodes command streams.
//! - [`property_manager`]: the key/value dictionaries.
//! - [`value`]: typed property values.
//!
//! [`decode_tile`] ties them together for the renderer.

mod decode;
pub mod feature;
pub mod geometry;
mod geometry_type;
pub mod layer;
pub mod property_manager;
pub mod tile;
mod value;

pub use decode::*;
pub use feature::VectorTileFeature;
pub use geometry_type::GeomType;
pub use layer::VectorTileLayer;
pub use tile::VectorTile;
pub use value::GeoValuePBF;
