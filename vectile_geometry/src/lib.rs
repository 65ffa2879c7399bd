mod geo;
pub mod vector_tile;

pub use geo::*;
pub use vector_tile::{
	DecodedLayer, decode_layer, decode_tile, decode_tile_layers, try_decode_layer, try_decode_tile,
};
