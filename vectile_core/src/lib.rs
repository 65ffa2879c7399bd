//! Contains the byte-level building blocks shared by all vectile crates: blobs, tile coordinates,
//! cache keys and the protobuf value reader/writer.

pub mod io;

pub mod types;
pub use types::*;
