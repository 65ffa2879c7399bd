//! Tile storage and retrieval: a bounded LRU cache, pluggable fetchers and a loader that
//! deduplicates concurrent requests for the same tile.
//!
//! - [`TileCache`]: recency-ordered cache of decoded [`TilePayload`]s.
//! - [`TileFetcher`]: async source of raw tile bytes ([`HttpTileFetcher`], [`FileTileFetcher`]).
//! - [`TileLoader`]: fetch, decode and store, with at most one in-flight fetch per [`TileKey`].
//!
//! # Features
//! - `test`: exposes [`MockTileFetcher`] for downstream tests.
//!
//! [`TileKey`]: vectile_core::TileKey

mod cache;
mod error;
mod fetch;
mod loader;
mod payload;

pub use cache::*;
pub use error::FetchError;
pub use fetch::*;
pub use loader::*;
pub use payload::*;
