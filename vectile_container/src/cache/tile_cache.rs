//! A bounded, recency-ordered cache of decoded tiles.
//!
//! [`TileCache`] wraps an [`LruCache`] keyed by [`TileKey`]. Reading with [`TileCache::get`] never
//! changes recency; only [`TileCache::touch`] and [`TileCache::use_entry`] mark a tile as used.
//! Inserting beyond capacity evicts exactly one least recently used entry in the same call.
//!
//! A renderer owns its cache through a [`SharedTileCache`] handle; the lock is only held for
//! the duration of a single operation.

use crate::TilePayload;
use log::trace;
use lru::LruCache;
use parking_lot::Mutex;
use std::{fmt, num::NonZeroUsize, sync::Arc, time::Instant};
use vectile_core::TileKey;

pub type SharedTileCache = Arc<Mutex<TileCache>>;

#[derive(Clone, Debug)]
pub struct CacheEntry {
	pub payload: TilePayload,
	/// When the fetch completed, used for fade-in.
	pub load_time: Instant,
	/// When a frame last drew this tile.
	pub last_used: Instant,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
	pub len: usize,
	pub capacity: usize,
	pub hits: u64,
	pub misses: u64,
	pub evictions: u64,
}

pub struct TileCache {
	entries: LruCache<TileKey, CacheEntry>,
	hits: u64,
	misses: u64,
	evictions: u64,
}

impl TileCache {
	/// Creates a cache holding at most `capacity` tiles. A capacity of 0 is raised to 1.
	pub fn new(capacity: usize) -> TileCache {
		let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		TileCache {
			entries: LruCache::new(capacity),
			hits: 0,
			misses: 0,
			evictions: 0,
		}
	}

	pub fn new_shared(capacity: usize) -> SharedTileCache {
		Arc::new(Mutex::new(TileCache::new(capacity)))
	}

	/// Looks up an entry without changing its recency.
	pub fn get(&mut self, key: &TileKey) -> Option<&CacheEntry> {
		if self.entries.contains(key) {
			self.hits += 1;
		} else {
			self.misses += 1;
		}
		self.entries.peek(key)
	}

	/// Clones the payload of an entry without touching recency or statistics.
	pub fn payload(&self, key: &TileKey) -> Option<TilePayload> {
		self.entries.peek(key).map(|entry| entry.payload.clone())
	}

	/// Marks an entry as used at `now`. Returns `false` if the key is not cached.
	pub fn touch(&mut self, key: &TileKey, now: Instant) -> bool {
		match self.entries.get_mut(key) {
			Some(entry) => {
				entry.last_used = now;
				true
			}
			None => false,
		}
	}

	/// [`get`](Self::get) followed by [`touch`](Self::touch).
	pub fn use_entry(&mut self, key: &TileKey, now: Instant) -> Option<&CacheEntry> {
		if !self.touch(key, now) {
			self.misses += 1;
			return None;
		}
		self.hits += 1;
		self.entries.peek(key)
	}

	/// Inserts or replaces an entry, loaded and used at `now`.
	///
	/// Returns the key that had to be evicted to make room, if any.
	pub fn set(&mut self, key: TileKey, payload: TilePayload, now: Instant) -> Option<TileKey> {
		let entry = CacheEntry {
			payload,
			load_time: now,
			last_used: now,
		};
		match self.entries.push(key, entry) {
			Some((old_key, _)) if old_key != key => {
				self.evictions += 1;
				trace!("evicted {old_key} to make room for {key}");
				Some(old_key)
			}
			_ => None,
		}
	}

	pub fn delete(&mut self, key: &TileKey) -> Option<CacheEntry> {
		self.entries.pop(key)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn has(&self, key: &TileKey) -> bool {
		self.entries.contains(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.entries.cap().get()
	}

	pub fn stats(&self) -> CacheStats {
		CacheStats {
			len: self.len(),
			capacity: self.capacity(),
			hits: self.hits,
			misses: self.misses,
			evictions: self.evictions,
		}
	}

	/// Cached keys, most recently used first.
	#[cfg(test)]
	fn keys_by_recency(&self) -> Vec<TileKey> {
		self.entries.iter().map(|(key, _)| *key).collect()
	}
}

impl fmt::Debug for TileCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TileCache")
			.field("len", &self.len())
			.field("capacity", &self.capacity())
			.finish()
	}
}
