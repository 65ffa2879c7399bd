//! Fetch, decode and cache tiles with at most one in-flight fetch per key.
//!
//! [`TileLoader::ensure`] hands out a [`Shared`] future. A cached tile resolves immediately, a
//! pending one attaches to the fetch already running, anything else spawns exactly one tokio task.
//! The task applies the fetch timeout, decodes the bytes, stores the payload and broadcasts a
//! [`TileEvent`]. Failures never produce a cache entry.
//!
//! Locks are always taken in the order `pending`, then `cache`, and never across an `.await`.

use super::TileEvent;
use crate::{FetchError, SharedTileCache, TileFetcher, TilePayload, decode_payload};
use anyhow::{Context, Result};
use futures::{
	FutureExt,
	future::{self, BoxFuture, Shared},
};
use log::{debug, trace, warn};
use parking_lot::Mutex;
use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::{Duration, Instant},
};
use tokio::{
	runtime::Handle,
	sync::broadcast,
	task::AbortHandle,
};
use vectile_core::TileKey;

const EVENT_CAPACITY: usize = 256;

pub type TileFuture = Shared<BoxFuture<'static, Result<TilePayload, FetchError>>>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderConfig {
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub fetch_timeout: Duration,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		LoaderConfig {
			min_zoom: 2,
			max_zoom: 18,
			fetch_timeout: Duration::from_secs(10),
		}
	}
}

struct Pending {
	future: TileFuture,
	abort: AbortHandle,
	generation: u64,
}

type PendingMap = Arc<Mutex<HashMap<TileKey, Pending>>>;

pub struct TileLoader {
	cache: SharedTileCache,
	fetcher: Arc<dyn TileFetcher>,
	config: LoaderConfig,
	pending: PendingMap,
	events: broadcast::Sender<TileEvent>,
	generation: AtomicU64,
	runtime: Handle,
}

impl TileLoader {
	/// Creates a loader that spawns its fetches on the current tokio runtime.
	pub fn new(cache: SharedTileCache, fetcher: Arc<dyn TileFetcher>, config: LoaderConfig) -> Result<TileLoader> {
		let runtime = Handle::try_current().context("Failed to find a tokio runtime for the tile loader")?;
		Ok(TileLoader::with_runtime(cache, fetcher, config, runtime))
	}

	pub fn with_runtime(
		cache: SharedTileCache,
		fetcher: Arc<dyn TileFetcher>,
		config: LoaderConfig,
		runtime: Handle,
	) -> TileLoader {
		let (events, _) = broadcast::channel(EVENT_CAPACITY);
		TileLoader {
			cache,
			fetcher,
			config,
			pending: Arc::new(Mutex::new(HashMap::new())),
			events,
			generation: AtomicU64::new(0),
			runtime,
		}
	}

	pub fn cache(&self) -> &SharedTileCache {
		&self.cache
	}

	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}

	pub fn subscribe(&self) -> broadcast::Receiver<TileEvent> {
		self.events.subscribe()
	}

	/// Returns a future that resolves once `key` is cached, or with the reason it could not be.
	pub fn ensure(&self, key: TileKey) -> TileFuture {
		self.start(key).0
	}

	/// Starts loading `key` without waiting for it. Returns `true` if a new fetch was spawned.
	pub fn request(&self, key: TileKey) -> bool {
		self.start(key).1
	}

	pub fn is_pending(&self, key: &TileKey) -> bool {
		self.pending.lock().contains_key(key)
	}

	pub fn pending_count(&self) -> usize {
		self.pending.lock().len()
	}

	/// Aborts the in-flight fetch of `key`. Attached futures resolve with [`FetchError::Cancelled`].
	pub fn cancel(&self, key: &TileKey) -> bool {
		let removed = self.pending.lock().remove(key);
		match removed {
			Some(pending) => {
				debug!("cancelled fetch of {key}");
				pending.abort.abort();
				true
			}
			None => false,
		}
	}

	pub fn cancel_all(&self) -> usize {
		let drained: Vec<Pending> = self.pending.lock().drain().map(|(_, pending)| pending).collect();
		for pending in &drained {
			pending.abort.abort();
		}
		if !drained.is_empty() {
			debug!("cancelled {} pending fetches", drained.len());
		}
		drained.len()
	}

	/// Cancels any fetch of `key` and drops it from the cache.
	pub fn invalidate(&self, key: &TileKey) {
		let mut pending = self.pending.lock();
		if let Some(entry) = pending.remove(key) {
			entry.abort.abort();
		}
		self.cache.lock().delete(key);
	}

	fn check_level(&self, key: &TileKey) -> Result<(), FetchError> {
		let level = key.level();
		if level < self.config.min_zoom || level > self.config.max_zoom {
			return Err(FetchError::OutOfRangeZoom {
				level,
				min: self.config.min_zoom,
				max: self.config.max_zoom,
			});
		}
		Ok(())
	}

	fn start(&self, key: TileKey) -> (TileFuture, bool) {
		if let Err(error) = self.check_level(&key) {
			trace!("not fetching {key}: {error}");
			return (ready(Err(error)), false);
		}

		let mut pending = self.pending.lock();
		if let Some(payload) = self.cache.lock().payload(&key) {
			return (ready(Ok(payload)), false);
		}
		if let Some(entry) = pending.get(&key) {
			return (entry.future.clone(), false);
		}

		let generation = self.generation.fetch_add(1, Ordering::Relaxed);
		let task = self.runtime.spawn(load(LoadJob {
			key,
			generation,
			fetcher: Arc::clone(&self.fetcher),
			cache: Arc::clone(&self.cache),
			pending: Arc::clone(&self.pending),
			events: self.events.clone(),
			timeout: self.config.fetch_timeout,
		}));
		let abort = task.abort_handle();
		let future: TileFuture = async move {
			match task.await {
				Ok(result) => result,
				Err(err) if err.is_cancelled() => Err(FetchError::Cancelled),
				Err(err) => Err(FetchError::Network(format!("fetch task failed: {err}"))),
			}
		}
		.boxed()
		.shared();

		pending.insert(
			key,
			Pending {
				future: future.clone(),
				abort,
				generation,
			},
		);
		(future, true)
	}
}

impl Drop for TileLoader {
	fn drop(&mut self) {
		self.cancel_all();
	}
}

fn ready(result: Result<TilePayload, FetchError>) -> TileFuture {
	future::ready(result).boxed().shared()
}

struct LoadJob {
	key: TileKey,
	generation: u64,
	fetcher: Arc<dyn TileFetcher>,
	cache: SharedTileCache,
	pending: PendingMap,
	events: broadcast::Sender<TileEvent>,
	timeout: Duration,
}

async fn load(job: LoadJob) -> Result<TilePayload, FetchError> {
	let key = job.key;
	debug!("fetching {key} from {}", job.fetcher.name());

	let result = match tokio::time::timeout(job.timeout, job.fetcher.fetch(&key)).await {
		Ok(Ok(blob)) => decode_payload(key.layer, &blob),
		Ok(Err(error)) => Err(error),
		Err(_) => Err(FetchError::Timeout(job.timeout.as_millis() as u64)),
	};

	{
		let mut pending = job.pending.lock();
		let current = pending.get(&key).is_some_and(|entry| entry.generation == job.generation);
		if current {
			pending.remove(&key);
			if let Ok(payload) = &result {
				job.cache.lock().set(key, payload.clone(), Instant::now());
			}
		}
	}

	let event = match &result {
		Ok(_) => TileEvent::Loaded(key),
		Err(error) => {
			warn!("failed to load tile {key}: {error}");
			TileEvent::Failed {
				key,
				error: error.clone(),
			}
		}
	};
	// nobody listening is fine
	let _ = job.events.send(event);
	result
}
