use super::TileFetcher;
use crate::FetchError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
	collections::HashMap,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};
use vectile_core::{Blob, TileKey};

/// A scripted fetcher for tests. Counts every call and remembers which keys were requested.
///
/// Keys without a scripted response answer with the fallback, `Status(404)` unless changed.
#[derive(Debug)]
pub struct MockTileFetcher {
	responses: Mutex<HashMap<TileKey, Result<Blob, FetchError>>>,
	fallback: Result<Blob, FetchError>,
	delay: Option<Duration>,
	calls: AtomicUsize,
	requested: Mutex<Vec<TileKey>>,
}

impl MockTileFetcher {
	pub fn new() -> MockTileFetcher {
		MockTileFetcher {
			responses: Mutex::new(HashMap::new()),
			fallback: Err(FetchError::Status(404)),
			delay: None,
			calls: AtomicUsize::new(0),
			requested: Mutex::new(Vec::new()),
		}
	}

	pub fn with_fallback(mut self, response: Result<Blob, FetchError>) -> Self {
		self.fallback = response;
		self
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn with_response(self, key: TileKey, response: Result<Blob, FetchError>) -> Self {
		self.set_response(key, response);
		self
	}

	pub fn set_response(&self, key: TileKey, response: Result<Blob, FetchError>) {
		self.responses.lock().insert(key, response);
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Requested keys in call order.
	pub fn requested(&self) -> Vec<TileKey> {
		self.requested.lock().clone()
	}
}

impl Default for MockTileFetcher {
	fn default() -> Self {
		MockTileFetcher::new()
	}
}

#[async_trait]
impl TileFetcher for MockTileFetcher {
	fn name(&self) -> &str {
		"mock"
	}

	async fn fetch(&self, key: &TileKey) -> Result<Blob, FetchError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.requested.lock().push(*key);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		let scripted = self.responses.lock().get(key).cloned();
		scripted.unwrap_or_else(|| self.fallback.clone())
	}
}
