//! Fetches tiles from an XYZ tile server.
//!
//! Tiles are requested as `GET {base_url}/{z}/{x}/{y}.{ext}`. `204 No Content` and empty bodies
//! are empty tiles; any other non-2xx status is a [`FetchError::Status`].

use super::{TileFetcher, tile_path};
use crate::FetchError;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::trace;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use vectile_core::{Blob, TileKey};

#[derive(Debug)]
pub struct HttpTileFetcher {
	client: Client,
	base_url: String,
}

impl HttpTileFetcher {
	pub fn new(base_url: &str) -> Result<HttpTileFetcher> {
		let url = Url::parse(base_url).with_context(|| format!("Failed to parse tile base URL '{base_url}'"))?;
		match url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}' in '{url}', expected 'http' or 'https'"),
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.build()
			.context("Failed to build HTTP client")?;

		Ok(HttpTileFetcher {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	pub fn tile_url(&self, key: &TileKey) -> String {
		format!("{}/{}", self.base_url, tile_path(key))
	}
}

#[async_trait]
impl TileFetcher for HttpTileFetcher {
	fn name(&self) -> &str {
		&self.base_url
	}

	async fn fetch(&self, key: &TileKey) -> Result<Blob, FetchError> {
		let url = self.tile_url(key);
		trace!("GET {url}");

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;

		let status = response.status();
		if status == StatusCode::NO_CONTENT {
			return Ok(Blob::new_empty());
		}
		if !status.is_success() {
			return Err(FetchError::Status(status.as_u16()));
		}

		let bytes = response
			.bytes()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;
		Ok(Blob::from(&*bytes))
	}
}
