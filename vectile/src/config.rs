//! Renderer configuration, read from YAML.
//!
//! Every key is optional. An empty document yields the defaults:
//!
//! ```yaml
//! tile_base_url: https://tiles.example.com/osm
//! tile_size: 256
//! min_zoom: 2
//! max_zoom: 18
//! max_cache_entries: 300
//! fetch_timeout_ms: 10000
//! cross_fade_threshold: 0.3
//! fade_in_ms: 250
//! preload_window: 0.1
//! background: "#f2efe9"
//! priority_locations:
//!   - { lat: 52.52, lon: 13.40, priority: 10 }
//! ```
//!
//! `tile_base_url` is either an `http(s)://` URL or a directory holding `{z}/{x}/{y}.{ext}`
//! files. Relative directories in a config file are resolved against the file's location.

use crate::{PriorityLocation, RenderOptions};
use anyhow::{Context, Result, ensure};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
	time::Duration,
};
use vectile_container::LoaderConfig;
use vectile_core::MAX_LEVEL;
use vectile_image::color::parse_hex_color;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub tile_base_url: String,
	pub tile_size: u32,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub max_cache_entries: usize,
	pub fetch_timeout_ms: u64,
	/// Fraction of a zoom step after which the next level fades in.
	pub cross_fade_threshold: f64,
	pub fade_in_ms: u64,
	/// How close to a level boundary the neighbouring level is preloaded.
	pub preload_window: f64,
	pub background: String,
	pub priority_locations: Vec<PriorityLocation>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			tile_base_url: String::new(),
			tile_size: 256,
			min_zoom: 2,
			max_zoom: 18,
			max_cache_entries: 300,
			fetch_timeout_ms: 10_000,
			cross_fade_threshold: 0.3,
			fade_in_ms: 250,
			preload_window: 0.1,
			background: "#f2efe9".to_string(),
			priority_locations: Vec::new(),
		}
	}
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_reader(reader).context("Failed to parse config")?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		if text.trim().is_empty() {
			return Ok(Config::default());
		}
		let config: Config = serde_yaml_ng::from_str(text).context("Failed to parse config")?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a config file and resolves a relative tile directory against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Failed to open config file {}", path.display()))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("Failed to read config file {}", path.display()))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if self.tile_base_url.is_empty() || self.tile_base_url.contains("://") {
			return;
		}
		let dir = Path::new(&self.tile_base_url);
		if dir.is_relative() {
			self.tile_base_url = base.join(dir).to_string_lossy().to_string();
		}
	}

	pub fn validate(&self) -> Result<()> {
		ensure!(
			self.max_zoom <= MAX_LEVEL,
			"max_zoom ({}) must be <= {MAX_LEVEL}",
			self.max_zoom
		);
		ensure!(
			self.min_zoom <= self.max_zoom,
			"min_zoom ({}) must be <= max_zoom ({})",
			self.min_zoom,
			self.max_zoom
		);
		ensure!(
			self.cross_fade_threshold > 0.0 && self.cross_fade_threshold < 1.0,
			"cross_fade_threshold ({}) must be between 0 and 1",
			self.cross_fade_threshold
		);
		ensure!(
			(0.0..1.0).contains(&self.preload_window),
			"preload_window ({}) must be within [0, 1)",
			self.preload_window
		);
		ensure!(self.max_cache_entries >= 1, "max_cache_entries must be at least 1");
		ensure!(self.tile_size > 0, "tile_size must be greater than 0");
		self.background_color()?;
		Ok(())
	}

	pub fn background_color(&self) -> Result<Rgba<u8>> {
		parse_hex_color(&self.background).context("Failed to parse background color")
	}

	pub fn to_yaml(&self) -> Result<String> {
		serde_yaml_ng::to_string(self).context("Failed to serialize config")
	}

	pub fn render_options(&self) -> RenderOptions {
		RenderOptions {
			tile_size: self.tile_size,
			min_zoom: self.min_zoom,
			max_zoom: self.max_zoom,
			cross_fade_threshold: self.cross_fade_threshold,
			fade_in: Duration::from_millis(self.fade_in_ms),
			preload_window: self.preload_window,
		}
	}

	pub fn loader_config(&self) -> LoaderConfig {
		LoaderConfig {
			min_zoom: self.min_zoom,
			max_zoom: self.max_zoom,
			fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
		}
	}
}
