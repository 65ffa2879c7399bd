//! Composites the tiles of up to two zoom levels onto a surface.
//!
//! A frame draws the base level `floor(zoom)` at full opacity. Once the fractional part of the
//! zoom passes `cross_fade_threshold`, the next level is drawn on top with an opacity that rises
//! linearly to 1 at the next integer zoom. Freshly loaded tiles additionally fade in over
//! `fade_in`. Missing tiles are requested and left blank; the frame never waits for them.
//!
//! Near a level boundary the neighbouring level is preloaded so that zooming does not start
//! from an empty screen.

use crate::{
	Config, PriorityLocation, PriorityLocations, ViewportState,
	projection::{ScreenTransform, lonlat_to_world},
};
use anyhow::{Context, Result, ensure};
use log::{debug, trace};
use std::{
	sync::Arc,
	time::{Duration, Instant},
};
use tokio::sync::broadcast;
use vectile_container::{
	FileTileFetcher, HttpTileFetcher, SharedTileCache, TileCache, TileEvent, TileFetcher, TileLoader,
};
use vectile_core::{MAX_LEVEL, TileCoord, TileKey};
use vectile_image::{Surface, TileDraw};

/// Tiles loaded beyond each viewport edge, so that panning finds them cached.
const LOAD_MARGIN: i64 = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
	pub tile_size: u32,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub cross_fade_threshold: f64,
	pub fade_in: Duration,
	pub preload_window: f64,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Config::default().render_options()
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnLevel {
	pub level: u8,
	pub alpha: f64,
}

/// What a frame did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
	/// Levels drawn, bottom first.
	pub levels: Vec<DrawnLevel>,
	/// Tiles drawn.
	pub drawn: usize,
	/// On-screen tiles that were not cached.
	pub missing: usize,
	/// Keys for which a new fetch was started, in request order.
	pub requested: Vec<TileKey>,
	/// Neighbouring levels whose visible tiles were preloaded.
	pub preloaded: Vec<u8>,
	/// Some drawn tile is still fading in.
	pub needs_redraw: bool,
}

pub struct Renderer {
	loader: TileLoader,
	options: RenderOptions,
	priorities: PriorityLocations,
}

impl Renderer {
	pub fn new(loader: TileLoader, options: RenderOptions) -> Renderer {
		Renderer {
			loader,
			options,
			priorities: PriorityLocations::new(),
		}
	}

	/// Builds cache, fetcher and loader from `config`. Must be called inside a tokio runtime.
	pub fn from_config(config: &Config) -> Result<Renderer> {
		config.validate()?;
		let fetcher = fetcher_for(&config.tile_base_url)?;
		let cache = TileCache::new_shared(config.max_cache_entries);
		let loader = TileLoader::new(cache, fetcher, config.loader_config())?;
		let mut renderer = Renderer::new(loader, config.render_options());
		for location in &config.priority_locations {
			renderer.add_priority_location(*location);
		}
		Ok(renderer)
	}

	pub fn loader(&self) -> &TileLoader {
		&self.loader
	}

	pub fn cache(&self) -> &SharedTileCache {
		self.loader.cache()
	}

	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	pub fn subscribe(&self) -> broadcast::Receiver<TileEvent> {
		self.loader.subscribe()
	}

	pub fn add_priority_location(&mut self, location: PriorityLocation) {
		self.priorities.push(location);
	}

	pub fn clear_priority_locations(&mut self) {
		self.priorities.clear();
	}

	pub fn render_frame(&self, surface: &mut dyn Surface, viewport: &ViewportState) -> Result<FrameReport> {
		self.render_frame_at(surface, viewport, Instant::now())
	}

	/// Renders one frame as of `now`, which drives the fade-in of fresh tiles.
	pub fn render_frame_at(
		&self,
		surface: &mut dyn Surface,
		viewport: &ViewportState,
		now: Instant,
	) -> Result<FrameReport> {
		ensure!(
			viewport.zoom.is_finite() && viewport.zoom >= 0.0,
			"zoom ({}) must be a finite number >= 0",
			viewport.zoom
		);
		let (base, fraction) = self.base_level(viewport.zoom);
		let threshold = self.options.cross_fade_threshold;
		let max_zoom = self.max_zoom();
		let mut report = FrameReport::default();

		surface.clear();

		let mut levels = vec![DrawnLevel { level: base, alpha: 1.0 }];
		if fraction > threshold && base < max_zoom {
			levels.push(DrawnLevel {
				level: base + 1,
				alpha: (fraction - threshold) / (1.0 - threshold),
			});
		}
		for level in &levels {
			self
				.draw_level(surface, viewport, *level, now, &mut report)
				.with_context(|| format!("Failed to draw level {}", level.level))?;
		}
		let cross_fading = levels.len() > 1;
		report.levels = levels;

		let window = self.options.preload_window;
		if !cross_fading && fraction >= threshold - window && base < max_zoom {
			self.preload(viewport, base + 1, &mut report);
		}
		if fraction <= window && base > self.options.min_zoom {
			self.preload(viewport, base - 1, &mut report);
		}

		trace!(
			"frame at zoom {:.3}: {} drawn, {} missing, {} requested",
			viewport.zoom,
			report.drawn,
			report.missing,
			report.requested.len()
		);
		Ok(report)
	}

	/// Tiles of `level` that intersect the viewport.
	pub fn visible_tiles(&self, viewport: &ViewportState, level: u8) -> Vec<TileCoord> {
		self.tile_span(viewport, level, 0)
	}

	/// Visible tiles of `level` plus the surrounding load margin.
	pub fn loading_tiles(&self, viewport: &ViewportState, level: u8) -> Vec<TileCoord> {
		self.tile_span(viewport, level, LOAD_MARGIN)
	}

	fn max_zoom(&self) -> u8 {
		self.options.max_zoom.min(MAX_LEVEL)
	}

	/// `floor(zoom)` clamped into the zoom range, and how far `zoom` lies above that level in
	/// `[0, 1]`. Below the range the fraction is 0, above it 1.
	fn base_level(&self, zoom: f64) -> (u8, f64) {
		let min = f64::from(self.options.min_zoom.min(self.max_zoom()));
		let base = zoom.floor().clamp(min, f64::from(self.max_zoom()));
		(base as u8, (zoom - base).clamp(0.0, 1.0))
	}

	fn tile_span(&self, viewport: &ViewportState, level: u8, margin: i64) -> Vec<TileCoord> {
		let transform = ScreenTransform::new(viewport, level, self.options.tile_size);
		let tile_size = f64::from(self.options.tile_size);
		let [left, top] = transform.to_world([0.0, 0.0]);
		let [right, bottom] = transform.to_world([f64::from(viewport.width), f64::from(viewport.height)]);
		let max = TileCoord::grid_size(level) as i64 - 1;
		let range = |low: f64, high: f64| {
			let first = ((low / tile_size).floor() as i64 - margin).clamp(0, max);
			let last = ((high / tile_size).ceil() as i64 - 1 + margin).clamp(0, max);
			first..=last
		};

		let mut coords = Vec::new();
		for y in range(top, bottom) {
			for x in range(left, right) {
				coords.push(TileCoord {
					level,
					x: x as u32,
					y: y as u32,
				});
			}
		}
		coords
	}

	fn draw_level(
		&self,
		surface: &mut dyn Surface,
		viewport: &ViewportState,
		drawn: DrawnLevel,
		now: Instant,
		report: &mut FrameReport,
	) -> Result<()> {
		let transform = ScreenTransform::new(viewport, drawn.level, self.options.tile_size);
		let (width, height) = (surface.width(), surface.height());

		for coord in self.loading_tiles(viewport, drawn.level) {
			let key = TileKey::from_coord(viewport.layer, coord);
			let rect = transform.tile_rect(&coord);
			let on_screen = rect.intersects(width, height);

			let entry = if on_screen {
				self.cache().lock().use_entry(&key, now).cloned()
			} else if self.cache().lock().has(&key) {
				continue;
			} else {
				None
			};

			let Some(entry) = entry else {
				if self.loader.request(key) {
					report.requested.push(key);
				}
				if on_screen {
					report.missing += 1;
				}
				continue;
			};

			let Some(content) = entry.payload.as_content() else {
				continue;
			};
			let fade = self.fade_in(entry.load_time, now);
			if fade < 1.0 {
				report.needs_redraw = true;
			}
			surface.draw_tile(&TileDraw {
				coord,
				rect,
				alpha: (drawn.alpha * fade) as f32,
				content,
			})?;
			report.drawn += 1;
		}
		Ok(())
	}

	fn fade_in(&self, load_time: Instant, now: Instant) -> f64 {
		if self.options.fade_in.is_zero() {
			return 1.0;
		}
		let elapsed = now.saturating_duration_since(load_time);
		(elapsed.as_secs_f64() / self.options.fade_in.as_secs_f64()).clamp(0.0, 1.0)
	}

	fn preload(&self, viewport: &ViewportState, level: u8, report: &mut FrameReport) {
		let mut coords = self.visible_tiles(viewport, level);
		let [cx, cy] = lonlat_to_world(viewport.center.lon(), viewport.center.lat(), level, self.options.tile_size);
		let tile_size = f64::from(self.options.tile_size);
		self
			.priorities
			.sort_for_preload(&mut coords, [cx / tile_size, cy / tile_size]);

		debug!("preloading {} tiles of level {level}", coords.len());
		for coord in coords {
			let key = TileKey::from_coord(viewport.layer, coord);
			if self.loader.request(key) {
				report.requested.push(key);
			}
		}
		report.preloaded.push(level);
	}
}

/// An `http(s)://` URL is fetched over the network, anything else is read as a tile directory.
fn fetcher_for(base_url: &str) -> Result<Arc<dyn TileFetcher>> {
	ensure!(!base_url.is_empty(), "tile_base_url must be set");
	if base_url.starts_with("http://") || base_url.starts_with("https://") {
		return Ok(Arc::new(HttpTileFetcher::new(base_url)?));
	}
	let dir = base_url.strip_prefix("file://").unwrap_or(base_url);
	Ok(Arc::new(FileTileFetcher::new(dir)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use vectile_container::{FetchError, LoaderConfig, MockTileFetcher, TilePayload};
	use vectile_core::{GeoCenter, LayerKind};
	use vectile_geometry::{Feature, GeometryKind};
	use vectile_image::RecordingSurface;

	const THRESHOLD: f64 = 0.3;

	fn options() -> RenderOptions {
		RenderOptions {
			tile_size: 256,
			min_zoom: 2,
			max_zoom: 6,
			cross_fade_threshold: THRESHOLD,
			fade_in: Duration::from_millis(100),
			preload_window: 0.1,
		}
	}

	fn renderer() -> (Renderer, Arc<MockTileFetcher>) {
		let options = options();
		let fetcher = Arc::new(MockTileFetcher::new().with_fallback(Err(FetchError::Status(404))));
		let config = LoaderConfig {
			min_zoom: options.min_zoom,
			max_zoom: options.max_zoom,
			fetch_timeout: Duration::from_secs(1),
		};
		let loader = TileLoader::new(TileCache::new_shared(10_000), fetcher.clone(), config).unwrap();
		(Renderer::new(loader, options), fetcher)
	}

	fn viewport(zoom: f64) -> ViewportState {
		ViewportState::new(GeoCenter(10.0, 20.0), zoom, LayerKind::Vector, 512, 384).unwrap()
	}

	fn square() -> TilePayload {
		let feature = Feature::new(GeometryKind::Polygon, vec![[0, 0], [4096, 0], [4096, 4096]]);
		TilePayload::Vector {
			features: Arc::new(vec![feature]),
			extent: 4096,
		}
	}

	/// Caches every tile a frame would touch at `level`.
	fn fill(renderer: &Renderer, viewport: &ViewportState, level: u8, payload: &TilePayload, at: Instant) {
		let mut cache = renderer.cache().lock();
		for coord in renderer.loading_tiles(viewport, level) {
			cache.set(TileKey::from_coord(viewport.layer, coord), payload.clone(), at);
		}
	}

	fn settled(loaded: Instant) -> Instant {
		loaded + Duration::from_secs(1)
	}

	#[rstest]
	#[case(4.0 + THRESHOLD - 1e-6, vec![4])]
	#[case(4.0 + THRESHOLD + 1e-6, vec![4, 5])]
	#[tokio::test]
	async fn cross_fade_starts_after_threshold(#[case] zoom: f64, #[case] expected: Vec<u8>) {
		let (renderer, _) = renderer();
		let viewport = viewport(zoom);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &square(), loaded);
		fill(&renderer, &viewport, 5, &square(), loaded);

		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame_at(&mut surface, &viewport, settled(loaded)).unwrap();
		let levels: Vec<u8> = report.levels.iter().map(|l| l.level).collect();
		assert_eq!(levels, expected);
		assert_eq!(surface.levels(), expected);
		assert_eq!(surface.clears, 1);
	}

	#[tokio::test]
	async fn overlay_alpha_rises_linearly() {
		let (renderer, _) = renderer();
		let viewport = viewport(4.65);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &square(), loaded);
		fill(&renderer, &viewport, 5, &square(), loaded);

		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame_at(&mut surface, &viewport, settled(loaded)).unwrap();
		assert_relative_eq!(report.levels[1].alpha, 0.5, epsilon = 1e-9);
		assert!(surface.draws_at(4).iter().all(|d| d.alpha == 1.0));
		assert!(surface.draws_at(5).iter().all(|d| (d.alpha - 0.5).abs() < 1e-6));
	}

	#[tokio::test]
	async fn draws_only_visible_tiles() {
		let (renderer, _) = renderer();
		let viewport = viewport(4.0);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &square(), loaded);
		fill(&renderer, &viewport, 3, &square(), loaded);

		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame_at(&mut surface, &viewport, settled(loaded)).unwrap();
		let visible = renderer.visible_tiles(&viewport, 4);
		assert!(renderer.loading_tiles(&viewport, 4).len() > visible.len());
		assert_eq!(report.drawn, visible.len());
		assert_eq!(report.missing, 0);
		assert!(report.requested.is_empty());
		assert!(surface.draws.iter().all(|d| d.rect.intersects(512, 384)));
		assert!(surface.draws.iter().all(|d| visible.contains(&d.coord)));
	}

	#[tokio::test]
	async fn missing_tiles_are_requested_not_awaited() {
		let (renderer, fetcher) = renderer();
		let viewport = viewport(4.0);
		let mut surface = RecordingSurface::new(512, 384);

		let report = renderer.render_frame(&mut surface, &viewport).unwrap();
		assert_eq!(report.drawn, 0);
		assert_eq!(report.missing, renderer.visible_tiles(&viewport, 4).len());
		assert_eq!(report.preloaded, vec![3]);
		let expected = renderer.loading_tiles(&viewport, 4).len() + renderer.visible_tiles(&viewport, 3).len();
		assert_eq!(report.requested.len(), expected);
		assert!(report.requested.iter().all(|key| key.level() == 3 || key.level() == 4));

		// a second frame attaches to the fetches in flight
		let again = renderer.render_frame(&mut surface, &viewport).unwrap();
		assert!(again.requested.len() < expected);

		tokio::time::sleep(Duration::from_millis(50)).await;
		assert!(fetcher.calls() >= expected);
		assert!(renderer.cache().lock().is_empty());
	}

	#[rstest]
	#[case(9.7)]
	#[case(6.95)]
	#[case(0.0)]
	#[case(1.5)]
	#[tokio::test]
	async fn levels_outside_the_zoom_range_are_never_fetched(#[case] zoom: f64) {
		let (renderer, fetcher) = renderer();
		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame(&mut surface, &viewport(zoom)).unwrap();
		assert!(report.levels.iter().all(|l| (2..=6).contains(&l.level)));
		assert!(report.preloaded.iter().all(|level| (2..=6).contains(level)));

		tokio::time::sleep(Duration::from_millis(50)).await;
		assert!(!fetcher.requested().is_empty());
		assert!(fetcher.requested().iter().all(|key| (2..=6).contains(&key.level())));
	}

	#[rstest]
	#[case(1.5, 2)]
	#[case(1.95, 2)]
	#[case(7.05, 6)]
	#[case(12.0, 6)]
	#[tokio::test]
	async fn clamped_zoom_draws_a_single_level(#[case] zoom: f64, #[case] level: u8) {
		let (renderer, _) = renderer();
		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame(&mut surface, &viewport(zoom)).unwrap();
		assert_eq!(report.levels, vec![DrawnLevel { level, alpha: 1.0 }]);
		assert_eq!(report.preloaded, Vec::<u8>::new());
	}

	#[rstest]
	#[case(4.25, vec![5])]
	#[case(4.15, vec![])]
	#[case(4.05, vec![3])]
	#[case(4.5, vec![])]
	#[case(2.05, vec![])]
	#[tokio::test]
	async fn preloads_near_level_boundaries(#[case] zoom: f64, #[case] expected: Vec<u8>) {
		let (renderer, _) = renderer();
		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame(&mut surface, &viewport(zoom)).unwrap();
		assert_eq!(report.preloaded, expected);
	}

	#[tokio::test]
	async fn preload_starts_with_priority_locations() {
		let (mut renderer, _) = renderer();
		let viewport = viewport(4.25);
		fill(&renderer, &viewport, 4, &square(), Instant::now());

		let visible = renderer.visible_tiles(&viewport, 5);
		let far = *visible.last().unwrap();
		let [lon, lat] = TileCoord::new(6, far.x * 2 + 1, far.y * 2 + 1).unwrap().as_geo();
		renderer.add_priority_location(PriorityLocation::new(lat, lon, 1));

		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame(&mut surface, &viewport).unwrap();
		assert_eq!(report.requested.len(), visible.len());
		assert_eq!(report.requested[0].coord, far);

		renderer.clear_priority_locations();
		renderer.loader().cancel_all();
		let report = renderer.render_frame(&mut surface, &viewport).unwrap();
		assert_ne!(report.requested[0].coord, far);
	}

	#[tokio::test]
	async fn fresh_tiles_fade_in() {
		let (renderer, _) = renderer();
		let viewport = viewport(4.0);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &square(), loaded);
		fill(&renderer, &viewport, 3, &square(), loaded);
		let mut surface = RecordingSurface::new(512, 384);

		let report = renderer
			.render_frame_at(&mut surface, &viewport, loaded + Duration::from_millis(50))
			.unwrap();
		assert!(report.needs_redraw);
		assert!(surface.draws.iter().all(|d| (d.alpha - 0.5).abs() < 1e-3));

		let report = renderer
			.render_frame_at(&mut surface, &viewport, loaded + Duration::from_millis(200))
			.unwrap();
		assert!(!report.needs_redraw);
		assert!(surface.draws.iter().all(|d| d.alpha == 1.0));
	}

	#[tokio::test]
	async fn empty_tiles_draw_nothing() {
		let (renderer, _) = renderer();
		let viewport = viewport(4.0);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &TilePayload::Empty, loaded);
		fill(&renderer, &viewport, 3, &TilePayload::Empty, loaded);

		let mut surface = RecordingSurface::new(512, 384);
		let report = renderer.render_frame_at(&mut surface, &viewport, settled(loaded)).unwrap();
		assert_eq!(report.drawn, 0);
		assert_eq!(report.missing, 0);
		assert!(surface.draws.is_empty());
	}

	#[tokio::test]
	async fn drawing_marks_tiles_as_used() {
		let (renderer, _) = renderer();
		let viewport = viewport(4.0);
		let loaded = Instant::now();
		fill(&renderer, &viewport, 4, &square(), loaded);
		let now = settled(loaded);

		let mut surface = RecordingSurface::new(512, 384);
		renderer.render_frame_at(&mut surface, &viewport, now).unwrap();
		let key = TileKey::from_coord(LayerKind::Vector, renderer.visible_tiles(&viewport, 4)[0]);
		assert_eq!(renderer.cache().lock().get(&key).unwrap().last_used, now);
	}

	#[test]
	fn file_and_http_fetchers() {
		assert!(fetcher_for("").is_err());
		assert_eq!(fetcher_for("https://tiles.example.com").unwrap().name(), "https://tiles.example.com");
		assert_eq!(fetcher_for("file:///srv/tiles").unwrap().name(), "/srv/tiles");
		assert_eq!(fetcher_for("tiles").unwrap().name(), "tiles");
	}
}
