use anyhow::{Context, Result};
use log::{debug, warn};
use std::{collections::HashSet, path::PathBuf, time::Duration};
use tokio::sync::broadcast::error::TryRecvError;
use vectile::{Config, Renderer, ViewportState};
use vectile_container::TileEvent;
use vectile_core::{GeoCenter, LayerKind, TileKey};
use vectile_image::ImageSurface;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// YAML config file, see `vectile config`
	#[arg(long, short)]
	config: PathBuf,

	/// latitude of the viewport center
	#[arg(long, allow_hyphen_values = true)]
	lat: f64,

	/// longitude of the viewport center
	#[arg(long, allow_hyphen_values = true)]
	lon: f64,

	/// fractional zoom, e.g. 11.6
	#[arg(long)]
	zoom: f64,

	/// tile layer to draw: vector or raster
	#[arg(long, default_value = "vector")]
	layer: LayerKind,

	#[arg(long, default_value_t = 512)]
	width: u32,

	#[arg(long, default_value_t = 512)]
	height: u32,

	/// output PNG file
	#[arg(long, short)]
	out: PathBuf,

	/// give up waiting for tiles after this many frames
	#[arg(long, default_value_t = 400)]
	max_frames: usize,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = Config::from_path(&arguments.config)?;
	let renderer = Renderer::from_config(&config)?;
	let viewport = ViewportState::new(
		GeoCenter(arguments.lon, arguments.lat),
		arguments.zoom,
		arguments.layer,
		arguments.width,
		arguments.height,
	)?;
	let mut surface = ImageSurface::new(viewport.width, viewport.height).with_background(config.background_color()?);
	let mut events = renderer.subscribe();
	let mut tiles = Outstanding::default();

	let mut settled = false;
	for frame in 0..arguments.max_frames {
		let report = renderer.render_frame(&mut surface, &viewport)?;
		tiles.add(&report.requested);
		let mut changed = false;
		loop {
			match events.try_recv() {
				Ok(event) => changed |= tiles.apply(&event),
				Err(TryRecvError::Lagged(_)) => {
					tiles.keys.retain(|key| renderer.loader().is_pending(key));
					changed = true;
				}
				Err(TryRecvError::Empty | TryRecvError::Closed) => break,
			}
		}

		if tiles.keys.is_empty() && !report.needs_redraw && !changed {
			debug!("settled after {} frames, {} tiles drawn", frame + 1, report.drawn);
			settled = true;
			break;
		}
		if let Ok(Ok(event)) = tokio::time::timeout(Duration::from_millis(50), events.recv()).await {
			tiles.apply(&event);
		}
	}
	if !settled {
		warn!(
			"{} tiles still loading after {} frames",
			tiles.keys.len(),
			arguments.max_frames
		);
	}
	renderer.loader().cancel_all();

	surface
		.to_png()?
		.save_to_file(&arguments.out)
		.with_context(|| format!("Failed to write {}", arguments.out.display()))?;
	Ok(())
}

/// Fetches started by the frame loop that have not reported back yet.
#[derive(Default)]
struct Outstanding {
	keys: HashSet<TileKey>,
	failed: HashSet<TileKey>,
}

impl Outstanding {
	fn add(&mut self, requested: &[TileKey]) {
		// tiles that already failed are requested again every frame
		let fresh = requested.iter().filter(|key| !self.failed.contains(*key));
		self.keys.extend(fresh.copied());
	}

	/// Returns `true` if a tile became drawable.
	fn apply(&mut self, event: &TileEvent) -> bool {
		match event {
			TileEvent::Loaded(key) => {
				self.keys.remove(key);
				true
			}
			TileEvent::Failed { key, .. } => {
				self.keys.remove(key);
				self.failed.insert(*key);
				false
			}
		}
	}
}
