//! vectile: decode, cache and render slippy-map tiles.
//!
//! The [`Renderer`] composites up to two adjacent zoom levels of cached tiles onto a
//! [`Surface`](vectile_image::Surface), requesting missing tiles through a
//! [`TileLoader`](vectile_container::TileLoader) and preloading the neighbouring level while
//! the fractional zoom approaches it.
//!
//! ```no_run
//! use vectile::{Config, Renderer, ViewportState};
//! use vectile_core::{GeoCenter, LayerKind};
//! use vectile_image::ImageSurface;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_string("tile_base_url: https://tiles.example.com")?;
//!     let renderer = Renderer::from_config(&config)?;
//!     let viewport = ViewportState::new(GeoCenter(13.4, 52.5), 11.6, LayerKind::Vector, 512, 512)?;
//!     let mut surface = ImageSurface::new(512, 512);
//!     let report = renderer.render_frame(&mut surface, &viewport)?;
//!     println!("{} tiles drawn, {} missing", report.drawn, report.missing);
//!     Ok(())
//! }
//! ```

pub mod config;
mod priority;
pub mod projection;
mod renderer;
mod viewport;

pub use config::Config;
pub use priority::{PriorityLocation, PriorityLocations};
pub use renderer::{DrawnLevel, FrameReport, RenderOptions, Renderer};
pub use viewport::ViewportState;
