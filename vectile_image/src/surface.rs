//! The drawing seam between the renderer and whatever displays its output.

use anyhow::Result;
use image::RgbaImage;
use vectile_core::TileCoord;
use vectile_geometry::Feature;

/// Screen placement of one tile: top-left corner and edge length, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRect {
	pub x: f64,
	pub y: f64,
	pub size: f64,
}

impl TileRect {
	/// True if any part of the rect lies inside a `width × height` surface.
	#[must_use]
	pub fn intersects(&self, width: u32, height: u32) -> bool {
		self.x < f64::from(width) && self.y < f64::from(height) && self.x + self.size > 0.0 && self.y + self.size > 0.0
	}
}

#[derive(Clone, Copy, Debug)]
pub enum TileContent<'a> {
	Raster(&'a RgbaImage),
	/// Features in tile-local coordinates, `extent` units per tile edge.
	Vector { features: &'a [Feature], extent: u32 },
}

/// One draw call: blend `content` into `rect` with opacity `alpha` in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct TileDraw<'a> {
	pub coord: TileCoord,
	pub rect: TileRect,
	pub alpha: f32,
	pub content: TileContent<'a>,
}

pub trait Surface {
	fn width(&self) -> u32;
	fn height(&self) -> u32;

	/// Resets the surface to its background before a new frame.
	fn clear(&mut self);

	fn draw_tile(&mut self, draw: &TileDraw<'_>) -> Result<()>;
}
