//! Web Mercator, tile-local and screen coordinates.
//!
//! World pixels span `[0, 2^level · tile_size)` on both axes at a given level, with the origin
//! at the north-west corner. A [`ScreenTransform`] places one level's world pixels on the screen
//! so that the viewport center lands in the middle of the surface.

use crate::ViewportState;
use std::f64::consts::PI;
use vectile_core::TileCoord;
use vectile_image::TileRect;

/// Latitude at which the Web Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

pub fn world_size(level: u8, tile_size: u32) -> f64 {
	TileCoord::grid_size(level) as f64 * f64::from(tile_size)
}

/// Projects a geographic position to world pixels at `level`. Latitudes are clamped to
/// [`MAX_LATITUDE`].
pub fn lonlat_to_world(lon: f64, lat: f64, level: u8, tile_size: u32) -> [f64; 2] {
	let size = world_size(level, tile_size);
	let phi = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
	[
		(lon + 180.0) / 360.0 * size,
		(1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / PI) / 2.0 * size,
	]
}

/// Maps world pixels of one level to screen pixels: `screen = (world − origin) · scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTransform {
	origin: [f64; 2],
	scale: f64,
	tile_size: u32,
}

impl ScreenTransform {
	/// Transform for drawing `level` while the viewport shows its fractional zoom.
	/// The scale is `2^(zoom − level)`.
	pub fn new(viewport: &ViewportState, level: u8, tile_size: u32) -> ScreenTransform {
		let scale = 2f64.powf(viewport.zoom - f64::from(level));
		let [cx, cy] = lonlat_to_world(viewport.center.lon(), viewport.center.lat(), level, tile_size);
		ScreenTransform {
			origin: [
				cx - f64::from(viewport.width) / 2.0 / scale,
				cy - f64::from(viewport.height) / 2.0 / scale,
			],
			scale,
			tile_size,
		}
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn to_screen(&self, world: [f64; 2]) -> [f64; 2] {
		[
			(world[0] - self.origin[0]) * self.scale,
			(world[1] - self.origin[1]) * self.scale,
		]
	}

	pub fn to_world(&self, screen: [f64; 2]) -> [f64; 2] {
		[
			screen[0] / self.scale + self.origin[0],
			screen[1] / self.scale + self.origin[1],
		]
	}

	/// Screen rectangle covered by `coord`.
	pub fn tile_rect(&self, coord: &TileCoord) -> TileRect {
		let tile_size = f64::from(self.tile_size);
		let [x, y] = self.to_screen([f64::from(coord.x) * tile_size, f64::from(coord.y) * tile_size]);
		TileRect {
			x,
			y,
			size: tile_size * self.scale,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use vectile_core::{GeoCenter, LayerKind};

	#[test]
	fn projects_known_points() {
		let [x, y] = lonlat_to_world(0.0, 0.0, 0, 256);
		assert_relative_eq!(x, 128.0);
		assert_relative_eq!(y, 128.0, epsilon = 1e-9);

		let [x, y] = lonlat_to_world(-180.0, MAX_LATITUDE, 2, 256);
		assert_relative_eq!(x, 0.0);
		assert_relative_eq!(y, 0.0, epsilon = 1e-6);

		let [_, y] = lonlat_to_world(0.0, -90.0, 1, 256);
		assert_relative_eq!(y, 512.0, epsilon = 1e-6);
	}

	#[test]
	fn tile_corners_land_on_tile_boundaries() {
		let coord = TileCoord::new(10, 550, 335).unwrap();
		let [lon, lat] = coord.as_geo();
		let [x, y] = lonlat_to_world(lon, lat, 10, 512);
		assert_relative_eq!(x, 550.0 * 512.0, epsilon = 1e-6);
		assert_relative_eq!(y, 335.0 * 512.0, epsilon = 1e-6);
	}

	#[test]
	fn center_lands_in_the_middle() {
		let viewport = ViewportState::new(GeoCenter(0.0, 0.0), 2.5, LayerKind::Vector, 300, 200).unwrap();
		let transform = ScreenTransform::new(&viewport, 2, 256);
		assert_relative_eq!(transform.scale(), 2f64.sqrt());
		let [sx, sy] = transform.to_screen([512.0, 512.0]);
		assert_relative_eq!(sx, 150.0, epsilon = 1e-9);
		assert_relative_eq!(sy, 100.0, epsilon = 1e-9);
		let [wx, wy] = transform.to_world([sx, sy]);
		assert_relative_eq!(wx, 512.0, epsilon = 1e-9);
		assert_relative_eq!(wy, 512.0, epsilon = 1e-9);
	}

	#[test]
	fn tile_rects_scale_with_zoom() {
		let viewport = ViewportState::new(GeoCenter(0.0, 0.0), 3.0, LayerKind::Vector, 256, 256).unwrap();
		let transform = ScreenTransform::new(&viewport, 2, 256);
		let rect = transform.tile_rect(&TileCoord::new(2, 2, 2).unwrap());
		assert_relative_eq!(rect.size, 512.0);
		assert_relative_eq!(rect.x, 128.0, epsilon = 1e-9);
		assert_relative_eq!(rect.y, 128.0, epsilon = 1e-9);
	}
}
