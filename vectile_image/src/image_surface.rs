//! A software [`Surface`] backed by an RGBA buffer.
//!
//! Raster tiles are resampled bilinearly and alpha blended. Vector features are
//! rasterised with `imageproc`: polygons filled, lines stroked, points drawn as discs.

use crate::{Surface, TileContent, TileDraw, TileRect, format::png::image2blob};
use anyhow::Result;
use image::{
	DynamicImage, Pixel, Rgba, RgbaImage,
	imageops::interpolate_bilinear,
};
use imageproc::{
	drawing::{Blend, draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut},
	point::Point,
};
use log::trace;
use vectile_core::Blob;
use vectile_geometry::{Feature, GeometryKind};

/// Colours used for vector features.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorStyle {
	pub fill: Rgba<u8>,
	pub stroke: Rgba<u8>,
	pub point: Rgba<u8>,
	pub point_radius: i32,
}

impl Default for VectorStyle {
	fn default() -> Self {
		VectorStyle {
			fill: Rgba([170, 200, 160, 255]),
			stroke: Rgba([90, 90, 90, 255]),
			point: Rgba([200, 60, 60, 255]),
			point_radius: 2,
		}
	}
}

pub struct ImageSurface {
	canvas: Blend<RgbaImage>,
	background: Rgba<u8>,
	style: VectorStyle,
}

impl ImageSurface {
	#[must_use]
	pub fn new(width: u32, height: u32) -> ImageSurface {
		let background = Rgba([0, 0, 0, 0]);
		ImageSurface {
			canvas: Blend(RgbaImage::from_pixel(width, height, background)),
			background,
			style: VectorStyle::default(),
		}
	}

	#[must_use]
	pub fn with_background(mut self, background: Rgba<u8>) -> ImageSurface {
		self.background = background;
		self.clear();
		self
	}

	#[must_use]
	pub fn with_style(mut self, style: VectorStyle) -> ImageSurface {
		self.style = style;
		self
	}

	pub fn image(&self) -> &RgbaImage {
		&self.canvas.0
	}

	pub fn into_image(self) -> RgbaImage {
		self.canvas.0
	}

	pub fn to_png(&self) -> Result<Blob> {
		image2blob(&DynamicImage::ImageRgba8(self.canvas.0.clone()))
	}

	/// Samples only the on-screen part of `rect`, so the cost is bounded by the surface size.
	fn draw_raster(&mut self, tile: &RgbaImage, rect: &TileRect, alpha: f32) {
		let (tile_width, tile_height) = tile.dimensions();
		if tile_width == 0 || tile_height == 0 {
			return;
		}
		let size = rect.size.round().max(1.0);
		let x0 = rect.x.round();
		let y0 = rect.y.round();

		let (width, height) = self.canvas.0.dimensions();
		let span = |start: f64, limit: u32| {
			let first = start.clamp(0.0, f64::from(limit)) as u32;
			let last = (start + size).clamp(0.0, f64::from(limit)) as u32;
			first..last
		};
		let to_source = |target: u32, start: f64, length: u32| {
			let position = (f64::from(target) + 0.5 - start) * f64::from(length) / size - 0.5;
			position.clamp(0.0, f64::from(length - 1)) as f32
		};

		for ty in span(y0, height) {
			let sy = to_source(ty, y0, tile_height);
			for tx in span(x0, width) {
				let sx = to_source(tx, x0, tile_width);
				let Some(mut pixel) = interpolate_bilinear(tile, sx, sy) else {
					continue;
				};
				pixel.0[3] = (f32::from(pixel.0[3]) * alpha).round() as u8;
				let target = self.canvas.0.get_pixel_mut(tx, ty);
				if pixel.0[3] == u8::MAX {
					*target = pixel;
				} else {
					target.blend(&pixel);
				}
			}
		}
	}

	fn draw_vector(&mut self, features: &[Feature], extent: u32, rect: &TileRect, alpha: f32) {
		let scale = rect.size / f64::from(extent.max(1));
		let project = |p: &[i64; 2]| -> (f32, f32) {
			(
				(rect.x + p[0] as f64 * scale) as f32,
				(rect.y + p[1] as f64 * scale) as f32,
			)
		};
		let fade = |mut color: Rgba<u8>| {
			color.0[3] = (f32::from(color.0[3]) * alpha).round() as u8;
			color
		};

		for feature in features {
			match feature.geom_type {
				GeometryKind::Polygon => {
					let mut points: Vec<Point<i32>> = feature
						.coords
						.iter()
						.map(|p| {
							let (x, y) = project(p);
							Point::new(x.round() as i32, y.round() as i32)
						})
						.collect();
					points.dedup();
					if points.len() > 1 && points.first() == points.last() {
						points.pop();
					}
					if points.len() >= 3 {
						draw_polygon_mut(&mut self.canvas, &points, fade(self.style.fill));
					}
				}
				GeometryKind::LineString => {
					let color = fade(self.style.stroke);
					for pair in feature.coords.windows(2) {
						draw_line_segment_mut(&mut self.canvas, project(&pair[0]), project(&pair[1]), color);
					}
				}
				GeometryKind::Point => {
					let color = fade(self.style.point);
					for p in &feature.coords {
						let (x, y) = project(p);
						draw_filled_circle_mut(
							&mut self.canvas,
							(x.round() as i32, y.round() as i32),
							self.style.point_radius,
							color,
						);
					}
				}
			}
		}
	}
}

impl Surface for ImageSurface {
	fn width(&self) -> u32 {
		self.canvas.0.width()
	}

	fn height(&self) -> u32 {
		self.canvas.0.height()
	}

	fn clear(&mut self) {
		let background = self.background;
		self.canvas.0.pixels_mut().for_each(|p| *p = background);
	}

	fn draw_tile(&mut self, draw: &TileDraw<'_>) -> Result<()> {
		if draw.alpha <= 0.0 || !draw.rect.intersects(self.width(), self.height()) {
			return Ok(());
		}
		let alpha = draw.alpha.min(1.0);
		trace!("drawing {:?} at {:?} with alpha {alpha:.3}", draw.coord, draw.rect);
		match draw.content {
			TileContent::Raster(image) => self.draw_raster(image, &draw.rect, alpha),
			TileContent::Vector { features, extent } => self.draw_vector(features, extent, &draw.rect, alpha),
		}
		Ok(())
	}
}
