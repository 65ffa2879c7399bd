use crate::{Surface, TileContent, TileDraw, TileRect};
use anyhow::Result;
use vectile_core::TileCoord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedContent {
	Raster,
	Vector { features: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
	pub coord: TileCoord,
	pub rect: TileRect,
	pub alpha: f32,
	pub content: RecordedContent,
}

/// A [`Surface`] that records draw calls instead of producing pixels.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub width: u32,
	pub height: u32,
	pub draws: Vec<RecordedDraw>,
	pub clears: usize,
}

impl RecordingSurface {
	#[must_use]
	pub fn new(width: u32, height: u32) -> RecordingSurface {
		RecordingSurface {
			width,
			height,
			..Default::default()
		}
	}

	/// Draw calls for tiles of one zoom level.
	pub fn draws_at(&self, level: u8) -> Vec<&RecordedDraw> {
		self.draws.iter().filter(|d| d.coord.level == level).collect()
	}

	/// Distinct zoom levels drawn, in first-drawn order.
	pub fn levels(&self) -> Vec<u8> {
		let mut levels: Vec<u8> = Vec::new();
		for draw in &self.draws {
			if !levels.contains(&draw.coord.level) {
				levels.push(draw.coord.level);
			}
		}
		levels
	}
}

impl Surface for RecordingSurface {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}

	fn clear(&mut self) {
		self.draws.clear();
		self.clears += 1;
	}

	fn draw_tile(&mut self, draw: &TileDraw<'_>) -> Result<()> {
		self.draws.push(RecordedDraw {
			coord: draw.coord,
			rect: draw.rect,
			alpha: draw.alpha,
			content: match draw.content {
				TileContent::Raster(_) => RecordedContent::Raster,
				TileContent::Vector { features, .. } => RecordedContent::Vector {
					features: features.len(),
				},
			},
		});
		Ok(())
	}
}
