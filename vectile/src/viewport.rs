use anyhow::{Result, ensure};
use vectile_core::{GeoCenter, LayerKind};

/// What the host currently shows: where, how far zoomed in, which layer and how large.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	pub center: GeoCenter,
	/// Fractional zoom, `>= 0`.
	pub zoom: f64,
	pub layer: LayerKind,
	pub width: u32,
	pub height: u32,
}

impl ViewportState {
	pub fn new(center: GeoCenter, zoom: f64, layer: LayerKind, width: u32, height: u32) -> Result<ViewportState> {
		center.check()?;
		ensure!(zoom.is_finite() && zoom >= 0.0, "zoom ({zoom}) must be a finite number >= 0");
		ensure!(width > 0 && height > 0, "viewport size ({width}x{height}) must not be empty");
		Ok(ViewportState {
			center,
			zoom,
			layer,
			width,
			height,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(0.0, 0.0, 3.5, 100, 100, true)]
	#[case(181.0, 0.0, 3.5, 100, 100, false)]
	#[case(0.0, 0.0, -0.1, 100, 100, false)]
	#[case(0.0, 0.0, f64::NAN, 100, 100, false)]
	#[case(0.0, 0.0, 3.0, 0, 100, false)]
	fn validates(
		#[case] lon: f64,
		#[case] lat: f64,
		#[case] zoom: f64,
		#[case] width: u32,
		#[case] height: u32,
		#[case] ok: bool,
	) {
		let result = ViewportState::new(GeoCenter(lon, lat), zoom, LayerKind::Vector, width, height);
		assert_eq!(result.is_ok(), ok);
	}
}
