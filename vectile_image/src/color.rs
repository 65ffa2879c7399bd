//! Colour parsing for configuration values.

use anyhow::{Result, bail};
use image::Rgba;

/// Parses `RGB`, `RGBA`, `RRGGBB` or `RRGGBBAA` hex notation, with an optional leading `#`.
/// Colours without alpha are opaque.
///
/// ```
/// use vectile_image::color::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#F00").unwrap().0, [255, 0, 0, 255]);
/// assert_eq!(parse_hex_color("FF573380").unwrap().0, [255, 87, 51, 128]);
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Rgba<u8>> {
	let digits = hex.trim_start_matches('#');
	if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
		bail!("Invalid hex color '{hex}': not a hex number");
	}

	let expanded: String = match digits.len() {
		3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
		6 | 8 => digits.to_string(),
		_ => bail!("Invalid hex color '{hex}': expected 3, 4, 6, or 8 hex characters"),
	};

	let mut rgba = [255u8; 4];
	for (i, channel) in rgba.iter_mut().enumerate().take(expanded.len() / 2) {
		*channel = u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16)?;
	}
	Ok(Rgba(rgba))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("F00", [255, 0, 0, 255])]
	#[case("0F08", [0, 255, 0, 136])]
	#[case("FF5733", [255, 87, 51, 255])]
	#[case("#f8f4f0", [248, 244, 240, 255])]
	#[case("000000FF", [0, 0, 0, 255])]
	fn parses(#[case] hex: &str, #[case] expected: [u8; 4]) {
		assert_eq!(parse_hex_color(hex).unwrap().0, expected);
	}

	#[rstest]
	#[case("GG0000")]
	#[case("FF")]
	#[case("FFFFF")]
	#[case("FF5733FF0")]
	#[case("#ä12")]
	fn rejects(#[case] hex: &str) {
		assert!(parse_hex_color(hex).is_err());
	}
}
