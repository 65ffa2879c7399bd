use anyhow::{Result, anyhow, bail};
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::png, load_from_memory_with_format};
use vectile_core::Blob;

/// Encodes an 8-bit image as PNG. `speed` ranges from 0 (smallest) to 100 (fastest).
pub fn compress(image: &DynamicImage, speed: Option<u8>) -> Result<Blob> {
	if image.color().bytes_per_pixel() / image.color().channel_count() != 1 {
		bail!("png only supports 8-bit images");
	}

	let speed = speed.unwrap_or(10).clamp(0, 100);

	use png::{CompressionType, FilterType};
	let (compression_type, filter_type) = match speed {
		0..20 => (CompressionType::Best, FilterType::Adaptive),
		20..60 => (CompressionType::Default, FilterType::Adaptive),
		60..90 => (CompressionType::Fast, FilterType::Sub),
		_ => (CompressionType::Fast, FilterType::NoFilter),
	};

	let mut buffer: Vec<u8> = Vec::new();
	png::PngEncoder::new_with_quality(&mut buffer, compression_type, filter_type).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}

pub fn image2blob(image: &DynamicImage) -> Result<Blob> {
	compress(image, None)
}

pub fn blob2image(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Png).map_err(|e| anyhow!("Failed to decode PNG image: {e}"))
}
