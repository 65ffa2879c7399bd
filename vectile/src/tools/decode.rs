use anyhow::{Context, Result};
use std::path::PathBuf;
use vectile_core::Blob;
use vectile_geometry::{decode_tile_layers, try_decode_layer};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// vector tile file, uncompressed (*.pbf, *.mvt)
	#[arg(required = true)]
	filename: PathBuf,

	/// list the features of every layer, not only the application layer
	#[arg(long, short)]
	all_layers: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let blob = Blob::load_from_file(&arguments.filename)
		.with_context(|| format!("Failed to read {}", arguments.filename.display()))?;
	log::debug!("decoding {} bytes from {}", blob.len(), arguments.filename.display());

	if arguments.all_layers {
		for (name, features) in decode_tile_layers(&blob)? {
			println!("layer '{name}': {} features", features.len());
			for feature in features {
				println!("  {feature}");
			}
		}
		return Ok(());
	}

	let layer = try_decode_layer(&blob)?;
	println!(
		"layer '{}' (extent {}): {} features",
		layer.name,
		layer.extent,
		layer.features.len()
	);
	for feature in &layer.features {
		println!("{feature}");
	}
	Ok(())
}
