use anyhow::Result;
use std::path::PathBuf;
use vectile::Config;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// validate and print this config file instead of the defaults
	#[arg(long, short)]
	config: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = match &arguments.config {
		Some(path) => Config::from_path(path)?,
		None => Config::default(),
	};
	print!("{}", config.to_yaml()?);
	Ok(())
}
