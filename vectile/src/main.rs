mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Print the features of a vector tile
	Decode(tools::decode::Subcommand),

	/// Render a viewport into a PNG image
	Render(tools::render::Subcommand),

	/// Print the default configuration as YAML
	Config(tools::config::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Decode(arguments) => tools::decode::run(arguments),
		Commands::Render(arguments) => tools::render::run(arguments),
		Commands::Config(arguments) => tools::config::run(arguments),
	}
}
