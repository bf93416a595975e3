#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "animxref", about = "Scene model animation survey tools")]
struct Cli {
	/// Log skipped objects, sections, and files.
	#[arg(long, short, global = true)]
	verbose: bool,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode one container and print its animation size tables.
	Container(cmd::container::Args),
	/// Print object catalog records.
	Catalog(cmd::catalog::Args),
	/// Print the placement set of one map file.
	Placements(cmd::placements::Args),
	/// Cross-reference containers, catalog, and maps.
	Survey(cmd::survey::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: bool) {
	let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
		.init();
}

fn run(command: Commands) -> animxref::asset::Result<()> {
	match command {
		Commands::Container(args) => cmd::container::run(args),
		Commands::Catalog(args) => cmd::catalog::run(args),
		Commands::Placements(args) => cmd::placements::run(args),
		Commands::Survey(args) => cmd::survey::run(args),
	}
}
