#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "nbtdoc", about = "Minecraft NBT inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Summarize compression, root compound, and tag type counts.
	Info(cmd::info::Args),
	/// Print the decode trace of every tag, or the whole tree as JSON.
	Dump(cmd::dump::Args),
	/// Search for tags by name.
	Find(cmd::find::Args),
	/// Resolve a dotted tag path such as `Data.Player.Inventory[0]`.
	Get(cmd::get::Args),
}

fn main() {
	init_tracing();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> nbtdoc::nbt::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Dump(args) => cmd::dump::run(args),
		Commands::Find(args) => cmd::find::run(args),
		Commands::Get(args) => cmd::get::run(args),
	}
}

/// Log to stderr so command output on stdout stays machine readable.
fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
