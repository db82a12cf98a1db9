use std::path::PathBuf;

use nbtdoc::nbt::{DecodeOptions, Resolved, Result, TagPath};
use serde_json::json;

use crate::cmd::print::{PrintOptions, print_tag, tag_to_json};
use crate::cmd::util::{emit_json, open_root};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	pub tag_path: String,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a dotted tag path and print the selected subtree or element.
pub fn run(args: Args) -> Result<()> {
	let Args { path, tag_path, json } = args;

	let tag_path = TagPath::parse(&tag_path)?;
	let (_, root) = open_root(&path, &DecodeOptions::default())?;
	let resolved = tag_path.resolve(&root)?;

	match (resolved, json) {
		(Resolved::Tag(tag), true) => emit_json(&tag_to_json(tag))?,
		(Resolved::Tag(tag), false) => print_tag(tag, PrintOptions::default())?,
		(Resolved::Byte(value), true) => emit_json(&json!(value))?,
		(Resolved::Int(value), true) => emit_json(&json!(value))?,
		(Resolved::Long(value), true) => emit_json(&json!(value))?,
		(Resolved::Byte(value), false) => println!("{value}"),
		(Resolved::Int(value), false) => println!("{value}"),
		(Resolved::Long(value), false) => println!("{value}"),
	}

	Ok(())
}
