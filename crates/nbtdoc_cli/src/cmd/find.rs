use std::path::PathBuf;

use nbtdoc::nbt::{DecodeOptions, NbtError, Result, find_all, find_tag};

use crate::cmd::print::{PrintOptions, print_tag, tag_to_json};
use crate::cmd::util::{emit_json, open_root};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	pub name: String,
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub json: bool,
}

/// Search the decoded tree for tags with a given name.
pub fn run(args: Args) -> Result<()> {
	let Args { path, name, all, json } = args;

	let (_, root) = open_root(&path, &DecodeOptions::default())?;
	let hits = if all {
		find_all(&root, &name)?
	} else {
		find_tag(&root, &name)?.into_iter().collect()
	};

	if hits.is_empty() {
		return Err(NbtError::TagNotFound { name });
	}

	if json {
		if all {
			let items: Vec<_> = hits.into_iter().map(tag_to_json).collect();
			return emit_json(&items);
		}
		return emit_json(&tag_to_json(hits[0]));
	}

	for hit in hits {
		print_tag(hit, PrintOptions::compact())?;
	}

	Ok(())
}
