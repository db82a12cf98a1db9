use std::path::PathBuf;

use nbtdoc::nbt::{DecodeOptions, Result, Tag, TagType, Value};
use serde::Serialize;

use crate::cmd::util::{display_name, emit_json, open_root};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	decompressed_bytes: usize,
	root_name: String,
	root_entries: usize,
	total_tags: usize,
	max_depth: usize,
	tag_counts: Vec<TypeCountJson>,
}

#[derive(Serialize)]
struct TypeCountJson {
	tag_type: &'static str,
	count: usize,
}

/// Print compression, root compound, and tag type statistics.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let (file, root) = open_root(&path, &DecodeOptions::default())?;
	let root_entries = root.as_compound()?.len();
	let stats = TreeStats::collect(&root);

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			compression: file.compression.as_str(),
			decompressed_bytes: file.bytes().len(),
			root_name: root.name_str().into_owned(),
			root_entries,
			total_tags: stats.total_tags,
			max_depth: stats.max_depth,
			tag_counts: stats
				.nonzero()
				.map(|(tag_type, count)| TypeCountJson {
					tag_type: tag_type.as_str(),
					count,
				})
				.collect(),
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("compression: {}", file.compression.as_str());
	println!("decompressed_bytes: {}", file.bytes().len());
	println!("root_name: {}", display_name(&root.name_str()));
	println!("root_entries: {root_entries}");
	println!("total_tags: {}", stats.total_tags);
	println!("max_depth: {}", stats.max_depth);

	println!("tag_counts:");
	for (tag_type, count) in stats.nonzero() {
		println!("  {tag_type}: {count}");
	}

	Ok(())
}

/// Whole-tree tag statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TreeStats {
	pub(crate) total_tags: usize,
	pub(crate) max_depth: usize,
	counts: [usize; TagType::ALL.len()],
}

impl TreeStats {
	/// Count every tag below and including `root`, without recursion.
	pub(crate) fn collect(root: &Tag) -> Self {
		let mut stats = Self {
			total_tags: 0,
			max_depth: 0,
			counts: [0; TagType::ALL.len()],
		};

		let mut stack = vec![(root, 0_usize)];
		while let Some((tag, depth)) = stack.pop() {
			stats.total_tags += 1;
			stats.max_depth = stats.max_depth.max(depth);
			stats.counts[usize::from(tag.tag_type().id())] += 1;

			match tag.value() {
				Value::Compound(item) => stack.extend(item.iter().map(|child| (child, depth + 1))),
				Value::List(item) => stack.extend(item.iter().map(|element| (element, depth + 1))),
				_ => {}
			}
		}

		stats
	}

	/// Number of tags of `tag_type`.
	pub(crate) fn count(&self, tag_type: TagType) -> usize {
		self.counts[usize::from(tag_type.id())]
	}

	/// Types with at least one tag, in wire id order.
	pub(crate) fn nonzero(&self) -> impl Iterator<Item = (TagType, usize)> + '_ {
		TagType::ALL
			.into_iter()
			.map(|tag_type| (tag_type, self.count(tag_type)))
			.filter(|(_, count)| *count > 0)
	}
}
