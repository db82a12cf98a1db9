use std::io::{self, Write};
use std::path::Path;

use nbtdoc::nbt::{DecodeOptions, NbtFile, Result, Tag};
use serde::Serialize;
use tracing::debug;

/// Open, decompress, and decode a file in one step.
pub(crate) fn open_root(path: &Path, options: &DecodeOptions) -> Result<(NbtFile, Tag)> {
	let file = NbtFile::open(path)?;
	let root = file.decode(options)?;
	debug!(path = %path.display(), compression = file.compression.as_str(), "decoded root compound");
	Ok((file, root))
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(value: &T) -> Result<()> {
	write_json(io::stdout().lock(), value)
}

/// Write a value as pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write, T: Serialize>(mut out: W, value: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
	writeln!(out, "{text}")?;
	out.flush()?;
	Ok(())
}

/// Render root names, showing the empty name explicitly.
pub(crate) fn display_name(name: &str) -> String {
	if name.is_empty() { "\"\"".to_owned() } else { name.to_owned() }
}
