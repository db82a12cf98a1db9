use std::io::{self, Write};
use std::path::PathBuf;

use nbtdoc::nbt::{DecodeObserver, DecodeOptions, NbtFile, NbtString, Result, Tag, TagType, decode_with_observer};

use crate::cmd::print::{PrintOptions, format_scalar, tag_to_json};
use crate::cmd::util::{emit_json, open_root};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "max-depth", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DEPTH_LIMIT)))]
	pub max_depth: Option<u32>,
	#[arg(long = "allow-trailing")]
	pub allow_trailing: bool,
}

/// Highest `--max-depth` accepted; JSON rendering recurses once per level.
pub const MAX_DEPTH_LIMIT: u32 = 2048;

/// Print every tag as it is decoded, or the decoded tree as JSON.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		max_depth,
		allow_trailing,
	} = args;

	let mut options = DecodeOptions::default();
	if let Some(max_depth) = max_depth {
		options.max_depth = max_depth;
	}
	options.allow_trailing_bytes = allow_trailing;

	if json {
		let (_, root) = open_root(&path, &options)?;
		return emit_json(&tag_to_json(&root));
	}

	let file = NbtFile::open(&path)?;
	let stdout = io::stdout();
	let mut printer = TracePrinter::new(stdout.lock(), PrintOptions::default());
	let decoded = decode_with_observer(file.bytes(), &options, &mut printer);
	let written = printer.finish();
	decoded?;
	written?;
	Ok(())
}

/// Decode observer that writes one indented line per tag.
///
/// Lines are written as the decoder reaches each tag, so a failing decode
/// still shows everything read before the error. After the first write error
/// the printer goes quiet and [`TracePrinter::finish`] reports it.
pub struct TracePrinter<W: Write> {
	out: W,
	options: PrintOptions,
	error: Option<io::Error>,
}

impl<W: Write> TracePrinter<W> {
	/// Create a printer writing to `out`.
	pub fn new(out: W, options: PrintOptions) -> Self {
		Self { out, options, error: None }
	}

	/// Flush and return the writer, or the first write error.
	pub fn finish(mut self) -> io::Result<W> {
		if let Some(err) = self.error.take() {
			return Err(err);
		}
		self.out.flush()?;
		Ok(self.out)
	}

	fn line(&mut self, depth: usize, text: &str) {
		if self.error.is_some() {
			return;
		}
		if let Err(err) = writeln!(self.out, "{}{text}", "  ".repeat(depth)) {
			self.error = Some(err);
		}
	}
}

impl<W: Write> DecodeObserver for TracePrinter<W> {
	fn on_open(&mut self, offset: usize, depth: usize, name: Option<&NbtString>, tag_type: TagType, len: Option<usize>) {
		let label = tag_label(tag_type);
		let name = name_suffix(name);
		let text = match len {
			Some(len) => format!("[{label}]{name} ({len} items) @{offset}"),
			None => format!("[{label}]{name} @{offset}"),
		};
		self.line(depth, &text);
	}

	fn on_leaf(&mut self, offset: usize, depth: usize, tag: &Tag) {
		let label = tag_label(tag.tag_type());
		let name = name_suffix(tag.name());
		let value = format_scalar(tag.value(), self.options);
		self.line(depth, &format!("[{label}]{name} = {value} @{offset}"));
	}

	fn on_close(&mut self, depth: usize, tag_type: TagType) {
		if tag_type == TagType::Compound {
			self.line(depth, "[END]");
		}
	}
}

fn tag_label(tag_type: TagType) -> String {
	tag_type.as_str().to_ascii_uppercase()
}

fn name_suffix(name: Option<&NbtString>) -> String {
	match name {
		Some(name) if !name.is_empty() => format!(" {}", name.to_str()),
		_ => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use std::io::{self, Write};

	use nbtdoc::nbt::{DecodeOptions, decode_with_observer};
	use nbtdoc_testkit::{encode_root, sample_level, write_temp};

	use super::{MAX_DEPTH_LIMIT, TracePrinter};
	use crate::cmd::print::PrintOptions;
	use crate::cmd::test_support::{run_nbtdoc, run_nbtdoc_json};

	#[test]
	fn trace_lines_follow_nesting() {
		let bytes = encode_root(&sample_level());
		let mut printer = TracePrinter::new(Vec::new(), PrintOptions::default());
		decode_with_observer(&bytes, &DecodeOptions::default(), &mut printer).expect("decodes");

		let text = String::from_utf8(printer.finish().expect("writes succeed")).expect("utf8 output");
		let lines: Vec<_> = text.lines().collect();
		assert_eq!(lines[0], "[COMPOUND] @0");
		assert_eq!(lines[1], "  [COMPOUND] Data @3");
		assert!(lines[2].starts_with("    [STRING] LevelName = \"Test World\" @"));
		assert!(lines.iter().any(|line| line.starts_with("      [LIST] Inventory (1 items) @")));
		assert!(lines.iter().any(|line| line.starts_with("          [BYTE] Count = 64 @")));
		assert_eq!(lines.last().copied(), Some("[END]"));
		assert_eq!(lines.iter().filter(|line| line.trim() == "[END]").count(), 4);
	}

	#[test]
	fn dump_reports_errors_after_partial_trace() {
		let mut bytes = encode_root(&sample_level());
		bytes.truncate(bytes.len() - 4);
		let file = write_temp(&bytes);
		let path = file.path().to_string_lossy().into_owned();
		let output = run_nbtdoc(&["dump", &path]);

		assert_eq!(output.status.code(), Some(1));
		assert!(String::from_utf8_lossy(&output.stdout).starts_with("[COMPOUND] @0"));
		assert!(String::from_utf8_lossy(&output.stderr).contains("error: "));
	}

	#[test]
	fn dump_json_emits_tree() {
		let file = write_temp(&encode_root(&sample_level()));
		let path = file.path().to_string_lossy().into_owned();
		let json = run_nbtdoc_json(&["dump", &path, "--json"]);

		assert_eq!(json["type"], "compound");
		assert_eq!(json["value"][0]["name"], "Data");
		assert_eq!(json["value"][1]["value"], 1);
	}

	#[test]
	fn dump_honours_max_depth_flag() {
		let file = write_temp(&encode_root(&sample_level()));
		let path = file.path().to_string_lossy().into_owned();
		let output = run_nbtdoc(&["dump", &path, "--max-depth", "2"]);

		assert_eq!(output.status.code(), Some(1));
		assert!(String::from_utf8_lossy(&output.stderr).contains("depth"));
	}

	/// Accepts `budget` bytes, then fails every write like a closed pipe.
	struct ClosedAfter {
		budget: usize,
		writes: usize,
	}

	impl Write for ClosedAfter {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			self.writes += 1;
			if self.budget == 0 {
				return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
			}
			let n = buf.len().min(self.budget);
			self.budget -= n;
			Ok(n)
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn write_failures_surface_from_finish() {
		let bytes = encode_root(&sample_level());
		let mut writer = ClosedAfter { budget: 10, writes: 0 };
		let mut printer = TracePrinter::new(&mut writer, PrintOptions::default());
		decode_with_observer(&bytes, &DecodeOptions::default(), &mut printer).expect("decode is unaffected");

		let Err(err) = printer.finish() else {
			panic!("closed pipe should be reported");
		};
		assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
		// One short write fills the budget, the next fails, then the printer stops.
		assert_eq!(writer.writes, 2);
	}

	#[test]
	fn max_depth_flag_is_bounded() {
		let file = write_temp(&encode_root(&sample_level()));
		let path = file.path().to_string_lossy().into_owned();

		let too_deep = (MAX_DEPTH_LIMIT + 1).to_string();
		let output = run_nbtdoc(&["dump", &path, "--json", "--max-depth", &too_deep]);
		assert_eq!(output.status.code(), Some(2));
		assert!(String::from_utf8_lossy(&output.stderr).contains("--max-depth"));

		let output = run_nbtdoc(&["dump", &path, "--max-depth", "0"]);
		assert_eq!(output.status.code(), Some(2));

		let limit = MAX_DEPTH_LIMIT.to_string();
		let json = run_nbtdoc_json(&["dump", &path, "--json", "--max-depth", &limit]);
		assert_eq!(json["type"], "compound");
	}
}
