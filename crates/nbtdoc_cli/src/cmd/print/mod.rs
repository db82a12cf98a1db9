use std::fmt;
use std::io::{self, Write};

use nbtdoc::nbt::{ListValue, Result, Tag, Value};
use serde_json::json;

/// Output truncation limits for rendered trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum nesting printed before containers are summarized.
	pub max_depth: u32,
	/// Maximum number of elements printed for arrays and lists.
	pub max_array_items: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			max_array_items: 16,
			max_string_len: 200,
		}
	}
}

impl PrintOptions {
	/// Preset for one-line-per-tag summaries such as search hits.
	pub fn compact() -> Self {
		Self {
			max_depth: 4,
			max_array_items: 8,
			max_string_len: 80,
		}
	}
}

/// Print one tag and its subtree to stdout.
pub fn print_tag(tag: &Tag, options: PrintOptions) -> Result<()> {
	write!(io::stdout().lock(), "{}", Rendered { tag, options })?;
	Ok(())
}

/// Render one tag and its subtree as indented text.
pub fn render_tag(tag: &Tag, options: PrintOptions) -> String {
	Rendered { tag, options }.to_string()
}

struct Rendered<'a> {
	tag: &'a Tag,
	options: PrintOptions,
}

impl fmt::Display for Rendered<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_tag(f, self.tag, 0, 0, self.options)
	}
}

fn write_tag(out: &mut fmt::Formatter<'_>, tag: &Tag, indent: usize, depth: u32, options: PrintOptions) -> fmt::Result {
	let pad = " ".repeat(indent);
	let label = match tag.name() {
		Some(name) if !name.is_empty() => format!("{}: ", name.to_str()),
		_ => String::new(),
	};

	match tag.value() {
		Value::Compound(item) => {
			write!(out, "{pad}{label}compound ({} entries)", item.len())?;
			if depth >= options.max_depth {
				return writeln!(out, " {{ ... }}");
			}
			writeln!(out, " {{")?;
			for child in item {
				write_tag(out, child, indent + 2, depth + 1, options)?;
			}
			writeln!(out, "{pad}}}")
		}
		Value::List(item) => {
			write!(out, "{pad}{label}list<{}> ({} items)", item.element_type(), item.len())?;
			if depth >= options.max_depth {
				return writeln!(out, " [ ... ]");
			}
			writeln!(out, " [")?;
			for element in item.iter().take(options.max_array_items) {
				write_tag(out, element, indent + 2, depth + 1, options)?;
			}
			if item.len() > options.max_array_items {
				writeln!(out, "{pad}  ... {} more", item.len() - options.max_array_items)?;
			}
			writeln!(out, "{pad}]")
		}
		other => writeln!(out, "{pad}{label}{} = {}", other.tag_type(), format_scalar(other, options)),
	}
}

/// Format a non-container value on one line.
pub fn format_scalar(value: &Value, options: PrintOptions) -> String {
	match value {
		Value::Byte(v) => v.to_string(),
		Value::Short(v) => v.to_string(),
		Value::Int(v) => v.to_string(),
		Value::Long(v) => v.to_string(),
		Value::Float(v) => v.to_string(),
		Value::Double(v) => v.to_string(),
		Value::String(v) => format!("{:?}", truncate(&v.to_str(), options.max_string_len)),
		Value::ByteArray(items) => format_items(items, options),
		Value::IntArray(items) => format_items(items, options),
		Value::LongArray(items) => format_items(items, options),
		Value::List(item) => format!("[{} x {}]", item.len(), item.element_type()),
		Value::Compound(item) => format!("{{{} entries}}", item.len()),
	}
}

fn format_items<T: ToString>(items: &[T], options: PrintOptions) -> String {
	let mut shown: Vec<String> = items.iter().take(options.max_array_items).map(ToString::to_string).collect();
	if items.len() > options.max_array_items {
		shown.push(format!("... {} more", items.len() - options.max_array_items));
	}
	format!("[{}]", shown.join(", "))
}

fn truncate(input: &str, max_chars: usize) -> String {
	if input.chars().count() <= max_chars {
		return input.to_owned();
	}
	let mut out: String = input.chars().take(max_chars).collect();
	out.push_str("...");
	out
}

/// Convert a tag to JSON, keeping names, types, and child order.
pub fn tag_to_json(tag: &Tag) -> serde_json::Value {
	let mut out = json!({
		"name": tag.name().map(|name| name.to_str().into_owned()),
		"type": tag.tag_type().as_str(),
		"value": value_to_json(tag.value()),
	});
	if let Value::List(item) = tag.value() {
		out["element_type"] = json!(item.element_type().as_str());
	}
	out
}

/// Convert a payload to JSON. Non-finite floats become `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
	match value {
		Value::Byte(v) => json!(v),
		Value::Short(v) => json!(v),
		Value::Int(v) => json!(v),
		Value::Long(v) => json!(v),
		Value::Float(v) => json!(v),
		Value::Double(v) => json!(v),
		Value::ByteArray(items) => json!(items),
		Value::String(v) => json!(v.to_str()),
		Value::List(item) => list_to_json(item),
		Value::Compound(item) => serde_json::Value::Array(item.iter().map(tag_to_json).collect()),
		Value::IntArray(items) => json!(items),
		Value::LongArray(items) => json!(items),
	}
}

fn list_to_json(list: &ListValue) -> serde_json::Value {
	serde_json::Value::Array(list.iter().map(|element| value_to_json(element.value())).collect())
}
