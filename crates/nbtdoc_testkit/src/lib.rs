//! Shared test helpers for workspace crates.

use std::io::Write;
use std::path::{Path, PathBuf};

use nbtdoc::nbt::{Compound, ListValue, NbtString, Tag, TagType, Value};
use proptest::prelude::*;
use tempfile::NamedTempFile;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Encode a root tag with its name, the way a `.dat` file stores it.
pub fn encode_root(root: &Tag) -> Vec<u8> {
	let mut out = Vec::new();
	encode_tag(root, &mut out);
	out
}

/// Append one named tag (type id, name, payload) to `out`.
pub fn encode_tag(tag: &Tag, out: &mut Vec<u8>) {
	out.push(tag.tag_type().id());
	let name = tag.name().map(NbtString::as_bytes).unwrap_or_default();
	write_string(name, out);
	encode_payload(tag.value(), out);
}

fn encode_payload(value: &Value, out: &mut Vec<u8>) {
	match value {
		Value::Byte(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
		Value::ByteArray(items) => {
			write_len(items.len(), out);
			out.extend(items.iter().flat_map(|v| v.to_be_bytes()));
		}
		Value::String(text) => write_string(text.as_bytes(), out),
		Value::List(list) => {
			out.push(list.element_type().id());
			write_len(list.len(), out);
			for element in list {
				encode_payload(element.value(), out);
			}
		}
		Value::Compound(compound) => {
			for child in compound {
				encode_tag(child, out);
			}
			out.push(TagType::End.id());
		}
		Value::IntArray(items) => {
			write_len(items.len(), out);
			out.extend(items.iter().flat_map(|v| v.to_be_bytes()));
		}
		Value::LongArray(items) => {
			write_len(items.len(), out);
			out.extend(items.iter().flat_map(|v| v.to_be_bytes()));
		}
	}
}

fn write_string(bytes: &[u8], out: &mut Vec<u8>) {
	let len = u16::try_from(bytes.len()).expect("string fits u16 length prefix");
	out.extend_from_slice(&len.to_be_bytes());
	out.extend_from_slice(bytes);
}

fn write_len(len: usize, out: &mut Vec<u8>) {
	let len = i32::try_from(len).expect("count fits i32 length prefix");
	out.extend_from_slice(&len.to_be_bytes());
}

/// Compress `bytes` as a gzip member.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
	encoder.write_all(bytes).expect("gzip write");
	encoder.finish().expect("gzip finish")
}

/// Compress `bytes` as a zlib stream.
pub fn zlib(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
	encoder.write_all(bytes).expect("zlib write");
	encoder.finish().expect("zlib finish")
}

/// Compress `bytes` as a zstd frame.
pub fn zstd_compress(bytes: &[u8]) -> Vec<u8> {
	zstd::stream::encode_all(bytes, 0).expect("zstd encode")
}

/// Write `bytes` to a fresh temp file that lives as long as the handle.
pub fn write_temp(bytes: &[u8]) -> NamedTempFile {
	let mut file = NamedTempFile::new().expect("temp file");
	file.write_all(bytes).expect("temp write");
	file.flush().expect("temp flush");
	file
}

/// Name helper for hand-built trees.
pub fn name(value: &str) -> Option<NbtString> {
	Some(NbtString::from(value))
}

/// Small `level.dat`-shaped tree used by CLI and file tests.
///
/// ```text
/// "" {
///   Data {
///     LevelName: "Test World"
///     SpawnX: 12
///     Player { Inventory: [ { id: "minecraft:stone", Count: 64b } ] }
///     DataVersion: 3465
///   }
///   DataVersion: 1
/// }
/// ```
pub fn sample_level() -> Tag {
	let mut slot = Compound::new();
	slot.push(Tag::string(name("id"), b"minecraft:stone").expect("string")).expect("push");
	slot.push(Tag::byte(name("Count"), 64)).expect("push");
	let inventory = ListValue::new(TagType::Compound, vec![Tag::compound(None, slot)]).expect("list");

	let mut player = Compound::new();
	player.push(Tag::list(name("Inventory"), inventory)).expect("push");

	let mut data = Compound::new();
	data.push(Tag::string(name("LevelName"), b"Test World").expect("string")).expect("push");
	data.push(Tag::int(name("SpawnX"), 12)).expect("push");
	data.push(Tag::compound(name("Player"), player)).expect("push");
	data.push(Tag::int(name("DataVersion"), 3465)).expect("push");

	let mut root = Compound::new();
	root.push(Tag::compound(name("Data"), data)).expect("push");
	root.push(Tag::int(name("DataVersion"), 1)).expect("push");
	Tag::compound(name(""), root)
}

fn arb_text() -> impl Strategy<Value = NbtString> {
	"[a-zA-Z0-9_:\u{e9}\u{1F600}-\u{1F64F}]{0,12}".prop_map(|text| NbtString::from(text.as_str()))
}

/// Floats stay finite so whole trees compare with `==`; NaN payloads and
/// infinities are covered by bit-level float tests.
fn arb_leaf() -> impl Strategy<Value = Value> {
	prop_oneof![
		any::<i8>().prop_map(Value::Byte),
		any::<i16>().prop_map(Value::Short),
		any::<i32>().prop_map(Value::Int),
		any::<i64>().prop_map(Value::Long),
		(-1.0e9_f32..1.0e9_f32).prop_map(Value::Float),
		(-1.0e18_f64..1.0e18_f64).prop_map(Value::Double),
		arb_text().prop_map(Value::String),
		prop::collection::vec(any::<i8>(), 0..16).prop_map(Value::ByteArray),
		prop::collection::vec(any::<i32>(), 0..8).prop_map(Value::IntArray),
		prop::collection::vec(any::<i64>(), 0..8).prop_map(Value::LongArray),
	]
}

fn arb_value() -> impl Strategy<Value = Value> {
	arb_leaf().prop_recursive(4, 48, 6, |inner| {
		prop_oneof![
			prop::collection::vec((arb_text(), inner.clone()), 0..6).prop_map(|children| Value::Compound(compound_of(children))),
			prop::collection::vec(inner, 0..6).prop_map(|values| Value::List(list_of(values))),
		]
	})
}

fn compound_of(children: Vec<(NbtString, Value)>) -> Compound {
	let mut out = Compound::new();
	for (child_name, value) in children {
		out.push(Tag::new(Some(child_name), value)).expect("compound push");
	}
	out
}

/// Keep only the values sharing the first value's type, so the list is homogeneous.
fn list_of(values: Vec<Value>) -> ListValue {
	let element_type = values.first().map_or(TagType::End, Value::tag_type);
	let elements = values
		.into_iter()
		.filter(|value| value.tag_type() == element_type)
		.map(Tag::unnamed)
		.collect();
	ListValue::new(element_type, elements).expect("homogeneous list")
}

/// Random well-formed root compound trees.
pub fn arb_root() -> impl Strategy<Value = Tag> {
	(arb_text(), prop::collection::vec((arb_text(), arb_value()), 0..8))
		.prop_map(|(root_name, children)| Tag::compound(Some(root_name), compound_of(children)))
}
