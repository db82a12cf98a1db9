use std::fmt;

use crate::nbt::{NbtError, Result, Tag, TagType, Value};

/// One parsed operation in a tag path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select the first compound child with this name.
	Field(String),
	/// Select a list or array element by zero-based index.
	Index(usize),
}

impl fmt::Display for PathStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(name) => write!(f, ".{name}"),
			Self::Index(idx) => write!(f, "[{idx}]"),
		}
	}
}

/// Parsed tag path expression such as `Data.Player.Inventory[0].id`.
#[derive(Debug, Clone)]
pub struct TagPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

/// Element reached by resolving a [`TagPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
	/// A tag: compound child or list element.
	Tag(&'a Tag),
	/// One element of a byte array.
	Byte(i8),
	/// One element of an int array.
	Int(i32),
	/// One element of a long array.
	Long(i64),
}

impl TagPath {
	/// Parse dotted field syntax with optional `[index]` selectors.
	///
	/// Field names may contain any character except `.`, `[` and `]`.
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = || NbtError::InvalidTagPath { path: input.to_owned() };
		if input.is_empty() {
			return Err(invalid());
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut steps = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && !matches!(bytes[idx], b'.' | b'[' | b']') {
				idx += 1;
			}

			if idx == start {
				return Err(invalid());
			}

			steps.push(PathStep::Field(input[start..idx].to_owned()));

			while idx < bytes.len() && bytes[idx] == b'[' {
				idx += 1;
				let n_start = idx;
				while idx < bytes.len() && bytes[idx].is_ascii_digit() {
					idx += 1;
				}
				if idx == n_start || idx >= bytes.len() || bytes[idx] != b']' {
					return Err(invalid());
				}

				let number = input[n_start..idx].parse::<usize>().map_err(|_| invalid())?;
				steps.push(PathStep::Index(number));
				idx += 1;
			}

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return Err(invalid());
				}
				idx += 1;
				if idx >= bytes.len() {
					return Err(invalid());
				}
			}
		}

		Ok(Self { steps })
	}

	/// Walk the path from `root`, returning the selected element.
	pub fn resolve<'a>(&self, root: &'a Tag) -> Result<Resolved<'a>> {
		let mut current = Resolved::Tag(root);

		for step in &self.steps {
			let Resolved::Tag(tag) = current else {
				return Err(NbtError::PathTypeMismatch {
					step: step.to_string(),
					tag: scalar_type(current),
				});
			};

			current = match (step, tag.value()) {
				(PathStep::Field(field), Value::Compound(item)) => {
					Resolved::Tag(item.get(field).ok_or_else(|| NbtError::PathFieldMissing { field: field.clone() })?)
				}
				(PathStep::Index(index), Value::List(item)) => Resolved::Tag(item.elements().get(*index).ok_or(NbtError::PathIndexOutOfRange {
					index: *index,
					len: item.len(),
				})?),
				(PathStep::Index(index), Value::ByteArray(item)) => Resolved::Byte(element(item, *index)?),
				(PathStep::Index(index), Value::IntArray(item)) => Resolved::Int(element(item, *index)?),
				(PathStep::Index(index), Value::LongArray(item)) => Resolved::Long(element(item, *index)?),
				(step, _) => {
					return Err(NbtError::PathTypeMismatch {
						step: step.to_string(),
						tag: tag.tag_type(),
					});
				}
			};
		}

		Ok(current)
	}
}

impl fmt::Display for TagPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, step) in self.steps.iter().enumerate() {
			match step {
				PathStep::Field(name) if idx == 0 => f.write_str(name)?,
				other => write!(f, "{other}")?,
			}
		}
		Ok(())
	}
}

fn element<T: Copy>(items: &[T], index: usize) -> Result<T> {
	items
		.get(index)
		.copied()
		.ok_or(NbtError::PathIndexOutOfRange { index, len: items.len() })
}

fn scalar_type(resolved: Resolved<'_>) -> TagType {
	match resolved {
		Resolved::Tag(tag) => tag.tag_type(),
		Resolved::Byte(_) => TagType::Byte,
		Resolved::Int(_) => TagType::Int,
		Resolved::Long(_) => TagType::Long,
	}
}
