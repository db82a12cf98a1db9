use tracing::{debug, trace, warn};

use crate::nbt::bytes::Cursor;
use crate::nbt::{Compound, ListValue, NbtError, NbtString, Result, Tag, TagType, Value};

/// Runtime limits and behavior switches for NBT decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum number of simultaneously open compounds and lists.
	pub max_depth: u32,
	/// Ignore bytes that follow the closed root compound instead of failing.
	pub allow_trailing_bytes: bool,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 512,
			allow_trailing_bytes: false,
		}
	}
}

impl DecodeOptions {
	/// Preset that tolerates padding after the root compound.
	pub fn permissive() -> Self {
		Self {
			allow_trailing_bytes: true,
			..Self::default()
		}
	}
}

/// Receives decode progress, one call per tag.
///
/// `depth` is the number of compounds and lists enclosing the tag.
pub trait DecodeObserver {
	/// A compound or list was opened at `offset`. Lists report their declared length.
	fn on_open(&mut self, _offset: usize, _depth: usize, _name: Option<&NbtString>, _tag_type: TagType, _len: Option<usize>) {}

	/// A scalar, string, or array tag was decoded.
	fn on_leaf(&mut self, _offset: usize, _depth: usize, _tag: &Tag) {}

	/// The innermost open compound or list was closed.
	fn on_close(&mut self, _depth: usize, _tag_type: TagType) {}
}

impl DecodeObserver for () {}

/// Decode one root compound from an uncompressed buffer.
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<Tag> {
	decode_with_observer(bytes, options, &mut ())
}

/// Decode one root compound, reporting every tag to `observer`.
pub fn decode_with_observer<O: DecodeObserver>(bytes: &[u8], options: &DecodeOptions, observer: &mut O) -> Result<Tag> {
	let mut decoder = Decoder {
		cursor: Cursor::new(bytes),
		options,
		observer,
		frames: Vec::new(),
		root: None,
	};

	let result = decoder.run();
	result.map_err(|err| decoder.with_context(err))
}

enum Frame {
	Compound { name: Option<NbtString>, children: Compound },
	List { name: Option<NbtString>, list: ListValue, remaining: usize },
}

enum State {
	TopLevel,
	Done,
	InCompound,
	InList { element_type: TagType, remaining: usize },
}

struct Decoder<'a, O> {
	cursor: Cursor<'a>,
	options: &'a DecodeOptions,
	observer: &'a mut O,
	frames: Vec<Frame>,
	root: Option<Tag>,
}

impl<'a, O: DecodeObserver> Decoder<'a, O> {
	fn run(&mut self) -> Result<Tag> {
		loop {
			match self.state() {
				State::TopLevel => self.top_level()?,
				State::Done => return self.finish(),
				State::InCompound => self.compound_entry()?,
				State::InList { remaining: 0, .. } => self.close_list()?,
				State::InList { element_type, remaining } => {
					if let Some(Frame::List { remaining: slot, .. }) = self.frames.last_mut() {
						*slot = remaining - 1;
					}
					let at = self.cursor.pos();
					self.read_payload(at, element_type, None)?;
				}
			}
		}
	}

	fn state(&self) -> State {
		match self.frames.last() {
			None if self.root.is_some() => State::Done,
			None => State::TopLevel,
			Some(Frame::Compound { .. }) => State::InCompound,
			Some(Frame::List { list, remaining, .. }) => State::InList {
				element_type: list.element_type(),
				remaining: *remaining,
			},
		}
	}

	fn top_level(&mut self) -> Result<()> {
		let at = self.cursor.pos();
		let tag = self.read_tag_type()?;
		match tag {
			TagType::Compound => {
				let name = self.read_name()?;
				self.open_compound(at, Some(name))
			}
			TagType::End => Err(NbtError::UnmatchedEnd { at }),
			other => Err(NbtError::TagOutsideCompound { tag: other, at }),
		}
	}

	fn compound_entry(&mut self) -> Result<()> {
		if self.cursor.is_empty() {
			return Err(NbtError::UnclosedCompound {
				depth: self.frames.len(),
				at: self.cursor.pos(),
			});
		}

		let at = self.cursor.pos();
		let tag = self.read_tag_type()?;
		if tag == TagType::End {
			return self.close_compound();
		}

		let name = self.read_name()?;
		self.read_payload(at, tag, Some(name))
	}

	fn read_payload(&mut self, at: usize, tag: TagType, name: Option<NbtString>) -> Result<()> {
		let tag = match tag {
			TagType::End => return Err(NbtError::InvalidListType { at }),
			TagType::Byte => Tag::byte(name, self.cursor.read_i8()?),
			TagType::Short => Tag::short(name, self.cursor.read_i16()?),
			TagType::Int => Tag::int(name, self.cursor.read_i32()?),
			TagType::Long => Tag::long(name, self.cursor.read_i64()?),
			TagType::Float => Tag::float(name, self.cursor.read_f32()?),
			TagType::Double => Tag::double(name, self.cursor.read_f64()?),
			TagType::String => {
				let len = usize::from(self.cursor.read_u16()?);
				Tag::string(name, self.cursor.read_exact(len)?)?
			}
			TagType::ByteArray => {
				let raw = self.read_array_bytes(1)?;
				Tag::new(name, Value::ByteArray(collect_elems(raw, 1, |chunk| i8::from_be_bytes([chunk[0]]))?))
			}
			TagType::IntArray => {
				let raw = self.read_array_bytes(4)?;
				Tag::new(
					name,
					Value::IntArray(collect_elems(raw, 4, |chunk| i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))?),
				)
			}
			TagType::LongArray => {
				let raw = self.read_array_bytes(8)?;
				Tag::new(
					name,
					Value::LongArray(collect_elems(raw, 8, |chunk| {
						let mut buf = [0_u8; 8];
						buf.copy_from_slice(chunk);
						i64::from_be_bytes(buf)
					})?),
				)
			}
			TagType::List => return self.open_list(at, name),
			TagType::Compound => return self.open_compound(at, name),
		};

		self.observer.on_leaf(at, self.frames.len(), &tag);
		trace!(offset = at, depth = self.frames.len(), tag = tag.tag_type().as_str(), name = %tag.name_str(), "decoded tag");
		self.append(tag)
	}

	fn open_compound(&mut self, at: usize, name: Option<NbtString>) -> Result<()> {
		self.check_depth()?;
		self.observer.on_open(at, self.frames.len(), name.as_ref(), TagType::Compound, None);
		trace!(offset = at, depth = self.frames.len(), "open compound");
		self.frames.push(Frame::Compound {
			name,
			children: Compound::for_decode()?,
		});
		Ok(())
	}

	fn open_list(&mut self, at: usize, name: Option<NbtString>) -> Result<()> {
		let type_at = self.cursor.pos();
		let element_type = self.read_tag_type()?;
		let count = self.read_len()?;
		if element_type == TagType::End && count > 0 {
			return Err(NbtError::InvalidListType { at: type_at });
		}

		// Every element occupies at least this many bytes, so the count can be
		// rejected before reserving storage for it.
		let need = count.saturating_mul(min_payload_width(element_type));
		if need > self.cursor.remaining() {
			return Err(NbtError::OutOfBounds {
				at: self.cursor.pos(),
				need,
				rem: self.cursor.remaining(),
			});
		}

		self.check_depth()?;
		self.observer.on_open(at, self.frames.len(), name.as_ref(), TagType::List, Some(count));
		trace!(offset = at, depth = self.frames.len(), element = element_type.as_str(), count, "open list");
		self.frames.push(Frame::List {
			name,
			list: ListValue::with_capacity(element_type, count)?,
			remaining: count,
		});
		Ok(())
	}

	fn close_compound(&mut self) -> Result<()> {
		let Some(Frame::Compound { name, children }) = self.frames.pop() else {
			return Err(NbtError::UnmatchedEnd { at: self.cursor.pos() });
		};
		self.observer.on_close(self.frames.len(), TagType::Compound);
		self.append(Tag::compound(name, children))
	}

	fn close_list(&mut self) -> Result<()> {
		let Some(Frame::List { name, list, .. }) = self.frames.pop() else {
			return Ok(());
		};
		self.observer.on_close(self.frames.len(), TagType::List);
		self.append(Tag::list(name, list))
	}

	fn append(&mut self, tag: Tag) -> Result<()> {
		match self.frames.last_mut() {
			Some(Frame::Compound { children, .. }) => children.push(tag),
			Some(Frame::List { list, .. }) => list.push(tag),
			None => {
				self.root = Some(tag);
				Ok(())
			}
		}
	}

	fn finish(&mut self) -> Result<Tag> {
		if !self.cursor.is_empty() {
			let at = self.cursor.pos();
			let rem = self.cursor.remaining();
			if !self.options.allow_trailing_bytes {
				return Err(NbtError::TrailingData { at, rem });
			}
			warn!(offset = at, bytes = rem, "ignoring trailing bytes after root compound");
		}

		let root = self.root.take().ok_or(NbtError::UnclosedCompound { depth: 0, at: self.cursor.pos() })?;
		debug!(bytes = self.cursor.pos(), root = %root.name_str(), "decoded root compound");
		Ok(root)
	}

	fn check_depth(&self) -> Result<()> {
		if self.frames.len() >= self.options.max_depth as usize {
			return Err(NbtError::DepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		Ok(())
	}

	fn read_tag_type(&mut self) -> Result<TagType> {
		let at = self.cursor.pos();
		let id = self.cursor.read_u8()?;
		TagType::from_id(id).ok_or(NbtError::UnknownTagType { id, at })
	}

	fn read_name(&mut self) -> Result<NbtString> {
		let len = usize::from(self.cursor.read_u16()?);
		NbtString::from_bytes(self.cursor.read_exact(len)?)
	}

	fn read_len(&mut self) -> Result<usize> {
		let at = self.cursor.pos();
		let len = self.cursor.read_i32()?;
		usize::try_from(len).map_err(|_| NbtError::NegativeLength { len, at })
	}

	fn read_array_bytes(&mut self, width: usize) -> Result<&'a [u8]> {
		let count = self.read_len()?;
		let need = count.checked_mul(width).ok_or(NbtError::OutOfBounds {
			at: self.cursor.pos(),
			need: usize::MAX,
			rem: self.cursor.remaining(),
		})?;
		self.cursor.read_exact(need)
	}

	fn with_context(&self, err: NbtError) -> NbtError {
		if self.frames.is_empty() {
			return err;
		}
		NbtError::Context {
			path: self.render_path(),
			source: Box::new(err),
		}
	}

	fn render_path(&self) -> String {
		let mut out = String::new();
		for frame in &self.frames {
			match frame {
				Frame::Compound { name, .. } => {
					if let Some(name) = name.as_ref().filter(|item| !item.is_empty()) {
						if !out.is_empty() {
							out.push('/');
						}
						out.push_str(&name.to_str());
					}
				}
				Frame::List { name, list, .. } => {
					if let Some(name) = name.as_ref().filter(|item| !item.is_empty()) {
						if !out.is_empty() {
							out.push('/');
						}
						out.push_str(&name.to_str());
					}
					out.push_str(&format!("[{}]", list.len()));
				}
			}
		}
		if out.is_empty() { "<root>".to_owned() } else { out }
	}
}

fn collect_elems<T>(raw: &[u8], width: usize, decode: impl Fn(&[u8]) -> T) -> Result<Vec<T>> {
	let count = raw.len() / width;
	let mut out = Vec::new();
	out.try_reserve_exact(count).map_err(|_| NbtError::Allocation { requested: count })?;
	out.extend(raw.chunks_exact(width).map(decode));
	Ok(out)
}

/// Smallest encoded size of one unnamed element of `tag`.
fn min_payload_width(tag: TagType) -> usize {
	match tag {
		TagType::End => 0,
		TagType::Byte => 1,
		TagType::Short | TagType::String => 2,
		TagType::Int | TagType::Float | TagType::ByteArray | TagType::IntArray | TagType::LongArray => 4,
		TagType::Long | TagType::Double => 8,
		TagType::List => 5,
		TagType::Compound => 1,
	}
}
