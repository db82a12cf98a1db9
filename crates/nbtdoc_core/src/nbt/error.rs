use std::path::PathBuf;

use thiserror::Error;

use crate::nbt::TagType;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, NbtError>;

/// Errors produced while reading, decoding, and querying NBT data.
#[derive(Debug, Error)]
pub enum NbtError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Input file does not exist.
	#[error("file not found: {}", path.display())]
	FileNotFound {
		/// Path that was requested.
		path: PathBuf,
	},
	/// Compressed stream could not be inflated.
	#[error("{compression} decompression failed: {source}")]
	Decompress {
		/// Compression label of the failing stream.
		compression: &'static str,
		/// Underlying decoder failure.
		source: std::io::Error,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("out of bounds read at offset {at}, need {need} bytes, remaining {rem}")]
	OutOfBounds {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Type id byte does not name a known tag type.
	#[error("unknown tag type {id} at offset {at} (0x{at:x})")]
	UnknownTagType {
		/// Offending type id.
		id: u8,
		/// Offset of the type id byte.
		at: usize,
	},
	/// Array or list element count was negative.
	#[error("negative length {len} at offset {at}")]
	NegativeLength {
		/// Parsed signed count.
		len: i32,
		/// Offset of the count field.
		at: usize,
	},
	/// List declared `end` elements with a non-zero count.
	#[error("list of end tags with non-zero length at offset {at}")]
	InvalidListType {
		/// Offset of the list element type byte.
		at: usize,
	},
	/// End tag appeared with no open compound.
	#[error("end tag at offset {at} with no open compound")]
	UnmatchedEnd {
		/// Offset of the end byte.
		at: usize,
	},
	/// Input ended while compounds or lists were still open.
	#[error("input ended at offset {at} with {depth} unclosed tag(s)")]
	UnclosedCompound {
		/// Number of frames still open.
		depth: usize,
		/// Input length.
		at: usize,
	},
	/// Non-compound tag found where only a root compound is allowed.
	#[error("{} tag at offset {at} outside of any compound", tag.as_str())]
	TagOutsideCompound {
		/// Type of the stray tag.
		tag: TagType,
		/// Offset of its type id.
		at: usize,
	},
	/// Bytes remained after the root compound was closed.
	#[error("{rem} trailing bytes after root compound at offset {at}")]
	TrailingData {
		/// Offset of the first trailing byte.
		at: usize,
		/// Number of trailing bytes.
		rem: usize,
	},
	/// Compound-only operation invoked on another tag type.
	#[error("expected compound tag, got {}", tag.as_str())]
	NotCompound {
		/// Actual tag type.
		tag: TagType,
	},
	/// List element type differs from the list's declared element type.
	#[error("list element type mismatch: expected {}, got {}", expected.as_str(), got.as_str())]
	ListTypeMismatch {
		/// Declared list element type.
		expected: TagType,
		/// Type of the offending element.
		got: TagType,
	},
	/// List elements must not carry names.
	#[error("list elements cannot be named")]
	NamedListElement,
	/// Compound children must carry names.
	#[error("compound child {} has no name", tag.as_str())]
	UnnamedCompoundChild {
		/// Type of the unnamed child.
		tag: TagType,
	},
	/// Replacement value has a different tag type than the tag it replaces.
	#[error("value type mismatch: expected {}, got {}", expected.as_str(), got.as_str())]
	ValueTypeMismatch {
		/// Type of the existing value.
		expected: TagType,
		/// Type of the replacement.
		got: TagType,
	},
	/// Storage for a tag payload could not be reserved.
	#[error("allocation of {requested} elements failed")]
	Allocation {
		/// Requested element count.
		requested: usize,
	},
	/// Nesting depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Tag path expression syntax is invalid.
	#[error("invalid tag path: {path}")]
	InvalidTagPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Tag path named a field that does not exist.
	#[error("path field not found: {field}")]
	PathFieldMissing {
		/// Missing field name.
		field: String,
	},
	/// Tag path index exceeded the list or array length.
	#[error("path index {index} out of range (len={len})")]
	PathIndexOutOfRange {
		/// Requested index.
		index: usize,
		/// Available elements.
		len: usize,
	},
	/// Tag path step cannot be applied to the current tag type.
	#[error("path step {step} cannot be applied to {}", tag.as_str())]
	PathTypeMismatch {
		/// Rendered path step.
		step: String,
		/// Type of the tag the step was applied to.
		tag: TagType,
	},
	/// Name search found no matching tag.
	#[error("tag not found: {name}")]
	TagNotFound {
		/// Requested tag name.
		name: String,
	},
	/// Decode error annotated with the path of the tags open at the time.
	#[error("{source} (in {path})")]
	Context {
		/// Slash-separated path of open tags.
		path: String,
		/// Underlying decode failure.
		source: Box<NbtError>,
	},
}

/// Coarse classification of [`NbtError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Read past the end of the buffer.
	OutOfBounds,
	/// Malformed encoding such as an unknown type id or negative length.
	Format,
	/// Structurally invalid tree or misuse of a tree operation.
	Structure,
	/// Payload storage could not be obtained.
	Allocation,
	/// Nesting went past the configured limit.
	DepthExceeded,
	/// Tag path could not be parsed or resolved.
	Path,
	/// File access or decompression failure.
	Io,
}

impl NbtError {
	/// Classify this error, looking through any path context.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) | Self::FileNotFound { .. } | Self::Decompress { .. } | Self::DecompressedTooLarge { .. } => ErrorKind::Io,
			Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
			Self::UnknownTagType { .. } | Self::NegativeLength { .. } | Self::InvalidListType { .. } => ErrorKind::Format,
			Self::UnmatchedEnd { .. }
			| Self::UnclosedCompound { .. }
			| Self::TagOutsideCompound { .. }
			| Self::TrailingData { .. }
			| Self::NotCompound { .. }
			| Self::ListTypeMismatch { .. }
			| Self::NamedListElement
			| Self::UnnamedCompoundChild { .. }
			| Self::ValueTypeMismatch { .. } => ErrorKind::Structure,
			Self::Allocation { .. } => ErrorKind::Allocation,
			Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
			Self::InvalidTagPath { .. }
			| Self::PathFieldMissing { .. }
			| Self::PathIndexOutOfRange { .. }
			| Self::PathTypeMismatch { .. }
			| Self::TagNotFound { .. } => ErrorKind::Path,
			Self::Context { source, .. } => source.kind(),
		}
	}

	/// Return the innermost error, stripping path context.
	pub fn root(&self) -> &NbtError {
		match self {
			Self::Context { source, .. } => source.root(),
			other => other,
		}
	}

	/// Byte offset the error refers to, when it has one.
	pub fn offset(&self) -> Option<usize> {
		match self.root() {
			Self::OutOfBounds { at, .. }
			| Self::UnknownTagType { at, .. }
			| Self::NegativeLength { at, .. }
			| Self::InvalidListType { at }
			| Self::UnmatchedEnd { at }
			| Self::UnclosedCompound { at, .. }
			| Self::TagOutsideCompound { at, .. }
			| Self::TrailingData { at, .. } => Some(*at),
			_ => None,
		}
	}

	/// Tag path attached to the error, if the failure happened inside a compound.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::Context { path, .. } => Some(path),
			_ => None,
		}
	}
}
