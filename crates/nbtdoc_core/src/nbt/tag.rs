use std::fmt;

/// One of the thirteen NBT tag types, in wire id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagType {
	// Variant order is the wire id.
	/// Compound terminator.
	End,
	/// Signed 8-bit integer.
	Byte,
	/// Signed 16-bit integer.
	Short,
	/// Signed 32-bit integer.
	Int,
	/// Signed 64-bit integer.
	Long,
	/// IEEE-754 binary32.
	Float,
	/// IEEE-754 binary64.
	Double,
	/// Length-prefixed `i8` array.
	ByteArray,
	/// Length-prefixed modified UTF-8 string.
	String,
	/// Homogeneous list of unnamed tags.
	List,
	/// Ordered set of named tags.
	Compound,
	/// Length-prefixed `i32` array.
	IntArray,
	/// Length-prefixed `i64` array.
	LongArray,
}

impl TagType {
	/// All tag types, indexed by wire id.
	pub const ALL: [TagType; 13] = [
		TagType::End,
		TagType::Byte,
		TagType::Short,
		TagType::Int,
		TagType::Long,
		TagType::Float,
		TagType::Double,
		TagType::ByteArray,
		TagType::String,
		TagType::List,
		TagType::Compound,
		TagType::IntArray,
		TagType::LongArray,
	];

	/// Map a wire type id to a tag type.
	pub fn from_id(id: u8) -> Option<Self> {
		Self::ALL.get(usize::from(id)).copied()
	}

	/// Wire type id of this tag type.
	pub fn id(self) -> u8 {
		self as u8
	}

	/// Render tag type as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::End => "end",
			Self::Byte => "byte",
			Self::Short => "short",
			Self::Int => "int",
			Self::Long => "long",
			Self::Float => "float",
			Self::Double => "double",
			Self::ByteArray => "byte_array",
			Self::String => "string",
			Self::List => "list",
			Self::Compound => "compound",
			Self::IntArray => "int_array",
			Self::LongArray => "long_array",
		}
	}

	/// Encoded payload width for fixed-size scalars, `None` for variable-size types.
	pub fn scalar_width(self) -> Option<usize> {
		match self {
			Self::Byte => Some(1),
			Self::Short => Some(2),
			Self::Int | Self::Float => Some(4),
			Self::Long | Self::Double => Some(8),
			_ => None,
		}
	}

	/// Element width of array types, `None` otherwise.
	pub fn array_elem_width(self) -> Option<usize> {
		match self {
			Self::ByteArray => Some(1),
			Self::IntArray => Some(4),
			Self::LongArray => Some(8),
			_ => None,
		}
	}

	/// Whether values of this type contain other tags.
	pub fn is_container(self) -> bool {
		matches!(self, Self::List | Self::Compound)
	}
}

impl fmt::Display for TagType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
