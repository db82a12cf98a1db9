use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::nbt::{Compound, NbtError, Result, TagType};

/// Owned NBT string bytes with an authoritative length.
///
/// Stored exactly as they appeared on the wire (Java modified UTF-8), so
/// decoding never loses information.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct NbtString(Box<[u8]>);

impl NbtString {
	/// Copy raw wire bytes into an owned string.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(Self(copy_slice(bytes)?.into_boxed_slice()))
	}

	/// Encode a Rust string as Java modified UTF-8.
	pub fn from_str_java(value: &str) -> Self {
		Self(cesu8::to_java_cesu8(value).into_owned().into_boxed_slice())
	}

	/// Raw wire bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Byte length.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the string has zero bytes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Decode as text, replacing invalid sequences.
	pub fn to_str(&self) -> Cow<'_, str> {
		match cesu8::from_java_cesu8(&self.0) {
			Ok(text) => text,
			Err(_) => String::from_utf8_lossy(&self.0),
		}
	}

	/// Whether this string equals `value` once encoded as modified UTF-8.
	pub fn matches(&self, value: &str) -> bool {
		*self.0 == *cesu8::to_java_cesu8(value)
	}
}

impl From<&str> for NbtString {
	fn from(value: &str) -> Self {
		Self::from_str_java(value)
	}
}

impl fmt::Debug for NbtString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.to_str(), f)
	}
}

impl fmt::Display for NbtString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_str())
	}
}

/// Decoded tag payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Signed byte.
	Byte(i8),
	/// Signed short.
	Short(i16),
	/// Signed int.
	Int(i32),
	/// Signed long.
	Long(i64),
	/// Single precision float.
	Float(f32),
	/// Double precision float.
	Double(f64),
	/// Byte array.
	ByteArray(Vec<i8>),
	/// String bytes.
	String(NbtString),
	/// Homogeneous list of unnamed tags.
	List(ListValue),
	/// Ordered named children.
	Compound(Compound),
	/// Int array.
	IntArray(Vec<i32>),
	/// Long array.
	LongArray(Vec<i64>),
}

impl Value {
	/// Return the tag type of this value.
	pub fn tag_type(&self) -> TagType {
		match self {
			Self::Byte(_) => TagType::Byte,
			Self::Short(_) => TagType::Short,
			Self::Int(_) => TagType::Int,
			Self::Long(_) => TagType::Long,
			Self::Float(_) => TagType::Float,
			Self::Double(_) => TagType::Double,
			Self::ByteArray(_) => TagType::ByteArray,
			Self::String(_) => TagType::String,
			Self::List(_) => TagType::List,
			Self::Compound(_) => TagType::Compound,
			Self::IntArray(_) => TagType::IntArray,
			Self::LongArray(_) => TagType::LongArray,
		}
	}

	/// Borrow as compound when this is one.
	pub fn as_compound(&self) -> Option<&Compound> {
		match self {
			Self::Compound(item) => Some(item),
			_ => None,
		}
	}

	/// Borrow as list when this is one.
	pub fn as_list(&self) -> Option<&ListValue> {
		match self {
			Self::List(item) => Some(item),
			_ => None,
		}
	}

	/// Widen integer scalars to `i64`.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Byte(v) => Some(i64::from(*v)),
			Self::Short(v) => Some(i64::from(*v)),
			Self::Int(v) => Some(i64::from(*v)),
			Self::Long(v) => Some(*v),
			_ => None,
		}
	}

	/// Borrow string bytes when this is a string.
	pub fn as_nbt_str(&self) -> Option<&NbtString> {
		match self {
			Self::String(item) => Some(item),
			_ => None,
		}
	}
}

/// Homogeneous sequence of unnamed tags.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
	element_type: TagType,
	elements: Vec<Tag>,
}

impl ListValue {
	/// Create an empty list that will hold `element_type` elements.
	pub fn empty(element_type: TagType) -> Self {
		Self {
			element_type,
			elements: Vec::new(),
		}
	}

	/// Create an empty list with room for `count` elements.
	pub fn with_capacity(element_type: TagType, count: usize) -> Result<Self> {
		let mut elements = Vec::new();
		elements.try_reserve_exact(count).map_err(|_| NbtError::Allocation { requested: count })?;
		Ok(Self { element_type, elements })
	}

	/// Build a list, checking every element is unnamed and of `element_type`.
	pub fn new(element_type: TagType, elements: Vec<Tag>) -> Result<Self> {
		for element in &elements {
			check_element(element_type, element)?;
		}
		Ok(Self { element_type, elements })
	}

	/// Append one element, enforcing the list invariants.
	pub fn push(&mut self, element: Tag) -> Result<()> {
		check_element(self.element_type, &element)?;
		self.elements.try_reserve(1).map_err(|_| NbtError::Allocation {
			requested: self.elements.len() + 1,
		})?;
		self.elements.push(element);
		Ok(())
	}

	/// Declared element type.
	pub fn element_type(&self) -> TagType {
		self.element_type
	}

	/// Elements in wire order.
	pub fn elements(&self) -> &[Tag] {
		&self.elements
	}

	pub(crate) fn elements_mut(&mut self) -> &mut [Tag] {
		&mut self.elements
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	/// Whether the list has no elements.
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Iterate elements.
	pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
		self.elements.iter()
	}

	/// Consume the list, returning its elements.
	pub fn into_elements(mut self) -> Vec<Tag> {
		std::mem::take(&mut self.elements)
	}
}

impl Drop for ListValue {
	fn drop(&mut self) {
		drop_tags(std::mem::take(&mut self.elements));
	}
}

impl<'a> IntoIterator for &'a ListValue {
	type Item = &'a Tag;
	type IntoIter = std::slice::Iter<'a, Tag>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Drop `pending` and everything below it without native recursion.
///
/// Each container is emptied before it is dropped, so its own `Drop` finds
/// nothing left to descend into.
pub(crate) fn drop_tags(mut pending: Vec<Tag>) {
	while let Some(tag) = pending.pop() {
		match tag.value {
			Value::Compound(mut item) => pending.append(&mut item.take_children()),
			Value::List(mut item) => pending.append(&mut item.elements),
			_ => {}
		}
	}
}

fn check_element(element_type: TagType, element: &Tag) -> Result<()> {
	if element.name.is_some() {
		return Err(NbtError::NamedListElement);
	}
	let got = element.tag_type();
	if got != element_type {
		return Err(NbtError::ListTypeMismatch { expected: element_type, got });
	}
	Ok(())
}

/// One decoded node: an optional name and a value.
///
/// The name is absent exactly when the tag is a list element. Both are fixed
/// once the tag is built; only [`Tag::replace_value`] swaps the payload, and
/// it keeps the tag type.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
	name: Option<NbtString>,
	value: Value,
}

impl Tag {
	/// Wrap an already-built value.
	pub fn new(name: Option<NbtString>, value: Value) -> Self {
		Self { name, value }
	}

	/// Build an unnamed tag for use as a list element.
	pub fn unnamed(value: Value) -> Self {
		Self { name: None, value }
	}

	/// Build a byte tag.
	pub fn byte(name: Option<NbtString>, value: i8) -> Self {
		Self::new(name, Value::Byte(value))
	}

	/// Build a short tag.
	pub fn short(name: Option<NbtString>, value: i16) -> Self {
		Self::new(name, Value::Short(value))
	}

	/// Build an int tag.
	pub fn int(name: Option<NbtString>, value: i32) -> Self {
		Self::new(name, Value::Int(value))
	}

	/// Build a long tag.
	pub fn long(name: Option<NbtString>, value: i64) -> Self {
		Self::new(name, Value::Long(value))
	}

	/// Build a float tag.
	pub fn float(name: Option<NbtString>, value: f32) -> Self {
		Self::new(name, Value::Float(value))
	}

	/// Build a double tag.
	pub fn double(name: Option<NbtString>, value: f64) -> Self {
		Self::new(name, Value::Double(value))
	}

	/// Build a string tag, copying `bytes` into owned storage.
	pub fn string(name: Option<NbtString>, bytes: &[u8]) -> Result<Self> {
		Ok(Self::new(name, Value::String(NbtString::from_bytes(bytes)?)))
	}

	/// Build a byte array tag, copying `data` into owned storage.
	pub fn byte_array(name: Option<NbtString>, data: &[i8]) -> Result<Self> {
		Ok(Self::new(name, Value::ByteArray(copy_slice(data)?)))
	}

	/// Build an int array tag, copying `data` into owned storage.
	pub fn int_array(name: Option<NbtString>, data: &[i32]) -> Result<Self> {
		Ok(Self::new(name, Value::IntArray(copy_slice(data)?)))
	}

	/// Build a long array tag, copying `data` into owned storage.
	pub fn long_array(name: Option<NbtString>, data: &[i64]) -> Result<Self> {
		Ok(Self::new(name, Value::LongArray(copy_slice(data)?)))
	}

	/// Build a list tag.
	pub fn list(name: Option<NbtString>, list: ListValue) -> Self {
		Self::new(name, Value::List(list))
	}

	/// Build a compound tag.
	pub fn compound(name: Option<NbtString>, compound: Compound) -> Self {
		Self::new(name, Value::Compound(compound))
	}

	/// Tag name, `None` for list elements.
	pub fn name(&self) -> Option<&NbtString> {
		self.name.as_ref()
	}

	/// Tag payload.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Consume the tag, returning its payload.
	pub fn into_value(self) -> Value {
		self.value
	}

	pub(crate) fn value_mut(&mut self) -> &mut Value {
		&mut self.value
	}

	/// Return the tag type of this tag's value.
	pub fn tag_type(&self) -> TagType {
		self.value.tag_type()
	}

	/// Name decoded for display, empty for list elements.
	pub fn name_str(&self) -> Cow<'_, str> {
		match &self.name {
			Some(name) => name.to_str(),
			None => Cow::Borrowed(""),
		}
	}

	/// Borrow the compound payload, failing for other tag types.
	pub fn as_compound(&self) -> Result<&Compound> {
		self.value.as_compound().ok_or(NbtError::NotCompound { tag: self.tag_type() })
	}

	/// Mutably borrow the compound payload, failing for other tag types.
	pub fn as_compound_mut(&mut self) -> Result<&mut Compound> {
		let tag = self.tag_type();
		match &mut self.value {
			Value::Compound(item) => Ok(item),
			_ => Err(NbtError::NotCompound { tag }),
		}
	}

	/// Replace the value in place, returning the previous one.
	///
	/// The replacement must have the same tag type so list homogeneity holds.
	pub fn replace_value(&mut self, value: Value) -> Result<Value> {
		let expected = self.tag_type();
		let got = value.tag_type();
		if expected != got {
			return Err(NbtError::ValueTypeMismatch { expected, got });
		}
		Ok(std::mem::replace(&mut self.value, value))
	}
}

/// Mutable handle to a tag inside a tree.
///
/// Reads go through [`Deref`]; the only edits are [`TagMut::replace_value`],
/// which keeps the tag type, and [`TagMut::as_compound_mut`]. The tag itself
/// cannot be swapped out, so its name and position stay valid.
#[derive(Debug)]
pub struct TagMut<'a>(&'a mut Tag);

impl<'a> TagMut<'a> {
	pub(crate) fn new(tag: &'a mut Tag) -> Self {
		Self(tag)
	}

	/// Replace the value in place, returning the previous one. See [`Tag::replace_value`].
	pub fn replace_value(&mut self, value: Value) -> Result<Value> {
		self.0.replace_value(value)
	}

	/// Mutably borrow the compound payload, failing for other tag types.
	pub fn as_compound_mut(self) -> Result<&'a mut Compound> {
		self.0.as_compound_mut()
	}
}

impl Deref for TagMut<'_> {
	type Target = Tag;

	fn deref(&self) -> &Tag {
		self.0
	}
}

fn copy_slice<T: Copy>(data: &[T]) -> Result<Vec<T>> {
	let mut out = Vec::new();
	out.try_reserve_exact(data.len()).map_err(|_| NbtError::Allocation { requested: data.len() })?;
	out.extend_from_slice(data);
	Ok(out)
}

#[cfg(test)]
mod tests {
	use crate::nbt::{Compound, ListValue, NbtError, NbtString, Tag, TagMut, TagType, Value};

	fn name(value: &str) -> Option<NbtString> {
		Some(NbtString::from(value))
	}

	#[test]
	fn factory_sets_type_and_name() {
		let tag = Tag::short(name("hp"), 20);
		assert_eq!(tag.tag_type(), TagType::Short);
		assert_eq!(tag.name_str(), "hp");

		let tag = Tag::long_array(name("ids"), &[1, 2, 3]).expect("array builds");
		assert_eq!(tag.value, Value::LongArray(vec![1, 2, 3]));
	}

	#[test]
	fn string_keeps_raw_bytes_and_length() {
		let tag = Tag::string(name("s"), b"a\0b").expect("string builds");
		let Value::String(text) = &tag.value else {
			panic!("expected string value");
		};
		assert_eq!(text.len(), 3);
		assert_eq!(text.as_bytes(), b"a\0b");
	}

	#[test]
	fn modified_utf8_null_decodes_to_nul_char() {
		let text = NbtString::from_bytes(&[b'a', 0xc0, 0x80]).expect("string builds");
		assert_eq!(text.to_str(), "a\0");
		assert!(text.matches("a\0"));
		assert_eq!(NbtString::from("a\0"), text);
	}

	#[test]
	fn invalid_string_bytes_display_lossy() {
		let text = NbtString::from_bytes(&[b'o', b'k', 0xff]).expect("string builds");
		assert_eq!(text.to_str(), "ok\u{fffd}");
	}

	#[test]
	fn list_rejects_named_and_mismatched_elements() {
		let err = ListValue::new(TagType::Int, vec![Tag::int(name("x"), 1)]).expect_err("named element");
		assert!(matches!(err, NbtError::NamedListElement));

		let mut list = ListValue::empty(TagType::Int);
		list.push(Tag::int(None, 1)).expect("int element fits");
		let err = list.push(Tag::byte(None, 1)).expect_err("byte in int list");
		assert!(matches!(
			err,
			NbtError::ListTypeMismatch {
				expected: TagType::Int,
				got: TagType::Byte
			}
		));
		assert_eq!(list.len(), 1);
	}

	#[test]
	fn replace_value_requires_same_type() {
		let mut tag = Tag::int(name("level"), 3);
		let old = tag.replace_value(Value::Int(9)).expect("same type replaces");
		assert_eq!(old, Value::Int(3));
		assert_eq!(tag.value, Value::Int(9));

		let err = tag.replace_value(Value::Long(9)).expect_err("type change rejected");
		assert!(matches!(err, NbtError::ValueTypeMismatch { .. }));
		assert_eq!(tag.value, Value::Int(9));
	}

	#[test]
	fn list_elements_stay_homogeneous_through_mutable_access() {
		let mut list = ListValue::new(TagType::Int, vec![Tag::int(None, 1), Tag::int(None, 2)]).expect("list builds");
		let mut element = TagMut::new(&mut list.elements_mut()[0]);
		let err = element.replace_value(Value::String(NbtString::from("x"))).expect_err("string in int list");
		assert!(matches!(
			err,
			NbtError::ValueTypeMismatch {
				expected: TagType::Int,
				got: TagType::String
			}
		));
		element.replace_value(Value::Int(7)).expect("int replaces int");

		assert!(list.iter().all(|item| item.tag_type() == TagType::Int && item.name().is_none()));
		assert_eq!(list.elements()[0].value(), &Value::Int(7));
	}

	#[test]
	fn deep_trees_drop_without_recursion() {
		let mut tag = Tag::int(None, 0);
		for _ in 0..200_000 {
			let list = ListValue::new(tag.tag_type(), vec![tag]).expect("single element list");
			tag = Tag::list(None, list);
		}
		let mut compound = Compound::new();
		compound.push(Tag::new(name("deep"), tag.into_value())).expect("push");
		drop(Tag::compound(name(""), compound));
	}

	#[test]
	fn as_compound_rejects_scalars() {
		let tag = Tag::byte(None, 1);
		assert!(matches!(tag.as_compound(), Err(NbtError::NotCompound { tag: TagType::Byte })));

		let tag = Tag::compound(name(""), Compound::new());
		assert!(tag.as_compound().expect("compound").is_empty());
	}
}
