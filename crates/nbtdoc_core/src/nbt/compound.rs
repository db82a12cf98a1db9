use crate::nbt::value::drop_tags;
use crate::nbt::{NbtError, Result, Tag, TagMut};

/// Initial child capacity of a freshly opened compound.
pub const INITIAL_CAPACITY: usize = 8;

/// Ordered, append-only set of named child tags.
///
/// Children keep wire order and may share names. Capacity starts at
/// [`INITIAL_CAPACITY`] and doubles when full.
#[derive(Debug, Clone, Default)]
pub struct Compound {
	children: Vec<Tag>,
}

impl Compound {
	/// Create an empty compound without reserving storage.
	pub fn new() -> Self {
		Self { children: Vec::new() }
	}

	/// Create an empty compound with the initial child capacity reserved.
	pub fn for_decode() -> Result<Self> {
		let mut children = Vec::new();
		children
			.try_reserve_exact(INITIAL_CAPACITY)
			.map_err(|_| NbtError::Allocation { requested: INITIAL_CAPACITY })?;
		Ok(Self { children })
	}

	/// Append a named child, taking ownership of it.
	pub fn push(&mut self, child: Tag) -> Result<()> {
		if child.name().is_none() {
			return Err(NbtError::UnnamedCompoundChild { tag: child.tag_type() });
		}
		if self.children.len() == self.children.capacity() {
			let grow = self.children.capacity().max(INITIAL_CAPACITY);
			self.children.try_reserve_exact(grow).map_err(|_| NbtError::Allocation {
				requested: self.children.len() + grow,
			})?;
		}
		self.children.push(child);
		Ok(())
	}

	/// Number of children.
	pub fn len(&self) -> usize {
		self.children.len()
	}

	/// Whether the compound has no children.
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	/// Children in wire order.
	pub fn children(&self) -> &[Tag] {
		&self.children
	}

	pub(crate) fn children_mut(&mut self) -> &mut [Tag] {
		&mut self.children
	}

	/// Iterate children in wire order.
	pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
		self.children.iter()
	}

	/// First direct child named `name`.
	pub fn get(&self, name: &str) -> Option<&Tag> {
		self.children.iter().find(|child| child.name().is_some_and(|item| item.matches(name)))
	}

	/// Mutable first direct child named `name`.
	pub fn get_mut(&mut self, name: &str) -> Option<TagMut<'_>> {
		self.children
			.iter_mut()
			.find(|child| child.name().is_some_and(|item| item.matches(name)))
			.map(TagMut::new)
	}

	/// Consume the compound, returning its children.
	pub fn into_children(mut self) -> Vec<Tag> {
		self.take_children()
	}

	pub(crate) fn take_children(&mut self) -> Vec<Tag> {
		std::mem::take(&mut self.children)
	}

	#[cfg(test)]
	pub(crate) fn capacity(&self) -> usize {
		self.children.capacity()
	}
}

impl Drop for Compound {
	fn drop(&mut self) {
		drop_tags(self.take_children());
	}
}

impl PartialEq for Compound {
	fn eq(&self, other: &Self) -> bool {
		self.children == other.children
	}
}

impl<'a> IntoIterator for &'a Compound {
	type Item = &'a Tag;
	type IntoIter = std::slice::Iter<'a, Tag>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests;
