use crate::nbt::{NbtString, Result, Tag, TagMut, Value};

/// Find the first tag named `name` below `root`, in pre-order.
///
/// `root` must be a compound; its own name is not considered. Search descends
/// through nested compounds and through the elements of lists.
pub fn find_tag<'a>(root: &'a Tag, name: &str) -> Result<Option<&'a Tag>> {
	let mut found = None;
	walk(root, name, |_, tag| {
		found = Some(tag);
		false
	})?;
	Ok(found)
}

/// Find every tag named `name` below `root`, in pre-order.
pub fn find_all<'a>(root: &'a Tag, name: &str) -> Result<Vec<&'a Tag>> {
	let mut found = Vec::new();
	walk(root, name, |_, tag| {
		found.push(tag);
		true
	})?;
	Ok(found)
}

/// Mutable variant of [`find_tag`], used to edit a tag in place.
pub fn find_tag_mut<'a>(root: &'a mut Tag, name: &str) -> Result<Option<TagMut<'a>>> {
	let mut route = None;
	walk(root, name, |indices, _| {
		route = Some(indices.to_vec());
		false
	})?;
	let Some(route) = route else {
		return Ok(None);
	};

	let mut current = root;
	for index in route {
		let next = match current.value_mut() {
			Value::Compound(item) => item.children_mut().get_mut(index),
			Value::List(item) => item.elements_mut().get_mut(index),
			_ => None,
		};
		let Some(next) = next else {
			return Ok(None);
		};
		current = next;
	}
	Ok(Some(TagMut::new(current)))
}

/// Pre-order walk over `root`'s descendants without native recursion.
///
/// `on_match` gets the child-index route from `root` to each tag named `name`
/// and returns whether to keep searching.
fn walk<'a>(root: &'a Tag, name: &str, mut on_match: impl FnMut(&[usize], &'a Tag) -> bool) -> Result<()> {
	let compound = root.as_compound()?;
	let needle = NbtString::from(name);

	let mut route: Vec<usize> = Vec::new();
	// Children are pushed in reverse so the stack pops them left to right.
	let mut stack: Vec<(usize, usize, &'a Tag)> = compound.children().iter().enumerate().rev().map(|(idx, tag)| (0, idx, tag)).collect();
	while let Some((depth, index, tag)) = stack.pop() {
		route.truncate(depth);
		route.push(index);

		if tag.name() == Some(&needle) && !on_match(&route, tag) {
			return Ok(());
		}

		let children: &'a [Tag] = match tag.value() {
			Value::Compound(item) => item.children(),
			Value::List(item) if item.element_type().is_container() => item.elements(),
			_ => &[],
		};
		stack.extend(children.iter().enumerate().rev().map(|(idx, child)| (depth + 1, idx, child)));
	}

	Ok(())
}

#[cfg(test)]
mod tests;
