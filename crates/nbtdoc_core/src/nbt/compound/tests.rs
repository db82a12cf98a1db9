use crate::nbt::{Compound, INITIAL_CAPACITY, NbtError, NbtString, Tag, TagType, Value};

fn named_int(name: &str, value: i32) -> Tag {
	Tag::int(Some(NbtString::from(name)), value)
}

#[test]
fn decode_compound_starts_at_initial_capacity() {
	let compound = Compound::for_decode().expect("compound allocates");
	assert!(compound.is_empty());
	assert!(compound.capacity() >= INITIAL_CAPACITY);
}

#[test]
fn push_counts_every_child_across_growth() {
	for count in [0_usize, 1, 7, 8, 9, 16, 17, 100] {
		let mut compound = Compound::for_decode().expect("compound allocates");
		for idx in 0..count {
			compound.push(named_int("n", idx as i32)).expect("push succeeds");
			assert!(compound.capacity() >= compound.len());
		}
		assert_eq!(compound.len(), count);
	}
}

#[test]
fn capacity_doubles_when_full() {
	let mut compound = Compound::for_decode().expect("compound allocates");
	let start = compound.capacity();
	for idx in 0..=start {
		compound.push(named_int("n", idx as i32)).expect("push succeeds");
	}
	assert!(compound.capacity() >= start * 2);
}

#[test]
fn children_keep_insertion_order_and_duplicates() {
	let mut compound = Compound::new();
	compound.push(named_int("a", 1)).expect("push");
	compound.push(named_int("b", 2)).expect("push");
	compound.push(named_int("a", 3)).expect("push");

	let names: Vec<_> = compound.iter().map(|child| child.name_str().into_owned()).collect();
	assert_eq!(names, ["a", "b", "a"]);
	assert_eq!(compound.get("a").map(|tag| tag.value().as_i64()), Some(Some(1)));
	assert!(compound.get("missing").is_none());
}

#[test]
fn get_mut_edits_first_match() {
	let mut compound = Compound::new();
	compound.push(named_int("a", 1)).expect("push");
	compound.push(named_int("a", 2)).expect("push");

	let mut child = compound.get_mut("a").expect("child exists");
	child.replace_value(Value::Int(10)).expect("replace");

	assert_eq!(compound.children()[0].value().as_i64(), Some(10));
	assert_eq!(compound.children()[1].value().as_i64(), Some(2));
}

#[test]
fn push_rejects_unnamed_children() {
	let mut compound = Compound::new();
	let err = compound.push(Tag::int(None, 1)).expect_err("unnamed child");
	assert!(matches!(err, NbtError::UnnamedCompoundChild { tag: TagType::Int }));
	assert!(compound.is_empty());

	compound.push(named_int("", 1)).expect("empty name is still a name");
	assert_eq!(compound.len(), 1);
}

#[test]
fn get_mut_handle_keeps_name_and_type() {
	let mut compound = Compound::new();
	compound.push(named_int("level", 3)).expect("push");

	let mut child = compound.get_mut("level").expect("child exists");
	assert_eq!(child.name_str(), "level");
	let err = child.replace_value(Value::String(NbtString::from("x"))).expect_err("type change rejected");
	assert!(matches!(
		err,
		NbtError::ValueTypeMismatch {
			expected: TagType::Int,
			got: TagType::String
		}
	));
	assert!(matches!(child.as_compound_mut(), Err(NbtError::NotCompound { tag: TagType::Int })));

	assert_eq!(compound.get("level").map(|tag| tag.value().as_i64()), Some(Some(3)));
}
