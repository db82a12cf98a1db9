use crate::nbt::{Compound, ListValue, NbtError, NbtString, Tag, TagType, Value, find_all, find_tag, find_tag_mut};

fn name(value: &str) -> Option<NbtString> {
	Some(NbtString::from(value))
}

fn compound(name_value: Option<NbtString>, kids: Vec<Tag>) -> Tag {
	let mut out = Compound::new();
	for kid in kids {
		out.push(kid).expect("push");
	}
	Tag::compound(name_value, out)
}

/// root
///   a: { target: 1 }
///   target: 2
///   items: [ { target: 3 } ]
fn sample() -> Tag {
	let inner = compound(name("a"), vec![Tag::int(name("target"), 1)]);
	let element = compound(None, vec![Tag::int(name("target"), 3)]);
	let items = ListValue::new(TagType::Compound, vec![element]).expect("list builds");
	compound(name(""), vec![inner, Tag::int(name("target"), 2), Tag::list(name("items"), items)])
}

#[test]
fn returns_preorder_first_match() {
	let root = sample();
	let found = find_tag(&root, "target").expect("root is compound").expect("tag exists");
	assert_eq!(found.value(), &Value::Int(1));
}

#[test]
fn direct_child_matches_before_later_nested_ones() {
	let root = compound(
		name(""),
		vec![Tag::int(name("x"), 1), compound(name("c"), vec![Tag::int(name("x"), 2)])],
	);
	let found = find_tag(&root, "x").expect("search").expect("found");
	assert_eq!(found.value(), &Value::Int(1));
}

#[test]
fn compound_itself_can_match() {
	let root = sample();
	let found = find_tag(&root, "a").expect("search").expect("found");
	assert_eq!(found.tag_type(), TagType::Compound);
}

#[test]
fn missing_name_is_none() {
	let root = sample();
	assert!(find_tag(&root, "nope").expect("search").is_none());
}

#[test]
fn root_name_is_not_matched() {
	let root = compound(name("root"), Vec::new());
	assert!(find_tag(&root, "root").expect("search").is_none());
}

#[test]
fn searching_non_compound_is_structure_error() {
	let tag = Tag::int(name("x"), 1);
	let err = find_tag(&tag, "x").expect_err("scalar root");
	assert!(matches!(err, NbtError::NotCompound { tag: TagType::Int }));
}

#[test]
fn find_all_lists_matches_in_preorder() {
	let root = sample();
	let values: Vec<_> = find_all(&root, "target")
		.expect("search")
		.into_iter()
		.map(|tag| tag.value().clone())
		.collect();
	assert_eq!(values, [Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn find_tag_mut_edits_first_match() {
	let mut root = sample();
	let mut tag = find_tag_mut(&mut root, "target").expect("search").expect("found");
	tag.replace_value(Value::Int(42)).expect("replace");

	let found = find_tag(&root, "target").expect("search").expect("found");
	assert_eq!(found.value(), &Value::Int(42));
	assert_eq!(find_all(&root, "target").expect("search").len(), 3);
}

#[test]
fn find_tag_mut_reaches_tags_inside_list_elements() {
	let element = compound(None, vec![Tag::int(name("target"), 3)]);
	let items = ListValue::new(TagType::Compound, vec![element]).expect("list builds");
	let mut root = compound(name(""), vec![Tag::int(name("other"), 1), Tag::list(name("items"), items)]);

	let mut tag = find_tag_mut(&mut root, "target").expect("search").expect("found");
	assert_eq!(tag.replace_value(Value::Int(7)).expect("replace"), Value::Int(3));

	let items = root.as_compound().expect("compound").get("items").expect("items");
	let element = items.value().as_list().expect("list").elements()[0].as_compound().expect("element compound");
	assert_eq!(element.get("target").expect("target").value(), &Value::Int(7));
}

#[test]
fn deep_trees_search_without_recursion() {
	let mut tag = Tag::int(name("needle"), 9);
	for _ in 0..50_000 {
		tag = compound(name("n"), vec![tag]);
	}
	let mut root = compound(name(""), vec![tag]);

	assert_eq!(find_tag(&root, "needle").expect("search").expect("found").value(), &Value::Int(9));
	let mut found = find_tag_mut(&mut root, "needle").expect("search").expect("found");
	found.replace_value(Value::Int(10)).expect("replace");
	assert_eq!(find_tag(&root, "needle").expect("search").expect("found").value(), &Value::Int(10));
}
