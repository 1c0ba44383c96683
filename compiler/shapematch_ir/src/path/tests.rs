use pretty_assertions::assert_eq;

use super::*;
use crate::types::{TypeDef, TypeRegistry};

fn field(index: u32, name: &str) -> PathStep {
    PathStep::Field {
        index,
        name: Name::from(name),
    }
}

#[test]
fn resolve_root() {
    let value = Value::int(42);
    assert_eq!(ExtractionPath::root().resolve(&value), Some(&value));
    assert!(ExtractionPath::root().is_root());
}

#[test]
fn resolve_nested_index_and_key() {
    // {"points": [[1, 2], [3, 4]]}
    let value = Value::map_from([(
        "points",
        Value::list(vec![
            Value::array(vec![Value::int(1), Value::int(2)]),
            Value::array(vec![Value::int(3), Value::int(4)]),
        ]),
    )]);
    let path = ExtractionPath::root()
        .child(PathStep::Key(Name::from("points")))
        .child(PathStep::Index(1))
        .child(PathStep::Index(0));

    assert_eq!(path.resolve(&value), Some(&Value::int(3)));
    assert_eq!(path.depth(), 3);
    assert_eq!(path.to_string(), "$[\"points\"][1][0]");
}

#[test]
fn resolve_field() {
    let mut registry = TypeRegistry::new();
    let ty = registry
        .register(TypeDef::new("Point").with_fields(["x", "y"]))
        .unwrap();
    let point = registry
        .instantiate(ty, vec![Value::int(3), Value::int(4)])
        .unwrap();

    let path = ExtractionPath::root().child(field(1, "y"));
    assert_eq!(path.resolve(&point), Some(&Value::int(4)));
    assert_eq!(path.to_string(), "$.y");
}

#[test]
fn resolve_fails_softly() {
    let list = Value::list(vec![Value::int(1)]);
    let out_of_bounds = ExtractionPath::root().child(PathStep::Index(5));
    let wrong_kind = ExtractionPath::root().child(PathStep::Key(Name::from("k")));
    let not_object = ExtractionPath::root().child(field(0, "x"));

    assert_eq!(out_of_bounds.resolve(&list), None);
    assert_eq!(wrong_kind.resolve(&list), None);
    assert_eq!(not_object.resolve(&list), None);
}

#[test]
fn child_does_not_mutate_parent() {
    let parent = ExtractionPath::root().child(PathStep::Index(0));
    let child = parent.child(PathStep::Index(1));
    assert_eq!(parent.depth(), 1);
    assert_eq!(child.depth(), 2);
}
