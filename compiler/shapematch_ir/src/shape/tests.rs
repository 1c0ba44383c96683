use pretty_assertions::assert_eq;

use super::*;
use crate::types::{TypeDef, TypeRegistry};

#[test]
fn test_depth() {
    assert_eq!(ShapeNode::var("x").depth(), 1);
    assert_eq!(ShapeNode::array([ShapeNode::var("x")]).depth(), 2);
    assert_eq!(
        ShapeNode::map([("k", ShapeNode::list([ShapeNode::literal(1)]))]).depth(),
        3
    );
    assert_eq!(ShapeNode::array([]).depth(), 1);
}

#[test]
fn test_variables_in_first_occurrence_order() {
    let shape = ShapeNode::array([
        ShapeNode::var("b"),
        ShapeNode::var("a"),
        ShapeNode::var("b"),
        ShapeNode::Discard,
        ShapeNode::literal(0),
    ]);
    let names: Vec<&str> = shape.variables().into_iter().map(PatternVariable::name).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_init_collects_fields() {
    let mut registry = TypeRegistry::new();
    let point = registry
        .register(TypeDef::new("Point").with_fields(["x", "y"]))
        .unwrap();

    let shape = ShapeNode::init(
        point,
        [],
        [("x", ShapeNode::var("x")), ("y", ShapeNode::var("x"))],
    );
    match &shape {
        ShapeNode::FieldInit { base, fields } => {
            assert_eq!(base.target, point);
            assert!(base.args.is_empty());
            assert_eq!(fields.len(), 2);
            assert_eq!(&*fields[1].0, "y");
        }
        other => panic!("expected FieldInit, got {other:?}"),
    }
}

#[test]
fn test_display() {
    let shape = ShapeNode::array([ShapeNode::var("x"), ShapeNode::var("x"), ShapeNode::literal(0)]);
    assert_eq!(shape.to_string(), "#[x, x, 0]");

    let clause = Clause::new(["x"], shape);
    assert_eq!(clause.to_string(), "(x) => #[x, x, 0]");

    let map = ShapeNode::map([("x", ShapeNode::var("x")), ("y", ShapeNode::Discard)]);
    assert_eq!(map.to_string(), "{\"x\": x, \"y\": _}");
}

#[test]
fn test_clause_params() {
    let clause = Clause::new(["name", "age"], ShapeNode::Discard);
    let names: Vec<&str> = clause.params().iter().map(PatternVariable::name).collect();
    assert_eq!(names, vec!["name", "age"]);
    assert!(Clause::bare(ShapeNode::literal(0)).params().is_empty());
}

#[test]
fn test_typed_param() {
    let mut registry = TypeRegistry::new();
    let person = registry
        .register(TypeDef::new("Person").with_fields(["name"]))
        .unwrap();

    let clause = Clause::new(["p", "q"], ShapeNode::var("p"))
        .typed_param("p", TypeTag::AnyObject)
        .typed_param("p", TypeTag::Object(person));

    assert_eq!(
        clause.param_type(&PatternVariable::new("p")),
        Some(TypeTag::Object(person))
    );
    assert_eq!(clause.param_type(&PatternVariable::new("q")), None);
    assert_eq!(clause.param_types().len(), 1);
    assert_eq!(clause.to_string(), "(p: object#0, q) => p");
}
