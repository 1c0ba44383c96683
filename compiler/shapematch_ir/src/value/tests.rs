use pretty_assertions::assert_eq;

use super::*;
use crate::types::{TypeDef, TypeRegistry};

#[test]
fn test_factory_methods() {
    let s = Value::string("hello");
    assert_eq!(s.as_str(), Some("hello"));

    let list = Value::list(vec![Value::int(1), Value::int(2)]);
    assert_eq!(list.as_sequence().map(<[Value]>::len), Some(2));

    let map = Value::map_from([("x", Value::int(1))]);
    assert_eq!(map.as_map().and_then(|m| m.get("x")), Some(&Value::int(1)));
}

#[test]
fn test_no_cross_variant_equality() {
    assert_ne!(Value::int(1), Value::float(1.0));
    assert_ne!(Value::string("1"), Value::int(1));
    assert_ne!(
        Value::array(vec![Value::int(1)]),
        Value::list(vec![Value::int(1)])
    );
}

#[test]
fn test_structural_equality() {
    assert_eq!(
        Value::list(vec![Value::string("a"), Value::Bool(true)]),
        Value::list(vec![Value::string("a"), Value::Bool(true)])
    );
    assert_eq!(
        Value::map_from([("k", Value::Unit)]),
        Value::map_from([("k", Value::Unit)])
    );
}

#[test]
fn test_object_equality_requires_same_type() {
    let mut registry = TypeRegistry::new();
    let a = registry
        .register(TypeDef::new("A").with_fields(["v"]))
        .unwrap();
    let b = registry
        .register(TypeDef::new("B").with_fields(["v"]))
        .unwrap();

    let a1 = registry.instantiate(a, vec![Value::int(1)]).unwrap();
    let a2 = registry.instantiate(a, vec![Value::int(1)]).unwrap();
    let b1 = registry.instantiate(b, vec![Value::int(1)]).unwrap();

    assert_eq!(a1, a2);
    assert_ne!(a1, b1);
}

#[test]
fn test_count() {
    assert_eq!(Value::array(vec![Value::Unit; 3]).count(), Some(3));
    assert_eq!(Value::map_from([("a", Value::Unit)]).count(), Some(1));
    assert_eq!(Value::int(3).count(), None);
}

#[test]
fn test_display() {
    assert_eq!(Value::int(42).to_string(), "42");
    assert_eq!(Value::string("hi").to_string(), "\"hi\"");
    assert_eq!(
        Value::array(vec![Value::int(1), Value::int(2)]).to_string(),
        "#[1, 2]"
    );
    assert_eq!(Value::list(vec![Value::Char('x')]).to_string(), "['x']");
    assert_eq!(
        Value::map_from([("b", Value::int(2)), ("a", Value::int(1))]).to_string(),
        "{\"a\": 1, \"b\": 2}"
    );
}

#[test]
fn test_heap_shares_allocation() {
    let h1 = Heap::new(vec![1, 2, 3]);
    let h2 = h1.clone();
    assert!(Arc::ptr_eq(&h1.0, &h2.0));
    assert_eq!(*h1, *h2);
}
