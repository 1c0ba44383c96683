use pretty_assertions::assert_eq;
use shapematch_ir::{Constructor, TypeDef};

use super::*;

fn registry() -> (TypeRegistry, TypeIdx, TypeIdx) {
    let mut registry = TypeRegistry::new();
    let person = registry
        .register(
            TypeDef::new("Person")
                .with_fields(["name", "age"])
                .with_constructor(Constructor::new().mapped("name").mapped("age")),
        )
        .unwrap();
    let odd = registry
        .register(
            TypeDef::new("Odd")
                .with_fields(["a"])
                .with_constructor(Constructor::new().unmapped("a"))
                .with_constructor(Constructor::new().mapped("a").mapped_as("b", "missing")),
        )
        .unwrap();
    (registry, person, odd)
}

#[test]
fn resolves_mapped_parameter() {
    let (registry, person, _) = registry();
    let resolver = PropertyResolver::new(&registry);

    let age = resolver.resolve_param(person, 2, 1).unwrap();
    assert_eq!(age.index, 1);
    assert_eq!(&*age.name, "age");
    assert_eq!(age.step().to_string(), ".age");
}

#[test]
fn missing_mapping() {
    let (registry, _, odd) = registry();
    let resolver = PropertyResolver::new(&registry);

    assert_eq!(
        resolver.resolve_param(odd, 1, 0),
        Err(MatchError::MissingMapping {
            type_name: "Odd".into(),
            index: 0,
            param: "a".into(),
        })
    );
}

#[test]
fn unknown_mapped_field() {
    let (registry, _, odd) = registry();
    let resolver = PropertyResolver::new(&registry);

    assert!(resolver.resolve_param(odd, 2, 0).is_ok());
    assert_eq!(
        resolver.resolve_param(odd, 2, 1),
        Err(MatchError::UnknownField {
            type_name: "Odd".into(),
            field: "missing".into(),
        })
    );
}

#[test]
fn no_constructor_with_arity() {
    let (registry, person, _) = registry();
    let resolver = PropertyResolver::new(&registry);

    assert!(matches!(
        resolver.constructor(person, 3),
        Err(MatchError::UnsupportedShape { .. })
    ));
}

#[test]
fn unknown_type() {
    let (_, person, _) = registry();
    let empty = TypeRegistry::new();
    let resolver = PropertyResolver::new(&empty);

    assert_eq!(
        resolver.resolve_field(person, "name"),
        Err(MatchError::UnknownType { ty: person })
    );
}

#[test]
fn resolve_field_by_name() {
    let (registry, person, _) = registry();
    let resolver = PropertyResolver::new(&registry);

    assert_eq!(resolver.resolve_field(person, "name").unwrap().index, 0);
    assert!(matches!(
        resolver.resolve_field(person, "height"),
        Err(MatchError::UnknownField { .. })
    ));
}
