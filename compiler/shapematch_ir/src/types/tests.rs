use pretty_assertions::assert_eq;

use super::*;

fn person() -> TypeDef {
    TypeDef::new("Person")
        .with_fields(["name", "age"])
        .with_constructor(Constructor::new().mapped("name").mapped("age"))
}

#[test]
fn test_register_and_lookup() {
    let mut registry = TypeRegistry::new();
    let idx = registry.register(person()).unwrap();

    assert_eq!(registry.lookup("Person"), Some(idx));
    assert_eq!(registry.len(), 1);

    let def = registry.get(idx).unwrap();
    assert_eq!(def.name(), "Person");
    assert_eq!(def.field_index("age"), Some(1));
    assert_eq!(def.field_index("missing"), None);
    assert_eq!(def.constructor(2).map(Constructor::arity), Some(2));
    assert!(def.constructor(0).is_none());
}

#[test]
fn test_duplicate_type_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register(person()).unwrap();
    assert_eq!(
        registry.register(person()),
        Err(RegistryError::DuplicateType {
            name: "Person".into()
        })
    );
}

#[test]
fn test_duplicate_field_rejected() {
    let mut registry = TypeRegistry::new();
    let def = TypeDef::new("P").with_fields(["x", "x"]);
    assert_eq!(
        registry.register(def),
        Err(RegistryError::DuplicateField {
            type_name: "P".into(),
            field: "x".into()
        })
    );
}

#[test]
fn test_overloads_must_differ_in_arity() {
    let mut registry = TypeRegistry::new();
    let def = TypeDef::new("Point")
        .with_fields(["x", "y"])
        .with_constructor(Constructor::new())
        .with_constructor(Constructor::new().mapped("x").mapped("y"));
    assert!(registry.register(def).is_ok());

    let bad = TypeDef::new("Bad")
        .with_fields(["x"])
        .with_constructor(Constructor::new().mapped("x"))
        .with_constructor(Constructor::new().unmapped("x"));
    assert_eq!(
        registry.register(bad),
        Err(RegistryError::DuplicateConstructor {
            type_name: "Bad".into(),
            arity: 1
        })
    );
}

#[test]
fn test_unknown_mapping_accepted_at_registration() {
    let mut registry = TypeRegistry::new();
    let def = TypeDef::new("Odd")
        .with_fields(["a"])
        .with_constructor(Constructor::new().mapped("nope"));
    assert!(registry.register(def).is_ok());
}

#[test]
fn test_instantiate_checks_field_count() {
    let mut registry = TypeRegistry::new();
    let idx = registry.register(person()).unwrap();

    let ok = registry
        .instantiate(idx, vec![Value::string("John"), Value::int(52)])
        .unwrap();
    let obj = ok.as_object().unwrap();
    assert_eq!(obj.ty(), idx);
    assert_eq!(obj.field(1), Some(&Value::int(52)));

    assert_eq!(
        registry.instantiate(idx, vec![Value::string("John")]),
        Err(RegistryError::FieldCountMismatch {
            type_name: "Person".into(),
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn test_type_tag_admits() {
    let mut registry = TypeRegistry::new();
    let idx = registry.register(person()).unwrap();
    let john = registry
        .instantiate(idx, vec![Value::string("John"), Value::int(52)])
        .unwrap();

    assert!(TypeTag::Any.admits(&Value::Unit));
    assert!(TypeTag::Int.admits(&Value::int(1)));
    assert!(!TypeTag::Int.admits(&Value::float(1.0)));
    assert!(TypeTag::Sequence.admits(&Value::array(vec![])));
    assert!(TypeTag::Sequence.admits(&Value::list(vec![])));
    assert!(!TypeTag::Array.admits(&Value::list(vec![])));
    assert!(TypeTag::AnyObject.admits(&john));
    assert!(TypeTag::Object(idx).admits(&john));
    assert!(!TypeTag::Object(idx).admits(&Value::string("John")));
}

#[test]
fn test_type_tag_narrow() {
    let mut registry = TypeRegistry::new();
    let idx = registry.register(person()).unwrap();
    let person = TypeTag::Object(idx);

    assert_eq!(TypeTag::AnyObject.narrow(person), Some(person));
    assert_eq!(person.narrow(TypeTag::AnyObject), Some(person));
    assert_eq!(TypeTag::Any.narrow(TypeTag::Int), Some(TypeTag::Int));
    assert_eq!(TypeTag::Sequence.narrow(TypeTag::List), Some(TypeTag::List));
    assert_eq!(TypeTag::Int.narrow(TypeTag::Int), Some(TypeTag::Int));
    assert_eq!(TypeTag::Int.narrow(TypeTag::Str), None);
    assert_eq!(TypeTag::Map.narrow(person), None);
}
