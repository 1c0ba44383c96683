use pretty_assertions::assert_eq;
use shapematch_ir::PathStep;

use super::*;

fn at(i: u32) -> ExtractionPath {
    ExtractionPath::root().child(PathStep::Index(i))
}

fn sample() -> Value {
    Value::list(vec![Value::int(5), Value::int(5), Value::int(0)])
}

#[test]
fn check_and_lowered_closure_agree() {
    let guards = [
        Guard::TypeIs {
            path: ExtractionPath::root(),
            tag: TypeTag::List,
        },
        Guard::TypeIs {
            path: at(0),
            tag: TypeTag::Int,
        },
        Guard::LenEq {
            path: ExtractionPath::root(),
            len: 3,
        },
        Guard::EqLiteral {
            path: at(2),
            literal: Value::int(0),
        },
        Guard::SameValue {
            first: at(0),
            second: at(1),
        },
        Guard::HasKey {
            path: ExtractionPath::root(),
            key: "x".into(),
        },
    ];
    let values = [
        sample(),
        Value::list(vec![Value::int(5), Value::int(6), Value::int(0)]),
        Value::array(vec![Value::int(1)]),
        Value::map_from([("x", Value::Unit)]),
        Value::int(0),
    ];

    for guard in &guards {
        let lowered = guard.lower();
        for value in &values {
            assert_eq!(guard.check(value), lowered(value), "{guard} on {value}");
        }
    }
}

#[test]
fn same_value_compares_positions() {
    let guard = Guard::SameValue {
        first: at(0),
        second: at(1),
    };
    assert!(guard.check(&sample()));
    assert!(!guard.check(&Value::list(vec![Value::int(5), Value::int(6)])));
}

#[test]
fn unresolvable_path_fails() {
    let guard = Guard::EqLiteral {
        path: at(9),
        literal: Value::int(0),
    };
    assert!(!guard.check(&sample()));
    assert!(!guard.lower()(&Value::Unit));
}

#[test]
fn literal_equality_does_not_coerce() {
    let guard = Guard::EqLiteral {
        path: ExtractionPath::root(),
        literal: Value::int(1),
    };
    assert!(guard.check(&Value::int(1)));
    assert!(!guard.check(&Value::float(1.0)));
}

#[test]
fn display() {
    let age = ExtractionPath::root().child(PathStep::Field {
        index: 1,
        name: "age".into(),
    });
    assert_eq!(
        Guard::EqLiteral {
            path: age.clone(),
            literal: Value::int(52),
        }
        .to_string(),
        "$.age == 52"
    );
    assert_eq!(
        Guard::TypeIs {
            path: age,
            tag: TypeTag::Int,
        }
        .to_string(),
        "typeof($.age) == int"
    );
    assert_eq!(
        Guard::SameValue {
            first: at(0),
            second: at(1),
        }
        .to_string(),
        "$[0] == $[1]"
    );
    assert_eq!(
        Guard::HasKey {
            path: ExtractionPath::root(),
            key: "x".into(),
        }
        .to_string(),
        "$ has \"x\""
    );
}
