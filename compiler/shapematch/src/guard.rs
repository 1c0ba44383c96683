//! Guards: the atomic checks a clause predicate is made of.
//!
//! The compiler emits guards as plain data so a compiled clause can be
//! inspected and printed. Each guard is then lowered once into a closure; the
//! predicate runs those closures in emission order and short-circuits on the
//! first failure. Type, length and key guards are emitted before any guard
//! that reads below them, so later guards only see positions whose shape has
//! already been checked. An unresolvable path makes a guard fail, never panic.

use std::fmt;

use shapematch_ir::{ExtractionPath, Name, TypeTag, Value};

/// Lowered guard, callable without inspecting the shape again.
pub(crate) type GuardFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// One conjunct of a clause predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Guard {
    /// `typeOf(path) == tag`
    TypeIs { path: ExtractionPath, tag: TypeTag },
    /// `length(path) == len`
    LenEq { path: ExtractionPath, len: usize },
    /// `containsKey(path, key)`
    HasKey { path: ExtractionPath, key: Name },
    /// `path == literal`
    EqLiteral { path: ExtractionPath, literal: Value },
    /// `first == second`, for a variable bound at two positions.
    SameValue {
        first: ExtractionPath,
        second: ExtractionPath,
    },
}

impl Guard {
    /// Evaluate the guard directly against a value.
    pub fn check(&self, value: &Value) -> bool {
        match self {
            Guard::TypeIs { path, tag } => path.resolve(value).is_some_and(|v| tag.admits(v)),
            Guard::LenEq { path, len } => {
                path.resolve(value).and_then(Value::count) == Some(*len)
            }
            Guard::HasKey { path, key } => path
                .resolve(value)
                .and_then(Value::as_map)
                .is_some_and(|m| m.contains_key(&**key)),
            Guard::EqLiteral { path, literal } => path.resolve(value) == Some(literal),
            Guard::SameValue { first, second } => match (first.resolve(value), second.resolve(value)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Lower into a closure. Root-path guards skip path resolution.
    pub(crate) fn lower(&self) -> GuardFn {
        match self.clone() {
            Guard::TypeIs { path, tag } if path.is_root() => {
                Box::new(move |v: &Value| tag.admits(v))
            }
            Guard::EqLiteral { path, literal } if path.is_root() => {
                Box::new(move |v: &Value| *v == literal)
            }
            Guard::LenEq { path, len } if path.is_root() => {
                Box::new(move |v: &Value| v.count() == Some(len))
            }
            guard => Box::new(move |v: &Value| guard.check(v)),
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::TypeIs { path, tag } => write!(f, "typeof({path}) == {tag}"),
            Guard::LenEq { path, len } => write!(f, "len({path}) == {len}"),
            Guard::HasKey { path, key } => write!(f, "{path} has \"{key}\""),
            Guard::EqLiteral { path, literal } => write!(f, "{path} == {literal}"),
            Guard::SameValue { first, second } => write!(f, "{first} == {second}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
