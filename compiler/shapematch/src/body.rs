//! Typed clause bodies.
//!
//! A clause body is an ordinary closure such as `|name: String, age: i64| ..`.
//! Every parameter type implements [`FromValue`], which names the runtime type
//! tag the compiler checks before extraction. [`ClauseBody`] is implemented
//! for closures of up to four such parameters, so the extractor calls the body
//! directly with converted arguments.

use std::collections::BTreeMap;

use shapematch_ir::{ObjectValue, TypeTag, Value};
use smallvec::{smallvec, SmallVec};

use crate::error::{MatchError, MatchResult};

/// Runtime type tags of a body's parameters, in order.
pub type ParamTags = SmallVec<[TypeTag; 4]>;

/// Conversion from a matched sub-value into a body argument.
pub trait FromValue: Sized {
    /// Runtime type a value must have to convert. [`TypeTag::Any`] emits no
    /// check.
    const TAG: TypeTag;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const TAG: TypeTag = TypeTag::Any;

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for i64 {
    const TAG: TypeTag = TypeTag::Int;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    const TAG: TypeTag = TypeTag::Float;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl FromValue for bool {
    const TAG: TypeTag = TypeTag::Bool;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for char {
    const TAG: TypeTag = TypeTag::Char;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_char()
    }
}

impl FromValue for String {
    const TAG: TypeTag = TypeTag::Str;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromValue for ObjectValue {
    const TAG: TypeTag = TypeTag::AnyObject;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FromValue for Vec<Value> {
    const TAG: TypeTag = TypeTag::Sequence;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_sequence().map(<[Value]>::to_vec)
    }
}

impl FromValue for BTreeMap<String, Value> {
    const TAG: TypeTag = TypeTag::Map;

    fn from_value(value: &Value) -> Option<Self> {
        value.as_map().cloned()
    }
}

fn convert<A: FromValue>(arg: Option<&&Value>) -> MatchResult<A> {
    let value = arg.ok_or_else(|| MatchError::ExtractionFailed {
        expected: A::TAG,
        found: "nothing".to_owned(),
    })?;
    A::from_value(value).ok_or_else(|| MatchError::ExtractionFailed {
        expected: A::TAG,
        found: value.type_name().to_owned(),
    })
}

/// A strongly typed clause body taking `Args`.
///
/// `Args` is a tuple of the parameter types and only serves to keep the
/// per-arity implementations apart.
pub trait ClauseBody<Args, T>: Send + Sync + 'static {
    fn param_tags() -> ParamTags;

    /// Convert `args` and call the body.
    fn invoke(&self, args: &[&Value]) -> MatchResult<T>;
}

macro_rules! impl_clause_body {
    ($($arg:ident),*) => {
        impl<Func, T, $($arg,)*> ClauseBody<($($arg,)*), T> for Func
        where
            Func: Fn($($arg),*) -> T + Send + Sync + 'static,
            $($arg: FromValue,)*
        {
            fn param_tags() -> ParamTags {
                smallvec![$($arg::TAG),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, reason = "generated per arity")]
            fn invoke(&self, args: &[&Value]) -> MatchResult<T> {
                let mut args = args.iter();
                $(let $arg = convert::<$arg>(args.next())?;)*
                Ok(self($($arg),*))
            }
        }
    };
}

impl_clause_body!();
impl_clause_body!(A1);
impl_clause_body!(A1, A2);
impl_clause_body!(A1, A2, A3);
impl_clause_body!(A1, A2, A3, A4);
