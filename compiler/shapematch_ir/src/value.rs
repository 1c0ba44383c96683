//! Runtime values matched by compiled clauses.
//!
//! # Arc Enforcement
//!
//! All heap payloads go through factory methods on `Value`. The `Heap<T>`
//! wrapper has a crate-private constructor, so downstream code cannot build
//! heap variants by hand:
//!
//! ```text
//! let s = Value::string("hello");                  // OK
//! let xs = Value::list(vec![Value::int(1)]);       // OK
//! let bad = Value::Str(Heap::new("x".into()));     // ERROR: Heap::new is pub(crate)
//! ```
//!
//! # Thread Safety
//!
//! Values are immutable once built and share payloads through `Arc`, so a
//! value can be matched from several threads at once.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::types::TypeIdx;
use crate::Name;

/// Shared, immutable heap payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    // Primitives (inline)
    /// Unit value.
    Unit,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Character value.
    Char(char),

    // Heap types
    /// String value.
    Str(Heap<String>),
    /// Fixed-size sequence.
    Array(Heap<Vec<Value>>),
    /// Growable sequence.
    List(Heap<Vec<Value>>),
    /// Map from string keys to values, ordered by key.
    Map(Heap<BTreeMap<String, Value>>),
    /// Instance of a registered type.
    Object(ObjectValue),
}

/// Instance of a type registered in a `TypeRegistry`.
///
/// Field values are stored in the type's declaration order, so a resolved
/// field index reads a property without any name lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectValue {
    ty: TypeIdx,
    type_name: Name,
    fields: Heap<Vec<Value>>,
}

impl ObjectValue {
    pub(crate) fn new(ty: TypeIdx, type_name: Name, fields: Vec<Value>) -> Self {
        ObjectValue {
            ty,
            type_name,
            fields: Heap::new(fields),
        }
    }

    /// Index of the instantiated type.
    #[inline]
    pub fn ty(&self) -> TypeIdx {
        self.ty
    }

    /// Name of the instantiated type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field value at a declaration-order index.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// All field values in declaration order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

// Factory Methods (the only way to construct heap values)

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a fixed-size sequence.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    /// Create a growable sequence.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value.
    #[inline]
    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create a map value from key/value pairs. Later duplicates win.
    pub fn map_from<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// Accessors

impl Value {
    /// Name of the value's runtime type, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(o) => o.type_name(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Elements of an array or a list.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Number of elements for sequences and entries for maps.
    pub fn count(&self) -> Option<usize> {
        match self {
            Value::Array(items) | Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

// Conversions for literal construction

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<ObjectValue> for Value {
    fn from(o: ObjectValue) -> Self {
        Value::Object(o)
    }
}

/// Structural equality. Never coerces across variants: `Int(1) != Float(1.0)`
/// and an array never equals a list with the same elements.
impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "literal matching is exact by definition")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ty == b.ty && a.fields == b.fields,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::Str(s) => write!(f, "\"{}\"", s.as_str()),
            Value::Array(items) => {
                write!(f, "#[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{k}\": {v}")?;
                }
                write!(f, "}}")
            }
            Value::Object(o) => {
                write!(f, "{}(", o.type_name())?;
                write_items(f, o.fields())?;
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
