//! Type metadata: the registry that maps constructor parameters to fields.
//!
//! Target types are registered once, up front, with an explicit table of
//! readable fields and constructors. Each constructor parameter either names
//! the field it initializes or carries no mapping at all. The clause compiler
//! reads this table to connect a positional `Construct` argument to the
//! property it has to compare or extract.
//!
//! # Lookup Cost
//!
//! Types are stored in an arena and addressed by a dense [`TypeIdx`]; fields
//! are addressed by declaration-order index. Names are only consulted while a
//! clause compiles, never while a value is matched.
//!
//! Mapped field names are deliberately not validated at registration. A
//! constructor that names a missing field is only rejected when a clause that
//! uses it compiles.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::value::{ObjectValue, Value};
use crate::Name;

/// Dense index of a registered type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdx(u32);

impl TypeIdx {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Runtime type test used by `typeOf(value) == target` checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Admits every value. Emits no check.
    Any,
    Unit,
    Bool,
    Int,
    Float,
    Char,
    Str,
    /// Fixed-size sequence.
    Array,
    /// Growable sequence.
    List,
    /// Either an array or a list.
    Sequence,
    Map,
    /// An instance of any registered type.
    AnyObject,
    /// An instance of exactly this registered type.
    Object(TypeIdx),
}

impl TypeTag {
    /// Whether `value` has this runtime type.
    pub fn admits(self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Any, _)
            | (TypeTag::Unit, Value::Unit)
            | (TypeTag::Bool, Value::Bool(_))
            | (TypeTag::Int, Value::Int(_))
            | (TypeTag::Float, Value::Float(_))
            | (TypeTag::Char, Value::Char(_))
            | (TypeTag::Str, Value::Str(_))
            | (TypeTag::Array, Value::Array(_))
            | (TypeTag::List, Value::List(_))
            | (TypeTag::Sequence, Value::Array(_) | Value::List(_))
            | (TypeTag::Map, Value::Map(_))
            | (TypeTag::AnyObject, Value::Object(_)) => true,
            (TypeTag::Object(ty), Value::Object(o)) => o.ty() == ty,
            _ => false,
        }
    }

    /// The stricter of two tags, when one admits a subset of the other.
    ///
    /// Returns `None` for tags that admit disjoint sets of values.
    pub fn narrow(self, other: TypeTag) -> Option<TypeTag> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (TypeTag::Any, t) | (t, TypeTag::Any) => Some(t),
            (TypeTag::AnyObject, t @ TypeTag::Object(_))
            | (t @ TypeTag::Object(_), TypeTag::AnyObject) => Some(t),
            (TypeTag::Sequence, t @ (TypeTag::Array | TypeTag::List))
            | (t @ (TypeTag::Array | TypeTag::List), TypeTag::Sequence) => Some(t),
            _ => None,
        }
    }

    /// Whether this tag accepts everything, so no check needs to be emitted.
    #[inline]
    pub fn is_any(self) -> bool {
        matches!(self, TypeTag::Any)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Any => write!(f, "any"),
            TypeTag::Unit => write!(f, "unit"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Char => write!(f, "char"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Array => write!(f, "array"),
            TypeTag::List => write!(f, "list"),
            TypeTag::Sequence => write!(f, "sequence"),
            TypeTag::Map => write!(f, "map"),
            TypeTag::AnyObject => write!(f, "object"),
            TypeTag::Object(ty) => write!(f, "object{ty}"),
        }
    }
}

/// Errors raised while building a registry or instantiating a type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type `{name}` is already registered")]
    DuplicateType { name: String },

    #[error("type `{type_name}` declares field `{field}` twice")]
    DuplicateField { type_name: String, field: String },

    #[error("type `{type_name}` declares two constructors taking {arity} parameters")]
    DuplicateConstructor { type_name: String, arity: usize },

    #[error("registry is full")]
    TooManyTypes,

    #[error("type {ty} is not registered")]
    UnknownType { ty: TypeIdx },

    #[error("type `{type_name}` has {expected} fields, got {got} values")]
    FieldCountMismatch {
        type_name: String,
        expected: usize,
        got: usize,
    },
}

/// One constructor parameter and the field it initializes, if known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CtorParam {
    /// Parameter name, for diagnostics.
    pub name: Name,
    /// Field this parameter maps to. `None` when the parameter carries no
    /// mapping metadata.
    pub maps_to: Option<Name>,
}

/// A constructor: an ordered parameter list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constructor {
    params: Vec<CtorParam>,
}

impl Constructor {
    /// A parameterless constructor.
    pub fn new() -> Self {
        Constructor { params: Vec::new() }
    }

    /// Append a parameter that initializes the field of the same name.
    #[must_use]
    pub fn mapped(self, field: &str) -> Self {
        self.mapped_as(field, field)
    }

    /// Append a parameter named `param` that initializes `field`.
    #[must_use]
    pub fn mapped_as(mut self, param: &str, field: &str) -> Self {
        self.params.push(CtorParam {
            name: Arc::from(param),
            maps_to: Some(Arc::from(field)),
        });
        self
    }

    /// Append a parameter with no mapping metadata.
    #[must_use]
    pub fn unmapped(mut self, param: &str) -> Self {
        self.params.push(CtorParam {
            name: Arc::from(param),
            maps_to: None,
        });
        self
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> &[CtorParam] {
        &self.params
    }
}

/// Metadata for one target type.
#[derive(Clone, Debug)]
pub struct TypeDef {
    name: Name,
    fields: Vec<Name>,
    constructors: Vec<Constructor>,
}

impl TypeDef {
    pub fn new(name: &str) -> Self {
        TypeDef {
            name: Arc::from(name),
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Declare readable fields, in order.
    #[must_use]
    pub fn with_fields<'a>(mut self, fields: impl IntoIterator<Item = &'a str>) -> Self {
        self.fields.extend(fields.into_iter().map(Arc::from));
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, ctor: Constructor) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Name] {
        &self.fields
    }

    /// Declaration-order index of a field.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| &**f == field)
    }

    /// The constructor taking exactly `arity` parameters.
    pub fn constructor(&self, arity: usize) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.arity() == arity)
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    fn validate(&self) -> Result<(), RegistryError> {
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].contains(field) {
                return Err(RegistryError::DuplicateField {
                    type_name: self.name.to_string(),
                    field: field.to_string(),
                });
            }
        }
        for (i, ctor) in self.constructors.iter().enumerate() {
            if self.constructors[..i]
                .iter()
                .any(|c| c.arity() == ctor.arity())
            {
                return Err(RegistryError::DuplicateConstructor {
                    type_name: self.name.to_string(),
                    arity: ctor.arity(),
                });
            }
        }
        Ok(())
    }
}

/// Arena of registered types.
///
/// Built once during startup, then shared read-only (typically behind an
/// `Arc`). Lookups never lock.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDef>,
    by_name: FxHashMap<Name, TypeIdx>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type and return its index.
    pub fn register(&mut self, def: TypeDef) -> Result<TypeIdx, RegistryError> {
        if self.by_name.contains_key(&def.name) {
            return Err(RegistryError::DuplicateType {
                name: def.name.to_string(),
            });
        }
        def.validate()?;

        let raw = u32::try_from(self.types.len()).map_err(|_| RegistryError::TooManyTypes)?;
        let idx = TypeIdx(raw);
        self.by_name.insert(def.name.clone(), idx);
        self.types.push(def);
        Ok(idx)
    }

    pub fn get(&self, ty: TypeIdx) -> Option<&TypeDef> {
        self.types.get(ty.index())
    }

    pub fn lookup(&self, name: &str) -> Option<TypeIdx> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Build an instance from field values in declaration order.
    pub fn instantiate(&self, ty: TypeIdx, fields: Vec<Value>) -> Result<Value, RegistryError> {
        let def = self.get(ty).ok_or(RegistryError::UnknownType { ty })?;
        if fields.len() != def.fields.len() {
            return Err(RegistryError::FieldCountMismatch {
                type_name: def.name.to_string(),
                expected: def.fields.len(),
                got: fields.len(),
            });
        }
        Ok(Value::Object(ObjectValue::new(ty, def.name.clone(), fields)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
