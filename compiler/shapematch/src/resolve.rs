//! Property-mapping resolution.
//!
//! Connects a positional constructor argument to the readable field it
//! initializes, using the metadata registered on the target type. Lookups are
//! pure and run only while a clause compiles; the result is a field index
//! baked into an [`ExtractionPath`](shapematch_ir::ExtractionPath) step.

use shapematch_ir::{Constructor, Name, PathStep, TypeDef, TypeIdx, TypeRegistry};

use crate::error::{MatchError, MatchResult};

/// A field resolved to its declaration-order index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    pub index: u32,
    pub name: Name,
}

impl ResolvedField {
    /// The path step that reads this field.
    pub fn step(&self) -> PathStep {
        PathStep::Field {
            index: self.index,
            name: self.name.clone(),
        }
    }
}

/// Read-only view over a registry's property mappings.
#[derive(Copy, Clone, Debug)]
pub struct PropertyResolver<'r> {
    registry: &'r TypeRegistry,
}

impl<'r> PropertyResolver<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        PropertyResolver { registry }
    }

    pub fn type_def(&self, ty: TypeIdx) -> MatchResult<&'r TypeDef> {
        self.registry
            .get(ty)
            .ok_or(MatchError::UnknownType { ty })
    }

    /// The constructor of `ty` taking exactly `arity` arguments.
    pub fn constructor(&self, ty: TypeIdx, arity: usize) -> MatchResult<&'r Constructor> {
        let def = self.type_def(ty)?;
        def.constructor(arity)
            .ok_or_else(|| MatchError::UnsupportedShape {
                reason: format!("type `{}` has no constructor taking {arity} arguments", def.name()),
            })
    }

    /// The field initialized by parameter `index` of `ty`'s `arity`-argument
    /// constructor.
    ///
    /// Fails with `MissingMapping` when the parameter carries no mapping and
    /// with `UnknownField` when the mapped field is not declared on `ty`.
    pub fn resolve_param(
        &self,
        ty: TypeIdx,
        arity: usize,
        index: usize,
    ) -> MatchResult<ResolvedField> {
        let ctor = self.constructor(ty, arity)?;
        let def = self.type_def(ty)?;
        let param = ctor
            .params()
            .get(index)
            .ok_or_else(|| MatchError::UnsupportedShape {
                reason: format!(
                    "argument {index} is out of range for `{}`'s {arity}-argument constructor",
                    def.name()
                ),
            })?;
        let field = param
            .maps_to
            .as_deref()
            .ok_or_else(|| MatchError::MissingMapping {
                type_name: def.name().to_owned(),
                index,
                param: param.name.to_string(),
            })?;
        self.resolve_field(ty, field)
    }

    /// A field of `ty` by name.
    pub fn resolve_field(&self, ty: TypeIdx, field: &str) -> MatchResult<ResolvedField> {
        let def = self.type_def(ty)?;
        let unknown = || MatchError::UnknownField {
            type_name: def.name().to_owned(),
            field: field.to_owned(),
        };
        let position = def.field_index(field).ok_or_else(unknown)?;
        let index = u32::try_from(position).map_err(|_| unknown())?;
        Ok(ResolvedField {
            index,
            name: def.fields()[position].clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
