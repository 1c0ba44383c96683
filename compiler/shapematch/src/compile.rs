//! Clause compiler: shape + typed body to predicate/extractor pair.
//!
//! Compilation walks the shape once, top-down, carrying the extraction path
//! of the current position:
//!
//! - `Construct` checks the runtime type, picks the constructor whose arity
//!   matches, and descends into each argument through the field its
//!   parameter maps to.
//! - `FieldInit` does the same, then descends into each named field.
//! - `Literal` compares the position for equality.
//! - `Wildcard` binds its variable and checks its runtime type: the body's
//!   parameter type, narrowed by the clause's declared type when there is
//!   one. A repeated variable compares the two positions instead of
//!   rebinding.
//! - `FixedSequence` checks type and exact length, then descends by index.
//! - `KeyedMap` checks type and key presence, then descends by key.
//!
//! Every error surfaces here. Matching never consults the shape again: the
//! predicate runs pre-lowered guards and the extractor follows pre-resolved
//! paths.

use std::fmt;

use rustc_hash::FxHashMap;
use shapematch_ir::{
    Clause, ConstructShape, ExtractionPath, Name, PathStep, PatternVariable, SequenceKind,
    ShapeNode, TypeRegistry, TypeTag, Value,
};
use smallvec::SmallVec;
use tracing::debug;

use crate::bindings::{Binding, BindingTable};
use crate::body::ClauseBody;
use crate::config::CompilerConfig;
use crate::error::{MatchError, MatchResult};
use crate::guard::{Guard, GuardFn};
use crate::resolve::PropertyResolver;

type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type Extractor<T> = Box<dyn Fn(&Value) -> MatchResult<T> + Send + Sync>;

/// A clause compiled into directly callable functions.
///
/// Immutable once built; safe to share across threads.
pub struct CompiledClause<T> {
    guards: Vec<Guard>,
    bindings: Vec<(PatternVariable, ExtractionPath)>,
    predicate: Predicate,
    extractor: Extractor<T>,
}

impl<T> CompiledClause<T> {
    /// Whether `value` has the clause's shape.
    #[inline]
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Extract the bound parameters from `value` and run the body.
    ///
    /// Only meaningful after [`matches`](Self::matches) accepted `value`.
    pub fn extract(&self, value: &Value) -> MatchResult<T> {
        (self.extractor)(value)
    }

    /// The conjuncts of the predicate, in evaluation order.
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Where each body parameter is read from, in parameter order.
    pub fn bindings(&self) -> &[(PatternVariable, ExtractionPath)] {
        &self.bindings
    }
}

impl<T> fmt::Debug for CompiledClause<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledClause")
            .field("guards", &self.guards)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// Compiles clauses against one type registry.
#[derive(Copy, Clone, Debug)]
pub struct ClauseCompiler<'r> {
    resolver: PropertyResolver<'r>,
    config: CompilerConfig,
}

impl<'r> ClauseCompiler<'r> {
    pub fn new(registry: &'r TypeRegistry, config: CompilerConfig) -> Self {
        ClauseCompiler {
            resolver: PropertyResolver::new(registry),
            config,
        }
    }

    /// Compile `clause` with `body` as its computation.
    pub fn compile<Args, T, B>(&self, clause: &Clause, body: B) -> MatchResult<CompiledClause<T>>
    where
        B: ClauseBody<Args, T>,
        Args: 'static,
        T: 'static,
    {
        let params = clause.params();
        let tags = B::param_tags();

        let mut declared = FxHashMap::default();
        for param in params {
            if declared.insert(param.clone(), TypeTag::Any).is_some() {
                return Err(MatchError::DuplicateParameter {
                    name: param.name().to_owned(),
                });
            }
        }
        if tags.len() != params.len() {
            return Err(MatchError::ArityMismatch {
                declared: params.len(),
                body: tags.len(),
            });
        }
        for (param, _) in clause.param_types() {
            if !declared.contains_key(param) {
                return Err(MatchError::UndeclaredVariable {
                    name: param.name().to_owned(),
                });
            }
        }
        for (param, body_tag) in params.iter().zip(tags) {
            let tag = match clause.param_type(param) {
                Some(declared_tag) => {
                    declared_tag
                        .narrow(body_tag)
                        .ok_or_else(|| MatchError::UnsupportedShape {
                            reason: format!(
                                "parameter `{param}` is declared as {declared_tag} but the body takes {body_tag}"
                            ),
                        })?
                }
                None => body_tag,
            };
            declared.insert(param.clone(), tag);
        }

        let limit = self.config.max_shape_depth;
        if clause.shape().depth() > limit {
            return Err(MatchError::ShapeTooDeep { limit });
        }

        let mut walker = ShapeWalker {
            resolver: self.resolver,
            declared: &declared,
            table: BindingTable::new(),
            guards: Vec::new(),
        };
        walker.walk(clause.shape(), &ExtractionPath::root())?;
        let ShapeWalker { table, guards, .. } = walker;

        let bindings = params
            .iter()
            .map(|param| {
                table
                    .lookup(param)
                    .map(|path| (param.clone(), path.clone()))
                    .ok_or_else(|| MatchError::UnboundParameter {
                        name: param.name().to_owned(),
                    })
            })
            .collect::<MatchResult<Vec<_>>>()?;

        debug!(
            clause = %clause,
            guards = guards.len(),
            params = bindings.len(),
            "compiled clause"
        );

        let checks: Vec<GuardFn> = guards.iter().map(Guard::lower).collect();
        let predicate: Predicate =
            Box::new(move |value: &Value| checks.iter().all(|check| check(value)));

        let paths: Vec<ExtractionPath> = bindings.iter().map(|(_, path)| path.clone()).collect();
        let extractor: Extractor<T> = Box::new(move |value: &Value| {
            let args = paths
                .iter()
                .map(|path| {
                    path.resolve(value)
                        .ok_or_else(|| MatchError::NoValueAt { path: path.clone() })
                })
                .collect::<MatchResult<SmallVec<[&Value; 4]>>>()?;
            body.invoke(&args)
        });

        Ok(CompiledClause {
            guards,
            bindings,
            predicate,
            extractor,
        })
    }
}

/// State of one shape walk: emitted guards and variable bindings.
struct ShapeWalker<'a, 'r> {
    resolver: PropertyResolver<'r>,
    declared: &'a FxHashMap<PatternVariable, TypeTag>,
    table: BindingTable,
    guards: Vec<Guard>,
}

impl ShapeWalker<'_, '_> {
    fn walk(&mut self, node: &ShapeNode, path: &ExtractionPath) -> MatchResult<()> {
        match node {
            ShapeNode::Construct(shape) => {
                self.type_is(path, TypeTag::Object(shape.target));
                self.construct_args(shape, path)
            }
            ShapeNode::FieldInit { base, fields } => {
                self.type_is(path, TypeTag::Object(base.target));
                self.construct_args(base, path)?;
                reject_duplicates(fields, "field")?;
                for (name, sub) in fields {
                    let field = self.resolver.resolve_field(base.target, name)?;
                    self.walk(sub, &path.child(field.step()))?;
                }
                Ok(())
            }
            ShapeNode::Literal(literal) => {
                self.guards.push(Guard::EqLiteral {
                    path: path.clone(),
                    literal: literal.clone(),
                });
                Ok(())
            }
            ShapeNode::Wildcard(var) => self.bind(var, path),
            ShapeNode::Discard => Ok(()),
            ShapeNode::FixedSequence { kind, elements } => {
                let tag = match kind {
                    SequenceKind::Array => TypeTag::Array,
                    SequenceKind::List => TypeTag::List,
                };
                self.type_is(path, tag);
                self.guards.push(Guard::LenEq {
                    path: path.clone(),
                    len: elements.len(),
                });
                for (i, element) in elements.iter().enumerate() {
                    let index = u32::try_from(i).map_err(|_| MatchError::UnsupportedShape {
                        reason: "sequence shape is too long".to_owned(),
                    })?;
                    self.walk(element, &path.child(PathStep::Index(index)))?;
                }
                Ok(())
            }
            ShapeNode::KeyedMap { entries } => {
                self.type_is(path, TypeTag::Map);
                reject_duplicates(entries, "key")?;
                for (key, _) in entries {
                    self.guards.push(Guard::HasKey {
                        path: path.clone(),
                        key: key.clone(),
                    });
                }
                for (key, sub) in entries {
                    self.walk(sub, &path.child(PathStep::Key(key.clone())))?;
                }
                Ok(())
            }
        }
    }

    /// Descend into constructor arguments through their mapped fields.
    ///
    /// Discarded arguments are never read, so their parameters need no mapping.
    fn construct_args(&mut self, shape: &ConstructShape, path: &ExtractionPath) -> MatchResult<()> {
        let arity = shape.args.len();
        self.resolver.constructor(shape.target, arity)?;
        for (index, arg) in shape.args.iter().enumerate() {
            if matches!(arg, ShapeNode::Discard) {
                continue;
            }
            let field = self.resolver.resolve_param(shape.target, arity, index)?;
            self.walk(arg, &path.child(field.step()))?;
        }
        Ok(())
    }

    fn bind(&mut self, var: &PatternVariable, path: &ExtractionPath) -> MatchResult<()> {
        let tag = *self
            .declared
            .get(var)
            .ok_or_else(|| MatchError::UndeclaredVariable {
                name: var.name().to_owned(),
            })?;
        match self.table.bind(var, path.clone()) {
            Binding::Fresh => {
                if !tag.is_any() {
                    self.type_is(path, tag);
                }
            }
            Binding::Repeated(first) => self.guards.push(Guard::SameValue {
                first,
                second: path.clone(),
            }),
        }
        Ok(())
    }

    fn type_is(&mut self, path: &ExtractionPath, tag: TypeTag) {
        self.guards.push(Guard::TypeIs {
            path: path.clone(),
            tag,
        });
    }
}

fn reject_duplicates(entries: &[(Name, ShapeNode)], what: &str) -> MatchResult<()> {
    for (i, (name, _)) in entries.iter().enumerate() {
        if entries[..i].iter().any(|(earlier, _)| earlier == name) {
            return Err(MatchError::UnsupportedShape {
                reason: format!("{what} `{name}` appears twice"),
            });
        }
    }
    Ok(())
}
