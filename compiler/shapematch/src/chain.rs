//! Matcher chain: ordered clauses plus a mandatory fallback.
//!
//! A chain is `Building` until its fallback is attached and `Ready` after.
//! There is no way back. Evaluation is first-match-wins in declaration order.
//!
//! # Modes
//!
//! - **Lazy** (`MatcherChain::new`): unbound and reusable. `append` only
//!   records the clause; compilation happens in [`MatcherChain::compile`] or,
//!   at the latest, when the fallback is attached. A `Ready` chain is
//!   immutable and can be evaluated from many threads at once.
//! - **Eager** (`MatcherChain::bound`): bound to one value. Each `append`
//!   compiles the clause and tries it immediately; the first hit freezes the
//!   result. Attaching the fallback computes the result if nothing matched.
//!
//! A clause that fails to compile poisons the chain: every later `append`,
//! `compile` or `attach_fallback` returns the same error, so a chain never
//! becomes `Ready` with fewer clauses than were declared.
//!
//! Results are never cached across evaluations.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use shapematch_ir::{Clause, TypeRegistry, Value};
use tracing::{debug, trace};

use crate::body::ClauseBody;
use crate::compile::{ClauseCompiler, CompiledClause};
use crate::config::CompilerConfig;
use crate::error::{MatchError, MatchResult};

type Fallback<T> = Box<dyn Fn() -> T + Send + Sync>;
type Deferred<T> =
    Box<dyn FnOnce(&TypeRegistry, CompilerConfig) -> MatchResult<CompiledClause<T>> + Send + Sync>;

/// Lifecycle state of a chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChainState {
    /// Clauses may be appended.
    Building,
    /// The fallback is attached; the chain can run.
    Ready,
}

/// How a chain is executed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChainMode {
    Lazy,
    Eager,
}

impl fmt::Display for ChainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainMode::Lazy => write!(f, "lazy"),
            ChainMode::Eager => write!(f, "eager"),
        }
    }
}

enum Execution<T> {
    Lazy { pending: Vec<Deferred<T>> },
    Eager { value: Value, result: Option<T> },
}

/// An ordered sequence of compiled clauses with one fallback.
pub struct MatcherChain<T> {
    registry: Arc<TypeRegistry>,
    config: CompilerConfig,
    execution: Execution<T>,
    clauses: Vec<CompiledClause<T>>,
    fallback: Option<Fallback<T>>,
    declared: usize,
    failure: Option<MatchError>,
}

impl<T: 'static> MatcherChain<T> {
    /// An unbound, reusable chain.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, CompilerConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: CompilerConfig) -> Self {
        MatcherChain {
            registry,
            config,
            execution: Execution::Lazy {
                pending: Vec::new(),
            },
            clauses: Vec::new(),
            fallback: None,
            declared: 0,
            failure: None,
        }
    }

    /// A chain bound to `value`, matched clause by clause as they are appended.
    pub fn bound(registry: Arc<TypeRegistry>, value: Value) -> Self {
        Self::bound_with_config(registry, value, CompilerConfig::default())
    }

    pub fn bound_with_config(
        registry: Arc<TypeRegistry>,
        value: Value,
        config: CompilerConfig,
    ) -> Self {
        MatcherChain {
            registry,
            config,
            execution: Execution::Eager {
                value,
                result: None,
            },
            clauses: Vec::new(),
            fallback: None,
            declared: 0,
            failure: None,
        }
    }

    pub fn state(&self) -> ChainState {
        if self.fallback.is_some() {
            ChainState::Ready
        } else {
            ChainState::Building
        }
    }

    pub fn mode(&self) -> ChainMode {
        match self.execution {
            Execution::Lazy { .. } => ChainMode::Lazy,
            Execution::Eager { .. } => ChainMode::Eager,
        }
    }

    /// Number of clauses appended, compiled or not.
    pub fn len(&self) -> usize {
        self.declared
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The compiled clauses, in declaration order.
    pub fn clauses(&self) -> &[CompiledClause<T>] {
        &self.clauses
    }

    /// Append a clause.
    ///
    /// In eager mode the clause is compiled and tried against the bound value
    /// right away, so compile errors surface here.
    pub fn append<Args, B>(&mut self, clause: Clause, body: B) -> MatchResult<&mut Self>
    where
        B: ClauseBody<Args, T>,
        Args: 'static,
    {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.fallback.is_some() {
            return Err(MatchError::ChainSealed);
        }
        self.declared += 1;

        match &mut self.execution {
            Execution::Lazy { pending } => {
                pending.push(Box::new(
                    move |registry: &TypeRegistry, config: CompilerConfig| {
                        ClauseCompiler::new(registry, config).compile(&clause, body)
                    },
                ));
            }
            Execution::Eager { value, result } => {
                let outcome = ClauseCompiler::new(&self.registry, self.config)
                    .compile(&clause, body)
                    .and_then(|compiled| {
                        if result.is_none() && compiled.matches(value) {
                            debug!(clause = self.clauses.len(), "eager chain matched");
                            *result = Some(compiled.extract(value)?);
                        }
                        Ok(compiled)
                    });
                match outcome {
                    Ok(compiled) => self.clauses.push(compiled),
                    Err(err) => {
                        debug!(%err, "clause failed, chain poisoned");
                        self.failure = Some(err.clone());
                        return Err(err);
                    }
                }
            }
        }
        Ok(self)
    }

    /// Compile every deferred clause. Calling it again is a no-op.
    ///
    /// Either every deferred clause compiles or none is committed and the
    /// chain is poisoned with the first error.
    pub fn compile(&mut self) -> MatchResult<&mut Self> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if let Execution::Lazy { pending } = &mut self.execution {
            let mut compiled = Vec::with_capacity(pending.len());
            for deferred in pending.drain(..) {
                match deferred(&*self.registry, self.config) {
                    Ok(clause) => compiled.push(clause),
                    Err(err) => {
                        debug!(%err, "clause failed to compile, chain poisoned");
                        self.failure = Some(err.clone());
                        return Err(err);
                    }
                }
            }
            self.clauses.extend(compiled);
        }
        Ok(self)
    }

    /// Attach the fallback and seal the chain.
    ///
    /// Compiles any clause still pending. In eager mode, computes the result
    /// now if no clause matched.
    pub fn attach_fallback<F>(&mut self, body: F) -> MatchResult<&mut Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        if self.fallback.is_some() {
            return Err(MatchError::DuplicateFallback);
        }
        self.compile()?;

        if let Execution::Eager { result, .. } = &mut self.execution {
            if result.is_none() {
                debug!("eager chain fell back");
                *result = Some(body());
            }
        }
        self.fallback = Some(Box::new(body));
        Ok(self)
    }

    /// Evaluate `value` against the clauses in order.
    pub fn evaluate(&self, value: &Value) -> MatchResult<T> {
        if matches!(self.execution, Execution::Eager { .. }) {
            return Err(MatchError::InvalidMode {
                operation: "evaluate",
                mode: ChainMode::Eager,
            });
        }
        let fallback = self.fallback.as_ref().ok_or(MatchError::NoElse)?;

        for (index, clause) in self.clauses.iter().enumerate() {
            if clause.matches(value) {
                trace!(clause = index, "clause matched");
                return clause.extract(value);
            }
        }
        trace!("no clause matched, using fallback");
        Ok(fallback())
    }

    /// Evaluate many values in parallel. Results keep the input order.
    pub fn evaluate_all(&self, values: &[Value]) -> MatchResult<Vec<T>>
    where
        T: Send + Sync,
    {
        if matches!(self.execution, Execution::Eager { .. }) {
            return Err(MatchError::InvalidMode {
                operation: "evaluate_all",
                mode: ChainMode::Eager,
            });
        }
        if self.fallback.is_none() {
            return Err(MatchError::NoElse);
        }
        values.par_iter().map(|value| self.evaluate(value)).collect()
    }

    /// The frozen result of an eager chain.
    pub fn result(self) -> MatchResult<T> {
        match self.execution {
            Execution::Lazy { .. } => Err(MatchError::InvalidMode {
                operation: "result",
                mode: ChainMode::Lazy,
            }),
            Execution::Eager { result, .. } => {
                if self.fallback.is_none() {
                    return Err(MatchError::NoElse);
                }
                result.ok_or(MatchError::NoElse)
            }
        }
    }
}

impl<T> fmt::Debug for MatcherChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.execution {
            Execution::Lazy { .. } => ChainMode::Lazy,
            Execution::Eager { .. } => ChainMode::Eager,
        };
        f.debug_struct("MatcherChain")
            .field("mode", &mode)
            .field("clauses", &self.clauses)
            .field("has_fallback", &self.fallback.is_some())
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}
