//! Shapematch - an ahead-of-time pattern-match compiler.
//!
//! Callers describe the shape a value must have as a [`ShapeNode`] tree,
//! declare which pattern variables the clause body receives, and hand over a
//! typed closure. Each clause compiles once into a predicate and an extractor;
//! a [`MatcherChain`] then evaluates clauses first-match-wins with a mandatory
//! fallback.
//!
//! ```text
//! let mut chain = MatcherChain::new(registry);
//! chain
//!     .append(
//!         Clause::new(["age"], ShapeNode::construct(person, [ShapeNode::literal("John"), ShapeNode::var("age")])),
//!         |age: i64| format!("John is {age}."),
//!     )?
//!     .attach_fallback(|| "someone else".to_owned())?;
//!
//! let greeting = chain.evaluate(&value)?;
//! ```
//!
//! # Modules
//!
//! - `resolve`: constructor parameter to field mapping
//! - `bindings`: per-clause variable bindings
//! - `guard`: predicate conjuncts and their lowering
//! - `body`: typed clause bodies
//! - `compile`: the clause compiler
//! - `chain`: the matcher chain

mod bindings;
mod body;
mod chain;
mod compile;
mod config;
mod error;
mod guard;
mod resolve;

use std::sync::Once;

pub use bindings::{Binding, BindingTable};
pub use body::{ClauseBody, FromValue, ParamTags};
pub use chain::{ChainMode, ChainState, MatcherChain};
pub use compile::{ClauseCompiler, CompiledClause};
pub use config::{CompilerConfig, DEFAULT_MAX_SHAPE_DEPTH};
pub use error::{MatchError, MatchResult};
pub use guard::Guard;
pub use resolve::{PropertyResolver, ResolvedField};

// Re-export the IR so callers need a single dependency.
pub use shapematch_ir::{
    Clause, ConstructShape, Constructor, CtorParam, ExtractionPath, Name, ObjectValue, PathStep,
    PatternVariable, RegistryError, SequenceKind, ShapeNode, TypeDef, TypeIdx, TypeRegistry,
    TypeTag, Value,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=shapematch=debug` to log clause compilation or
/// `RUST_LOG=shapematch=trace` to also log every evaluation.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
