//! Errors raised while building or running a matcher chain.
//!
//! Nearly every variant is a clause-construction error: a malformed clause is
//! rejected before any value is matched. Only `NoElse`, `InvalidMode` and
//! `ExtractionFailed` can surface at evaluation time.

use shapematch_ir::{ExtractionPath, RegistryError, TypeIdx, TypeTag};
use thiserror::Error;

use crate::chain::ChainMode;

/// Result alias used throughout the compiler.
pub type MatchResult<T> = Result<T, MatchError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    // Shape structure
    #[error("unsupported shape: {reason}")]
    UnsupportedShape { reason: String },

    #[error("shape nesting exceeds the limit of {limit}")]
    ShapeTooDeep { limit: usize },

    // Property mapping
    #[error("parameter {index} (`{param}`) of `{type_name}`'s constructor carries no field mapping")]
    MissingMapping {
        type_name: String,
        index: usize,
        param: String,
    },

    #[error("type `{type_name}` has no readable field `{field}`")]
    UnknownField { type_name: String, field: String },

    #[error("type {ty} is not registered")]
    UnknownType { ty: TypeIdx },

    // Clause parameters
    #[error("clause parameter `{name}` is never bound by its shape")]
    UnboundParameter { name: String },

    #[error("variable `{name}` is not a declared clause parameter")]
    UndeclaredVariable { name: String },

    #[error("clause declares parameter `{name}` twice")]
    DuplicateParameter { name: String },

    #[error("clause declares {declared} parameters but its body takes {body}")]
    ArityMismatch { declared: usize, body: usize },

    // Chain lifecycle
    #[error("a fallback is already attached")]
    DuplicateFallback,

    #[error("`{operation}` is not available on a {mode} chain")]
    InvalidMode {
        operation: &'static str,
        mode: ChainMode,
    },

    #[error("no fallback attached; attach one before evaluating")]
    NoElse,

    #[error("cannot append a clause after the fallback was attached")]
    ChainSealed,

    // Extraction
    #[error("expected a value of type {expected}, found {found}")]
    ExtractionFailed { expected: TypeTag, found: String },

    #[error("nothing to extract at {path}")]
    NoValueAt { path: ExtractionPath },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
