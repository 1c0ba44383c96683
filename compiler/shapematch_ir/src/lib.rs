//! Shapematch IR - shared data for the shapematch pattern compiler.
//!
//! This crate provides:
//! - Runtime values (`Value`, `ObjectValue`) matched by compiled clauses
//! - Type metadata (`TypeRegistry`, `TypeDef`, `Constructor`) mapping
//!   constructor parameters to readable fields
//! - The shape AST (`ShapeNode`, `Clause`, `PatternVariable`)
//! - Extraction paths (`ExtractionPath`, `PathStep`)
//!
//! No compilation logic lives here. The `shapematch` crate turns clauses into
//! predicate/extractor pairs.

use std::sync::Arc;

pub mod path;
pub mod shape;
pub mod types;
pub mod value;

/// Shared, immutable name (type, field, key or variable name).
pub type Name = Arc<str>;

pub use path::{ExtractionPath, PathStep};
pub use shape::{Clause, ConstructShape, PatternVariable, SequenceKind, ShapeNode};
pub use types::{Constructor, CtorParam, RegistryError, TypeDef, TypeIdx, TypeRegistry, TypeTag};
pub use value::{Heap, ObjectValue, Value};
