//! Per-clause binding table: pattern variable to extraction path.
//!
//! The first occurrence of a variable records where its value lives. Later
//! occurrences never overwrite that record; the caller gets the recorded path
//! back and must emit an equality check between the two positions instead.
//!
//! A binding to the root path stands for "the whole matched value".

use rustc_hash::FxHashMap;
use shapematch_ir::{ExtractionPath, PatternVariable};

/// Outcome of binding a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    /// First occurrence; the path was recorded.
    Fresh,
    /// The variable was already bound at this path.
    Repeated(ExtractionPath),
}

/// Variable bindings of a single clause.
#[derive(Clone, Debug, Default)]
pub struct BindingTable {
    paths: FxHashMap<PatternVariable, ExtractionPath>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` for `var` unless it is already bound.
    pub fn bind(&mut self, var: &PatternVariable, path: ExtractionPath) -> Binding {
        if let Some(first) = self.paths.get(var) {
            return Binding::Repeated(first.clone());
        }
        self.paths.insert(var.clone(), path);
        Binding::Fresh
    }

    pub fn lookup(&self, var: &PatternVariable) -> Option<&ExtractionPath> {
        self.paths.get(var)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
