//! Extraction paths from a matched value to one of its sub-values.
//!
//! When a clause tests nested positions, every check and every binding is
//! expressed relative to the root value being matched. An `ExtractionPath`
//! records how to reach a sub-value from that root.
//!
//! # Example
//!
//! Matching `Line(Point(x, _), _)`:
//! - Root: the `Line` instance
//! - Path to `x`: `[Field(start), Field(x)]`
//!
//! The empty path denotes the whole matched value.
//!
//! # Performance
//!
//! Steps live in a `SmallVec` so typical shapes (depth ≤ 4) never allocate.
//! Resolution walks by reference and never clones the leaf.

use std::fmt;

use smallvec::SmallVec;

use crate::value::Value;
use crate::Name;

/// One step in an extraction path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Read a property of an object by declaration-order index. The name is
    /// kept for display only.
    Field { index: u32, name: Name },
    /// Read the element at an index of an array or list.
    Index(u32),
    /// Read the value stored under a key of a map.
    Key(Name),
}

impl PathStep {
    fn apply<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match self {
            PathStep::Field { index, .. } => value.as_object()?.field(*index as usize),
            PathStep::Index(i) => value.as_sequence()?.get(*i as usize),
            PathStep::Key(key) => value.as_map()?.get(&**key),
        }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Field { name, .. } => write!(f, ".{name}"),
            PathStep::Index(i) => write!(f, "[{i}]"),
            PathStep::Key(key) => write!(f, "[\"{key}\"]"),
        }
    }
}

/// A composable path from the root matched value to a sub-value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExtractionPath {
    steps: SmallVec<[PathStep; 4]>,
}

impl ExtractionPath {
    /// The path to the whole matched value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this path denotes the whole matched value.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// A new path extending this one by a step.
    #[must_use]
    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        ExtractionPath { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Follow the path from `root`.
    ///
    /// Returns `None` when a step does not apply: the value has the wrong
    /// runtime type, an index is out of bounds, or a key is absent.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.steps
            .iter()
            .try_fold(root, |current, step| step.apply(current))
    }
}

impl fmt::Display for ExtractionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
