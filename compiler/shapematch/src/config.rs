//! Compiler configuration.

/// Default bound on shape nesting.
pub const DEFAULT_MAX_SHAPE_DEPTH: usize = 64;

/// Limits applied while compiling clauses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Deepest shape a clause may declare. Leaves count as depth 1.
    pub max_shape_depth: usize,
}

impl CompilerConfig {
    #[must_use]
    pub fn with_max_shape_depth(mut self, depth: usize) -> Self {
        self.max_shape_depth = depth;
        self
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            max_shape_depth: DEFAULT_MAX_SHAPE_DEPTH,
        }
    }
}
