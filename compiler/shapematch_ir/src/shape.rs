//! Shape AST: the declarative form a value must have for a clause to fire.
//!
//! A shape is plain data. It can be inspected, printed and compiled without
//! running anything. Shapes are built bottom-up with the constructor helpers
//! on [`ShapeNode`]:
//!
//! ```text
//! // Person("John", age)
//! ShapeNode::construct(person, [ShapeNode::literal("John"), ShapeNode::var("age")])
//!
//! // [x, x, 0]
//! ShapeNode::array([ShapeNode::var("x"), ShapeNode::var("x"), ShapeNode::literal(0)])
//! ```

use std::fmt;
use std::sync::Arc;

use crate::types::{TypeIdx, TypeTag};
use crate::value::Value;
use crate::Name;

/// A named free slot in a clause's shape.
///
/// Variables are declared by the enclosing [`Clause`]; two wildcards with the
/// same name inside one clause denote the same variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternVariable(Name);

impl PatternVariable {
    pub fn new(name: &str) -> Self {
        PatternVariable(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PatternVariable {
    fn from(name: &str) -> Self {
        PatternVariable::new(name)
    }
}

impl fmt::Display for PatternVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which sequence type a `FixedSequence` shape targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    Array,
    List,
}

/// "An instance of `target` built with these positional sub-shapes."
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructShape {
    pub target: TypeIdx,
    pub args: Vec<ShapeNode>,
}

/// A shape node.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeNode {
    /// Instance of a type, constrained through its constructor parameters.
    Construct(ConstructShape),
    /// A construction refined by explicit `field = sub-shape` assignments.
    FieldInit {
        base: ConstructShape,
        fields: Vec<(Name, ShapeNode)>,
    },
    /// Exact, whole-value equality.
    Literal(Value),
    /// Matches anything and binds the variable to it.
    Wildcard(PatternVariable),
    /// Matches anything and binds nothing.
    Discard,
    /// A sequence of exactly this length, compared positionally.
    FixedSequence {
        kind: SequenceKind,
        elements: Vec<ShapeNode>,
    },
    /// A map containing at least these keys.
    KeyedMap { entries: Vec<(Name, ShapeNode)> },
}

impl ShapeNode {
    pub fn construct(target: TypeIdx, args: impl IntoIterator<Item = ShapeNode>) -> Self {
        ShapeNode::Construct(ConstructShape {
            target,
            args: args.into_iter().collect(),
        })
    }

    /// Object-initializer shape: `Target(args..) { field = shape, .. }`.
    pub fn init<'a>(
        target: TypeIdx,
        args: impl IntoIterator<Item = ShapeNode>,
        fields: impl IntoIterator<Item = (&'a str, ShapeNode)>,
    ) -> Self {
        ShapeNode::FieldInit {
            base: ConstructShape {
                target,
                args: args.into_iter().collect(),
            },
            fields: fields
                .into_iter()
                .map(|(name, shape)| (Arc::from(name), shape))
                .collect(),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        ShapeNode::Literal(value.into())
    }

    pub fn var(name: &str) -> Self {
        ShapeNode::Wildcard(PatternVariable::new(name))
    }

    pub fn array(elements: impl IntoIterator<Item = ShapeNode>) -> Self {
        ShapeNode::FixedSequence {
            kind: SequenceKind::Array,
            elements: elements.into_iter().collect(),
        }
    }

    pub fn list(elements: impl IntoIterator<Item = ShapeNode>) -> Self {
        ShapeNode::FixedSequence {
            kind: SequenceKind::List,
            elements: elements.into_iter().collect(),
        }
    }

    pub fn map<'a>(entries: impl IntoIterator<Item = (&'a str, ShapeNode)>) -> Self {
        ShapeNode::KeyedMap {
            entries: entries
                .into_iter()
                .map(|(key, shape)| (Arc::from(key), shape))
                .collect(),
        }
    }

    /// Nesting depth; leaves have depth 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            ShapeNode::Construct(c) => c.args.iter().map(ShapeNode::depth).max(),
            ShapeNode::FieldInit { base, fields } => base
                .args
                .iter()
                .chain(fields.iter().map(|(_, s)| s))
                .map(ShapeNode::depth)
                .max(),
            ShapeNode::FixedSequence { elements, .. } => {
                elements.iter().map(ShapeNode::depth).max()
            }
            ShapeNode::KeyedMap { entries } => entries.iter().map(|(_, s)| s.depth()).max(),
            ShapeNode::Literal(_) | ShapeNode::Wildcard(_) | ShapeNode::Discard => None,
        };
        children.unwrap_or(0).saturating_add(1)
    }

    /// Every variable named by a wildcard, in first-occurrence order.
    pub fn variables(&self) -> Vec<&PatternVariable> {
        fn walk<'s>(node: &'s ShapeNode, out: &mut Vec<&'s PatternVariable>) {
            match node {
                ShapeNode::Wildcard(var) => {
                    if !out.contains(&var) {
                        out.push(var);
                    }
                }
                ShapeNode::Construct(c) => c.args.iter().for_each(|a| walk(a, out)),
                ShapeNode::FieldInit { base, fields } => {
                    base.args.iter().for_each(|a| walk(a, out));
                    fields.iter().for_each(|(_, s)| walk(s, out));
                }
                ShapeNode::FixedSequence { elements, .. } => {
                    elements.iter().for_each(|e| walk(e, out));
                }
                ShapeNode::KeyedMap { entries } => entries.iter().for_each(|(_, s)| walk(s, out)),
                ShapeNode::Literal(_) | ShapeNode::Discard => {}
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}

impl fmt::Display for ShapeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[ShapeNode]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            ShapeNode::Construct(c) => {
                write!(f, "new{}(", c.target)?;
                list(f, &c.args)?;
                write!(f, ")")
            }
            ShapeNode::FieldInit { base, fields } => {
                write!(f, "new{}(", base.target)?;
                list(f, &base.args)?;
                write!(f, ") {{ ")?;
                for (i, (name, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name} = {shape}")?;
                }
                write!(f, " }}")
            }
            ShapeNode::Literal(v) => write!(f, "{v}"),
            ShapeNode::Wildcard(var) => write!(f, "{var}"),
            ShapeNode::Discard => write!(f, "_"),
            ShapeNode::FixedSequence { kind, elements } => {
                let open = match kind {
                    SequenceKind::Array => "#[",
                    SequenceKind::List => "[",
                };
                write!(f, "{open}")?;
                list(f, elements)?;
                write!(f, "]")
            }
            ShapeNode::KeyedMap { entries } => {
                write!(f, "{{")?;
                for (i, (key, shape)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\": {shape}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A declared pattern clause: the body's parameters, in order, and the shape
/// that binds them.
///
/// A parameter may also carry a declared runtime type, which the compiler
/// checks in addition to the body's own parameter type. This is how a clause
/// says "any `Person` p" rather than "any object p".
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    params: Vec<PatternVariable>,
    param_types: Vec<(PatternVariable, TypeTag)>,
    shape: ShapeNode,
}

impl Clause {
    pub fn new<'a>(params: impl IntoIterator<Item = &'a str>, shape: ShapeNode) -> Self {
        Clause {
            params: params.into_iter().map(PatternVariable::new).collect(),
            param_types: Vec::new(),
            shape,
        }
    }

    /// A clause whose body takes no parameters.
    pub fn bare(shape: ShapeNode) -> Self {
        Clause {
            params: Vec::new(),
            param_types: Vec::new(),
            shape,
        }
    }

    /// Declare the runtime type of parameter `name`. A later declaration for
    /// the same name replaces the earlier one.
    #[must_use]
    pub fn typed_param(mut self, name: &str, tag: TypeTag) -> Self {
        let var = PatternVariable::new(name);
        self.param_types.retain(|(declared, _)| *declared != var);
        self.param_types.push((var, tag));
        self
    }

    /// Declared runtime type of a parameter, if any.
    pub fn param_type(&self, var: &PatternVariable) -> Option<TypeTag> {
        self.param_types
            .iter()
            .find(|(declared, _)| declared == var)
            .map(|(_, tag)| *tag)
    }

    pub fn param_types(&self) -> &[(PatternVariable, TypeTag)] {
        &self.param_types
    }

    pub fn params(&self) -> &[PatternVariable] {
        &self.params
    }

    pub fn shape(&self) -> &ShapeNode {
        &self.shape
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
            if let Some(tag) = self.param_type(param) {
                write!(f, ": {tag}")?;
            }
        }
        write!(f, ") => {}", self.shape)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests use expect for brevity")]
mod tests;
