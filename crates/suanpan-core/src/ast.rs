//! Expression trees consumed by the compiler.
//!
//! A tree is immutable once built. Nodes are reference-counted handles, so
//! cloning a node (or sharing a subtree between trees) is cheap; trees are
//! acyclic by construction.

use std::fmt;
use std::rc::Rc;

/// What a node contributes to the compiled program.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// A literal whose text is decoded at load time.
    Constant,
    /// A named input bound to an argument register.
    Variable,
    /// A call applying the named callable to the child results.
    Function,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    symbol: String,
    children: Vec<SyntaxNode>,
}

/// A shared, immutable expression-tree node.
#[derive(Clone, Debug)]
pub struct SyntaxNode(Rc<NodeData>);

impl SyntaxNode {
    /// A constant leaf carrying its literal text (e.g. `"8"`, `"2.5"`, `"1/3"`).
    pub fn constant(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Constant, text.into(), Vec::new())
    }

    /// A variable leaf naming an input.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Variable, name.into(), Vec::new())
    }

    /// A call node applying `name` to `children` in order.
    pub fn function(name: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self::new(NodeKind::Function, name.into(), children)
    }

    fn new(kind: NodeKind, symbol: String, children: Vec<SyntaxNode>) -> Self {
        Self(Rc::new(NodeData {
            kind,
            symbol,
            children,
        }))
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    /// The node's symbol text: literal text for constants, name for
    /// variables and functions.
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.0.symbol
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.0.children.len()
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.0.children.get(index)
    }

    /// Children in argument order.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.0.children.iter()
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Constant | NodeKind::Variable => f.write_str(self.symbol()),
            NodeKind::Function => {
                write!(f, "{}(", self.symbol())?;
                for (i, child) in self.children().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
