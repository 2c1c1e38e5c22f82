//! Expression tree representation.
//!
//! Every node is one of a closed set of variants and owns exactly the
//! children its operator needs, so arity can never drift from the operator.
//! Nodes are addressed for mutation and crossover by their position in a
//! pre-order walk, optionally counting only internal nodes or only leaves.

use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::ops::{AddAssign, RangeInclusive};

/// Number of terminal symbols (constant, input).
const TERMINALS: usize = 2;

/// Number of internal symbols (four unary, four binary, one conditional).
const INTERNALS: usize = 9;

/// One-argument operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Square root of the absolute value (protected).
    Sqrt,
    /// Sine.
    Sin,
    /// Natural log of the absolute value, `0` at `0` (protected).
    Log,
    /// Exponential.
    Exp,
}

impl UnaryOp {
    /// All unary operators in draw order.
    pub const ALL: [Self; 4] = [Self::Sqrt, Self::Sin, Self::Log, Self::Exp];

    /// Apply the operator to an already evaluated operand.
    #[must_use]
    pub fn apply(self, a: f64) -> f64 {
        match self {
            Self::Sqrt => a.abs().sqrt(),
            Self::Sin => a.sin(),
            Self::Log => {
                if a == 0.0 {
                    0.0
                } else {
                    a.abs().ln()
                }
            }
            Self::Exp => a.exp(),
        }
    }

    /// Token used in the textual representation.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Log => "log",
            Self::Exp => "exp",
        }
    }
}

/// Two-argument operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Subtraction.
    Subtract,
    /// Multiplication.
    Multiply,
    /// Division, `1` when the divisor is `0` (protected).
    Divide,
}

impl BinaryOp {
    /// All binary operators in draw order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Apply the operator to already evaluated operands.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    1.0
                } else {
                    a / b
                }
            }
        }
    }

    /// Token used in the textual representation.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// A node of an expression tree together with its owned subtrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    /// A constant drawn at construction time.
    Constant(f64),
    /// The sample input `x`.
    Input,
    /// A unary operator applied to one subtree.
    Unary(UnaryOp, Box<Node>),
    /// A binary operator applied to two subtrees.
    Binary(BinaryOp, Box<[Node; 2]>),
    /// `(a < b) ? c : d` over four subtrees.
    Conditional(Box<[Node; 4]>),
}

/// Construction strategy for random trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    /// Internal symbols only until the depth limit.
    Full,
    /// Any symbol until the depth limit.
    Grow,
}

/// Structural size of a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Size {
    /// Nodes with at least one child.
    pub internals: usize,
    /// Nodes without children.
    pub leafs: usize,
}

impl Size {
    /// Total node count.
    #[must_use]
    pub fn total(self) -> usize {
        self.internals + self.leafs
    }
}

impl AddAssign for Size {
    fn add_assign(&mut self, rhs: Self) {
        self.internals += rhs.internals;
        self.leafs += rhs.leafs;
    }
}

/// Pre-order position of a node within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The n-th node counting every node.
    Any(usize),
    /// The n-th internal node.
    Internal(usize),
    /// The n-th leaf.
    Leaf(usize),
}

impl Target {
    fn index(self) -> usize {
        match self {
            Self::Any(i) | Self::Internal(i) | Self::Leaf(i) => i,
        }
    }

    fn matches(self, node: &Node) -> bool {
        match self {
            Self::Any(_) => true,
            Self::Internal(_) => !node.is_leaf(),
            Self::Leaf(_) => node.is_leaf(),
        }
    }
}

/// Mutable access to a subtree found by [`Node::visit`].
#[derive(Debug)]
pub struct Visit<'a> {
    /// Root of the addressed subtree.
    pub node: &'a mut Node,
    /// Distance from the tree root (the root itself is at depth 0).
    pub depth: usize,
}

impl Node {
    /// Build a random tree no deeper than `max_depth`.
    ///
    /// Constants are drawn uniformly from `constants`, which must not be empty.
    #[must_use]
    pub fn random<R: Rng>(
        rng: &mut R,
        method: Method,
        max_depth: usize,
        constants: &RangeInclusive<f64>,
    ) -> Self {
        Self::build(rng, method, 0, max_depth, constants)
    }

    fn build<R: Rng>(
        rng: &mut R,
        method: Method,
        depth: usize,
        max_depth: usize,
        constants: &RangeInclusive<f64>,
    ) -> Self {
        let choice = if depth >= max_depth {
            rng.gen_range(0..TERMINALS)
        } else {
            match method {
                Method::Full => rng.gen_range(TERMINALS..TERMINALS + INTERNALS),
                Method::Grow => rng.gen_range(0..TERMINALS + INTERNALS),
            }
        };

        let depth = depth + 1;
        match choice {
            0 => Self::Constant(rng.gen_range(constants.clone())),
            1 => Self::Input,
            2..=5 => Self::Unary(
                UnaryOp::ALL[choice - 2],
                Box::new(Self::build(rng, method, depth, max_depth, constants)),
            ),
            6..=9 => Self::Binary(
                BinaryOp::ALL[choice - 6],
                Box::new(std::array::from_fn(|_| {
                    Self::build(rng, method, depth, max_depth, constants)
                })),
            ),
            _ => Self::Conditional(Box::new(std::array::from_fn(|_| {
                Self::build(rng, method, depth, max_depth, constants)
            }))),
        }
    }

    /// Evaluate the tree for input `x`.
    ///
    /// Children are evaluated before their operator. Protected operators
    /// never fault, but unguarded ones (`exp`, `*`) may still overflow.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Constant(k) => *k,
            Self::Input => x,
            Self::Unary(op, a) => op.apply(a.evaluate(x)),
            Self::Binary(op, children) => {
                let [a, b] = &**children;
                op.apply(a.evaluate(x), b.evaluate(x))
            }
            Self::Conditional(children) => {
                let [a, b, c, d] = children.each_ref().map(|child| child.evaluate(x));
                if a < b { c } else { d }
            }
        }
    }

    /// Number of children this node's variant requires.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Input => 0,
            Self::Unary(..) => 1,
            Self::Binary(..) => 2,
            Self::Conditional(_) => 4,
        }
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Constant(_) | Self::Input)
    }

    /// Immediate children, left to right.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Constant(_) | Self::Input => &[],
            Self::Unary(_, a) => std::slice::from_ref(a.as_ref()),
            Self::Binary(_, children) => &children[..],
            Self::Conditional(children) => &children[..],
        }
    }

    fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Self::Constant(_) | Self::Input => &mut [],
            Self::Unary(_, a) => std::slice::from_mut(a.as_mut()),
            Self::Binary(_, children) => &mut children[..],
            Self::Conditional(children) => &mut children[..],
        }
    }

    /// Count internal nodes and leaves.
    #[must_use]
    pub fn size(&self) -> Size {
        let mut size = if self.is_leaf() {
            Size { internals: 0, leafs: 1 }
        } else {
            Size { internals: 1, leafs: 0 }
        };
        for child in self.children() {
            size += child.size();
        }
        size
    }

    /// Length of the longest root-to-leaf path; a lone terminal has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(Node::depth)
            .max()
            .map_or(0, |deepest| deepest + 1)
    }

    /// Child indices leading from this node to `target`.
    fn locate(&self, target: Target) -> Option<Vec<usize>> {
        let mut remaining = target.index();
        let mut path = Vec::new();
        self.find(target, &mut remaining, &mut path).then_some(path)
    }

    fn find(&self, target: Target, remaining: &mut usize, path: &mut Vec<usize>) -> bool {
        if target.matches(self) {
            if *remaining == 0 {
                return true;
            }
            *remaining -= 1;
        }
        for (i, child) in self.children().iter().enumerate() {
            path.push(i);
            if child.find(target, remaining, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Borrow the subtree at `target`, if it exists.
    #[must_use]
    pub fn subtree(&self, target: Target) -> Option<&Node> {
        let path = self.locate(target)?;
        let mut node = self;
        for &i in &path {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    /// Mutably borrow the subtree at `target` along with its depth.
    pub fn visit(&mut self, target: Target) -> Option<Visit<'_>> {
        let path = self.locate(target)?;
        let mut node = self;
        for &i in &path {
            node = node.children_mut().get_mut(i)?;
        }
        Some(Visit {
            node,
            depth: path.len(),
        })
    }

    /// Replace the subtree at `target` with `subtree`, returning the old one.
    ///
    /// Returns `None` (and drops `subtree`) when `target` is out of range.
    pub fn graft(&mut self, target: Target, subtree: Node) -> Option<Node> {
        let visit = self.visit(target)?;
        Some(std::mem::replace(visit.node, subtree))
    }
}

impl fmt::Display for Node {
    /// Post-order rendering: children first, then the operator token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for child in self.children() {
            write!(f, "{child}")?;
        }
        match self {
            Self::Constant(k) => write!(f, "{k:.6}")?,
            Self::Input => f.write_str("x")?,
            Self::Unary(op, _) => write!(f, " {}", op.symbol())?,
            Self::Binary(op, _) => write!(f, " {}", op.symbol())?,
            Self::Conditional(_) => f.write_str(" a < b ? c : d")?,
        }
        f.write_str(")")
    }
}
