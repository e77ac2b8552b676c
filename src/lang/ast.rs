//! Abstract syntax tree.
//!
//! A single tagged `Node` enum covers every statement and expression form;
//! the grammar draws no syntactic line between statements and expressions
//! (spec.md §4.2), so neither does this tree.

use crate::lang::token::TokenKind;
use crate::position::Span;

/// One case of an `if`/`elif` chain: a condition and the block to run when
/// it is the first truthy one.
#[derive(Clone, Debug)]
pub struct IfCase {
    pub cond: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    ListLit(Vec<Node>),
    NullLit,

    VarAccess { name: String },
    /// `declare = true` for `var`/`const` (creates a binding in the current
    /// scope with mutability `writable`); `declare = false` for a plain
    /// `name = expr` write to an existing binding found via the scope chain.
    VarAssign { name: String, value: Box<Node>, writable: bool, declare: bool },
    Attribute { target: Box<Node>, name: String },
    AttributeAssign { target: Box<Node>, name: String, value: Box<Node> },
    /// `target.(index)` — list indexing, the call-form equivalent of
    /// subscript syntax (spec.md §8 scenario 4).
    Index { target: Box<Node>, index: Box<Node> },

    BinOp { left: Box<Node>, op: TokenKind, right: Box<Node> },
    UnaryOp { op: TokenKind, operand: Box<Node> },

    If { cases: Vec<IfCase>, else_body: Option<Box<Node>> },
    While { cond: Box<Node>, body: Box<Node> },
    For {
        name: String,
        start: Box<Node>,
        end: Box<Node>,
        step: Option<Box<Node>>,
        body: Box<Node>,
    },

    FnDecl {
        name: Option<String>,
        params: Vec<String>,
        body: Box<Node>,
        anonymous: bool,
    },
    Call { callee: Box<Node>, args: Vec<Node> },

    Return(Option<Box<Node>>),
    Break,
    Continue,

    EnumDecl { name: String, members: Vec<String> },
    NamespaceDecl { name: String, body: Box<Node> },
    ObjectDecl { name: String, body: Box<Node> },
    New { name: String, args: Vec<Node> },

    /// A `{ ... }` block, or the top-level program: a sequence of
    /// statements evaluated in a fresh child scope (top-level excepted).
    Block(Vec<Node>),
}

/// An AST node: a tagged kind plus the source span it and all of its
/// children fall within.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}
