//! AST node types for the Volt HDL parser.
//!
//! Every AST node carries a [`Span`] for source location tracking. The AST is
//! deliberately close to the surface syntax: concatenation braces and slices
//! are kept as written and desugared during lowering.

use serde::{Deserialize, Serialize};
use volt_common::Ident;
use volt_source::Span;

/// A complete HDL source file: a sequence of module declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// The module declarations, in source order.
    pub modules: Vec<ModuleDecl>,
    /// The span covering the entire file.
    pub span: Span,
}

/// A module declaration:
/// `module Name(params) -> outputs { body }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// The module name.
    pub name: Ident,
    /// The input parameters (possibly empty).
    pub inputs: Vec<PortDecl>,
    /// The declared outputs (at least one).
    pub outputs: Vec<PortDecl>,
    /// The body statements: parts and wires, in source order.
    pub stmts: Vec<Stmt>,
    /// Source span of the whole declaration.
    pub span: Span,
}

/// A port declaration: a scalar `name` or a bus `name[N]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDecl {
    /// The port name.
    pub name: Ident,
    /// The declared bit width (1 for a scalar).
    pub width: u32,
    /// Source span.
    pub span: Span,
}

/// A body statement: either a part instantiation or a wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// A part instantiation: `label: Module(args) -> results`.
    Part(PartStmt),
    /// A wire: `expr -> out` or `{ exprs } -> out`.
    Wire(WireStmt),
}

/// A part instantiation statement.
///
/// A part is distinguished from a wire by the two-token window: `ident (` or
/// `ident :` begins a part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartStmt {
    /// The optional user-given label (`label:` prefix), used later to
    /// retrieve submodule state.
    pub label: Option<Ident>,
    /// The name of the instantiated module.
    pub module: Ident,
    /// The argument expressions, in order. Order is load-bearing: connection
    /// lists are laid out in exactly this order.
    pub args: Vec<NetExpr>,
    /// The result expressions, in order.
    pub results: Vec<NetExpr>,
    /// Source span.
    pub span: Span,
}

/// A wire statement.
///
/// A wire with more than one input must use the `{ ... }` concatenation form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireStmt {
    /// The input expressions feeding the wire.
    pub inputs: Vec<NetExpr>,
    /// The output net the wire drives.
    pub output: NetExpr,
    /// Source span.
    pub span: Span,
}

/// A net expression: an identifier with an optional slice, a constant bit,
/// or a concatenation of net expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NetExpr {
    /// A named net, optionally sliced: `x`, `x[3]`, `x[0..7]`.
    Ref {
        /// The net name.
        name: Ident,
        /// The optional slice.
        slice: Option<Slice>,
        /// Source span.
        span: Span,
    },
    /// A constant bit: `0` or `1`.
    Const {
        /// The constant value.
        value: bool,
        /// Source span.
        span: Span,
    },
    /// A concatenation: `{ a, b, c }`.
    Concat {
        /// The concatenated expressions, most significant last.
        parts: Vec<NetExpr>,
        /// Source span.
        span: Span,
    },
}

impl NetExpr {
    /// Returns the source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            NetExpr::Ref { span, .. } => *span,
            NetExpr::Const { span, .. } => *span,
            NetExpr::Concat { span, .. } => *span,
        }
    }
}

/// A bit slice with inclusive bounds: `[i]` is `start == end == i`,
/// `[i..j]` is `start = i, end = j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// The first bit (inclusive).
    pub start: u32,
    /// The last bit (inclusive).
    pub end: u32,
}

impl Slice {
    /// The number of bits the slice covers.
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }
}
