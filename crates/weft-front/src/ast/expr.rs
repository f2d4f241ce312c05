//! Expression nodes.
//!
//! An [`Expr`] is a kind, a span fixed at construction, and exclusively
//! owned children. Rewriting passes replace children (or a leaf's scalar
//! payload) in place; they never change a node's kind — a rewrite that
//! needs a different kind splices in a new node.
//!
//! [`Expr::to_source_string`] reconstructs a source form of the tree. It
//! exists for diagnostics and debugging, not round-tripping: it is a pure
//! function of the current tree shape and nothing more.

use crate::foundation::Span;
use std::fmt::Write;

/// Where a variable reference resolves.
///
/// Closed and exhaustively enumerated: the capability validator matches on
/// every variant, so a new binding kind cannot slip past it unhandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Let-bound local or loop variable.
    Local,
    /// Declared template parameter (including declared injected params).
    Param,
    /// Ambient injected-parameter access (`$ij.*` style), never declared.
    Injected,
    /// Reference that resolved to no declaration at all.
    Undeclared,
}

/// Binary operators, template-language surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Times,
    Div,
    Mod,
}

impl BinaryOp {
    /// Surface token.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    // Binding strength for source reconstruction; higher binds tighter.
    fn strength(self) -> u8 {
        match self {
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::Eq | BinaryOp::Ne => 4,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 5,
            BinaryOp::Plus | BinaryOp::Minus => 6,
            BinaryOp::Times | BinaryOp::Div | BinaryOp::Mod => 7,
        }
    }
}

/// One expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Discriminant and payload; fixed kind, replaceable children.
    pub kind: ExprKind,
    /// Source location, immutable after construction.
    pub span: Span,
}

/// Expression variants. Closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `null` literal.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Float literal.
    Float(f64),
    /// String literal (unescaped payload).
    Str(String),
    /// Variable reference with its resolved binding.
    VarRef {
        /// Name without the `$` sigil.
        name: String,
        /// Where the reference resolved.
        binding: BindingKind,
    },
    /// Call to a built-in or plugin function, arguments in order.
    FunctionCall {
        /// Canonical function name; arity and types are the type
        /// checker's concern, not validated here.
        name: String,
        /// Argument expressions, owned.
        args: Vec<Expr>,
    },
    /// Infix binary operation.
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Logical negation.
    Not(Box<Expr>),
    /// Arithmetic negation.
    Neg(Box<Expr>),
    /// Ternary conditional.
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Named field access on a record or map value.
    FieldAccess { base: Box<Expr>, field: String },
    /// Bracketed item access.
    Index { base: Box<Expr>, index: Box<Expr> },
    /// List literal.
    List(Vec<Expr>),
    /// Record literal with explicit field names.
    Record(Vec<(String, Expr)>),
}

impl Expr {
    /// Creates a node.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Variable reference.
    pub fn var(name: impl Into<String>, binding: BindingKind, span: Span) -> Self {
        Self::new(
            ExprKind::VarRef {
                name: name.into(),
                binding,
            },
            span,
        )
    }

    /// Function call.
    pub fn call(name: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Self::new(
            ExprKind::FunctionCall {
                name: name.into(),
                args,
            },
            span,
        )
    }

    /// Integer literal.
    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::Int(value), span)
    }

    /// String literal.
    pub fn str(value: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Str(value.into()), span)
    }

    /// Binary operation.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    /// Reconstructs a source form of this tree.
    ///
    /// Pure and deterministic: two calls on an unmodified tree yield
    /// identical text. A `FunctionCall` renders as
    /// `name(arg0, arg1, …)`, comma-space separated, no trailing comma.
    pub fn to_source_string(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out, 0);
        out
    }

    // Renders into `out`, parenthesizing when this node binds looser than
    // the surrounding context.
    fn write_source(&self, out: &mut String, context: u8) {
        let strength = self.strength();
        let wrap = strength < context;
        if wrap {
            out.push('(');
        }

        match &self.kind {
            ExprKind::Null => out.push_str("null"),
            ExprKind::Bool(value) => {
                let _ = write!(out, "{value}");
            }
            ExprKind::Int(value) => {
                let _ = write!(out, "{value}");
            }
            ExprKind::Float(value) => {
                let _ = write!(out, "{value:?}");
            }
            ExprKind::Str(value) => {
                out.push('\'');
                for ch in value.chars() {
                    if ch == '\'' || ch == '\\' {
                        out.push('\\');
                    }
                    out.push(ch);
                }
                out.push('\'');
            }
            ExprKind::VarRef { name, .. } => {
                let _ = write!(out, "${name}");
            }
            ExprKind::FunctionCall { name, args } => {
                out.push_str(name);
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_source(out, 0);
                }
                out.push(')');
            }
            ExprKind::Binary { op, lhs, rhs } => {
                // Left-associative: the right operand needs one extra level.
                lhs.write_source(out, op.strength());
                let _ = write!(out, " {} ", op.symbol());
                rhs.write_source(out, op.strength() + 1);
            }
            ExprKind::Not(operand) => {
                out.push_str("not ");
                operand.write_source(out, 8);
            }
            ExprKind::Neg(operand) => {
                out.push('-');
                operand.write_source(out, 8);
            }
            ExprKind::Conditional {
                cond,
                then,
                otherwise,
            } => {
                cond.write_source(out, 2);
                out.push_str(" ? ");
                then.write_source(out, 1);
                out.push_str(" : ");
                otherwise.write_source(out, 1);
            }
            ExprKind::FieldAccess { base, field } => {
                base.write_source(out, 9);
                let _ = write!(out, ".{field}");
            }
            ExprKind::Index { base, index } => {
                base.write_source(out, 9);
                out.push('[');
                index.write_source(out, 0);
                out.push(']');
            }
            ExprKind::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_source(out, 0);
                }
                out.push(']');
            }
            ExprKind::Record(fields) => {
                out.push_str("record(");
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{name}: ");
                    value.write_source(out, 0);
                }
                out.push(')');
            }
        }

        if wrap {
            out.push(')');
        }
    }

    fn strength(&self) -> u8 {
        match &self.kind {
            ExprKind::Conditional { .. } => 1,
            ExprKind::Binary { op, .. } => op.strength(),
            ExprKind::Not(_) | ExprKind::Neg(_) => 8,
            ExprKind::FieldAccess { .. } | ExprKind::Index { .. } => 9,
            _ => 10,
        }
    }
}
