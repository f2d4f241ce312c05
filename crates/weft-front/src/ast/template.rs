//! Structural nodes: units, parameters, statements, expression holders.

use super::Expr;
use crate::foundation::Span;
use std::fmt;

/// Auto-escaping mode a unit was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapingMode {
    /// Contextual escaping enforced by the compiler; the only mode every
    /// backend supports.
    Strict,
    /// Best-effort contextual escaping (legacy).
    Contextual,
    /// No automatic escaping (legacy).
    Disabled,
}

impl fmt::Display for EscapingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EscapingMode::Strict => "strict",
            EscapingMode::Contextual => "contextual",
            EscapingMode::Disabled => "disabled",
        })
    }
}

/// Where a parameter was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclSite {
    /// Explicit declaration in the unit header.
    Header,
    /// Legacy doc-comment declaration.
    DocComment,
}

/// One declared unit parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Name without the `$` sigil.
    pub name: String,
    /// Declaration form.
    pub decl: DeclSite,
    /// Declared as an injected parameter. References to a declared inject
    /// bind as [`BindingKind::Param`](super::BindingKind::Param); only
    /// ambient injection binds as `Injected`.
    pub injected: bool,
    /// Location of the declaration.
    pub span: Span,
}

impl ParamDecl {
    /// Header-declared parameter.
    pub fn header(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            decl: DeclSite::Header,
            injected: false,
            span,
        }
    }

    /// Legacy doc-comment parameter.
    pub fn doc_comment(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            decl: DeclSite::DocComment,
            injected: false,
            span,
        }
    }
}

/// An expression slot on a structural node.
///
/// Slots written in the legacy v1 syntax never parse into a tree; the raw
/// source text is kept verbatim so the capability validator can cite it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprSlot {
    /// Slot holding a parsed expression tree.
    Parsed(Expr),
    /// Legacy slot that failed to parse into an expression tree.
    Legacy {
        /// Raw source text of the slot.
        raw: String,
    },
}

impl ExprSlot {
    /// The parsed tree, if this slot has one.
    pub fn expr(&self) -> Option<&Expr> {
        match self {
            ExprSlot::Parsed(expr) => Some(expr),
            ExprSlot::Legacy { .. } => None,
        }
    }
}

/// One compiled unit: a single template definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUnit {
    /// Fully qualified template name.
    pub name: String,
    /// Declared auto-escaping mode.
    pub escaping: EscapingMode,
    /// Declared parameters, in declaration order.
    pub params: Vec<ParamDecl>,
    /// Body statements, in source order.
    pub body: Vec<Stmt>,
    /// Location of the unit declaration.
    pub span: Span,
}

impl TemplateUnit {
    /// Creates a unit with no parameters and an empty body.
    pub fn new(name: impl Into<String>, escaping: EscapingMode, span: Span) -> Self {
        Self {
            name: name.into(),
            escaping,
            params: Vec::new(),
            body: Vec::new(),
            span,
        }
    }

    /// Adds a parameter declaration.
    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Adds a body statement.
    pub fn with_stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }
}

/// One structural statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// Discriminant and payload; fixed kind, replaceable children.
    pub kind: StmtKind,
    /// Source location, immutable after construction.
    pub span: Span,
}

impl Stmt {
    /// Creates a statement node.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// One arm of an `{if}` chain: condition slot plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfArm {
    /// Condition expression holder.
    pub cond: ExprSlot,
    /// Statements executed when the condition holds.
    pub body: Vec<Stmt>,
}

/// Statement variants. Closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// Verbatim output text.
    RawText(String),
    /// `{print expr}` — one expression holder.
    Print(ExprSlot),
    /// `{let $name: expr}` — local binding.
    Let {
        /// Bound name without the `$` sigil.
        name: String,
        /// Bound value holder.
        value: ExprSlot,
    },
    /// `{if}…{elseif}…{else}…{/if}` chain.
    If {
        /// Condition arms, in source order.
        arms: Vec<IfArm>,
        /// `{else}` body, if present.
        fallback: Option<Vec<Stmt>>,
    },
    /// `{foreach $var in expr}…{/foreach}` loop.
    Foreach {
        /// Loop variable without the `$` sigil.
        var: String,
        /// Iterated collection holder.
        items: ExprSlot,
        /// Loop body.
        body: Vec<Stmt>,
    },
    /// `{call other}{param …}{/call}` — invocation of another unit.
    CallTemplate {
        /// Callee's fully qualified name.
        callee: String,
        /// Explicitly passed parameters, each an expression holder.
        args: Vec<(String, ExprSlot)>,
    },
}
