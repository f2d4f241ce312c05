//! The node tree.
//!
//! Two layers share one design: *structural* nodes ([`template`]) represent
//! control and declaration constructs, *expression* nodes ([`expr`])
//! represent value-producing sub-expressions reachable from the structural
//! layer's expression-holder slots.
//!
//! Both layers are closed sum types matched exhaustively, so adding a node
//! kind forces every consumer to handle it at compile time. Every node
//! exclusively owns its children; `Clone` is therefore a structurally
//! independent deep copy, and dropping a subtree tears it down with no
//! manual bookkeeping.

mod expr;
mod template;

pub use expr::{BinaryOp, BindingKind, Expr, ExprKind};
pub use template::{DeclSite, EscapingMode, ExprSlot, IfArm, ParamDecl, Stmt, StmtKind, TemplateUnit};
