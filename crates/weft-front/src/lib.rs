//! Front end of the weft multi-target template compiler.
//!
//! This crate owns the pieces every later pass builds on:
//!
//! - **Node tree** ([`ast`]) — the structural and expression trees produced
//!   by the parser and consumed by type checking, optimization, and code
//!   generation. Immutable in shape (a node's kind never changes), mutable
//!   in position (rewriting passes splice children).
//! - **Diagnostics** ([`error`]) — collected findings with source spans,
//!   reported through an [`error::ErrorReporter`] sink so a single pass can
//!   surface every problem in a unit at once.
//! - **Capability validation** ([`backend::validate`]) — a whole-tree walk
//!   that proves, before a backend's emitter runs, that the tree and its
//!   variable bindings are expressible in that backend.
//! - **Emission contract** ([`backend::emit`]) — the seam between a
//!   function call node and the per-backend strategy that generates its
//!   code, including the parenthesization rule for text backends.
//!
//! Parsing, type checking, optimization, and the actual emitters are
//! external collaborators; this crate defines the structures and contracts
//! they share.
//!
//! # Pipeline position
//!
//! ```text
//! Parse -> Type Check -> Optimize -> Capability Validation -> Emission
//!                                        ^^^^^^^^^^^^^^^^^^   (per backend)
//! ```
//!
//! The driver validates a unit against a backend before selecting that
//! backend's emitter; any diagnostic aborts emission for that unit and
//! backend pair. That abort policy lives with the driver, not here.

pub mod ast;
pub mod backend;
pub mod error;
pub mod foundation;

pub use weft_plugin as plugin;

pub use ast::{BindingKind, Expr, ExprKind, ExprSlot, Stmt, StmtKind, TemplateUnit};
pub use backend::validate::CapabilityValidator;
pub use error::{Diagnostic, DiagnosticKind, ErrorReporter, ErrorSink};
pub use foundation::{FileId, SourceMap, Span};
pub use plugin::Backend;
