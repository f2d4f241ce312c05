//! Backend-capability validation.
//!
//! Before a backend's emitter runs, the driver walks the whole unit tree
//! and proves that every construct and variable binding in it is
//! expressible in that backend. The walk is exhaustive: a diagnostic never
//! stops traversal, so one pass reports every violation in the unit rather
//! than the first one.
//!
//! Two recursive-descent walkers share one [`ErrorReporter`]: the
//! structural walker covers units, parameters, and statements, and hands
//! every expression-holder slot to the expression walker. Both match
//! exhaustively on their closed node enums — adding a node or binding kind
//! is a compile-time event for this module.
//!
//! The rule set is deliberately backend-specific and only ever grows:
//! today the checks cover what the VM backend cannot express (non-strict
//! escaping, legacy doc-comment parameters, legacy unparsed expressions,
//! ambient or undeclared parameter access); text backends accept the same
//! trees and report nothing.

use crate::ast::{BindingKind, DeclSite, EscapingMode, Expr, ExprKind, ExprSlot, Stmt, StmtKind, TemplateUnit};
use crate::error::{DiagnosticKind, ErrorReporter};
use weft_plugin::Backend;

/// Whole-tree capability walker for one backend.
///
/// Holds no state beyond the target backend and the shared sink; nothing
/// persists across units, so one validator may check any number of units
/// in sequence.
///
/// # Examples
///
/// ```
/// use weft_front::ast::{EscapingMode, TemplateUnit};
/// use weft_front::error::ErrorSink;
/// use weft_front::foundation::{FileId, Span};
/// use weft_front::{Backend, CapabilityValidator};
///
/// let unit = TemplateUnit::new(
///     "app.page",
///     EscapingMode::Contextual,
///     Span::detached(FileId(0)),
/// );
///
/// let mut sink = ErrorSink::new();
/// CapabilityValidator::new(Backend::Vm, &mut sink).check_unit(&unit);
/// assert_eq!(sink.len(), 1);
/// ```
pub struct CapabilityValidator<'a> {
    backend: Backend,
    reporter: &'a mut dyn ErrorReporter,
}

impl<'a> CapabilityValidator<'a> {
    /// Creates a validator targeting `backend`, reporting into `reporter`.
    pub fn new(backend: Backend, reporter: &'a mut dyn ErrorReporter) -> Self {
        Self { backend, reporter }
    }

    /// Walks one unit, reporting every unsupported construct found.
    pub fn check_unit(&mut self, unit: &TemplateUnit) {
        tracing::debug!(unit = %unit.name, backend = %self.backend, "capability check");

        if self.backend == Backend::Vm {
            if unit.escaping != EscapingMode::Strict {
                self.reporter.report(
                    unit.span,
                    DiagnosticKind::NonStrictEscaping,
                    format!(
                        "the {} backend only supports strict autoescaping, found '{}'",
                        self.backend, unit.escaping
                    ),
                );
            }

            for param in &unit.params {
                if param.decl == DeclSite::DocComment {
                    self.reporter.report(
                        unit.span,
                        DiagnosticKind::LegacyParamDecl,
                        format!(
                            "the {} backend does not support doc-comment params; declare \
                             '{}' in the template header instead",
                            self.backend, param.name
                        ),
                    );
                }
            }
        }

        for stmt in &unit.body {
            self.check_stmt(stmt);
        }
    }

    // Structural level. Recurses into every child statement and hands
    // every expression slot down, regardless of diagnostics already
    // reported on this node.
    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::RawText(_) => {}
            StmtKind::Print(slot) => self.check_slot(stmt, slot),
            StmtKind::Let { value, .. } => self.check_slot(stmt, value),
            StmtKind::If { arms, fallback } => {
                for arm in arms {
                    self.check_slot(stmt, &arm.cond);
                    for child in &arm.body {
                        self.check_stmt(child);
                    }
                }
                if let Some(body) = fallback {
                    for child in body {
                        self.check_stmt(child);
                    }
                }
            }
            StmtKind::Foreach { items, body, .. } => {
                self.check_slot(stmt, items);
                for child in body {
                    self.check_stmt(child);
                }
            }
            StmtKind::CallTemplate { args, .. } => {
                for (_, slot) in args {
                    self.check_slot(stmt, slot);
                }
            }
        }
    }

    // Expression-holder seam between the two walkers.
    fn check_slot(&mut self, holder: &Stmt, slot: &ExprSlot) {
        match slot {
            ExprSlot::Legacy { raw } => {
                if self.backend == Backend::Vm {
                    self.reporter.report(
                        holder.span,
                        DiagnosticKind::LegacyExpr,
                        format!(
                            "the {} backend does not support legacy v1 expressions: {raw}",
                            self.backend
                        ),
                    );
                }
            }
            ExprSlot::Parsed(expr) => check_expr(self.backend, self.reporter, expr),
        }
    }
}

// Expression level. A variable reference's binding kind decides the
// diagnostic; every other kind recurses into all of its children. The
// binding-kind enum is closed, so the match is complete by construction —
// an out-of-set kind cannot reach this walk.
fn check_expr(backend: Backend, reporter: &mut dyn ErrorReporter, expr: &Expr) {
    match &expr.kind {
        ExprKind::VarRef { binding, .. } => {
            if backend != Backend::Vm {
                return;
            }
            match binding {
                BindingKind::Local | BindingKind::Param => {}
                BindingKind::Injected => reporter.report(
                    expr.span,
                    DiagnosticKind::InjectedParamAccess,
                    format!(
                        "the {backend} backend requires injected params to be declared \
                         explicitly instead of accessed ambiently"
                    ),
                ),
                BindingKind::Undeclared => reporter.report(
                    expr.span,
                    DiagnosticKind::UndeclaredParamAccess,
                    format!("the {backend} backend requires all template params to be declared"),
                ),
            }
        }

        ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_) => {}

        ExprKind::FunctionCall { args, .. } => {
            for arg in args {
                check_expr(backend, reporter, arg);
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            check_expr(backend, reporter, lhs);
            check_expr(backend, reporter, rhs);
        }
        ExprKind::Not(operand) | ExprKind::Neg(operand) => {
            check_expr(backend, reporter, operand);
        }
        ExprKind::Conditional {
            cond,
            then,
            otherwise,
        } => {
            check_expr(backend, reporter, cond);
            check_expr(backend, reporter, then);
            check_expr(backend, reporter, otherwise);
        }
        ExprKind::FieldAccess { base, .. } => check_expr(backend, reporter, base),
        ExprKind::Index { base, index } => {
            check_expr(backend, reporter, base);
            check_expr(backend, reporter, index);
        }
        ExprKind::List(items) => {
            for item in items {
                check_expr(backend, reporter, item);
            }
        }
        ExprKind::Record(fields) => {
            for (_, value) in fields {
                check_expr(backend, reporter, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IfArm, ParamDecl};
    use crate::error::ErrorSink;
    use crate::foundation::{FileId, Span};

    fn sp(start: u32, end: u32) -> Span {
        Span::new(FileId(0), start, end)
    }

    fn check(unit: &TemplateUnit, backend: Backend) -> ErrorSink {
        let mut sink = ErrorSink::new();
        CapabilityValidator::new(backend, &mut sink).check_unit(unit);
        sink
    }

    #[test]
    fn test_clean_unit_reports_nothing() {
        let unit = TemplateUnit::new("app.ok", EscapingMode::Strict, sp(0, 10))
            .with_param(ParamDecl::header("name", sp(2, 7)))
            .with_stmt(Stmt::new(
                StmtKind::Print(ExprSlot::Parsed(Expr::var(
                    "name",
                    BindingKind::Param,
                    sp(12, 17),
                ))),
                sp(11, 18),
            ));

        assert!(check(&unit, Backend::Vm).is_empty());
    }

    #[test]
    fn test_non_strict_mode_and_doc_param() {
        // One non-strict mode plus one doc-comment param: exactly two
        // diagnostics, both citing the unit.
        let unit = TemplateUnit::new("app.legacy", EscapingMode::Contextual, sp(0, 10))
            .with_param(ParamDecl::doc_comment("name", sp(2, 7)));

        let sink = check(&unit, Backend::Vm);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 2);

        assert_eq!(diagnostics[0].kind, DiagnosticKind::NonStrictEscaping);
        assert!(diagnostics[0].message.contains("'contextual'"));
        assert_eq!(diagnostics[0].span, sp(0, 10));

        assert_eq!(diagnostics[1].kind, DiagnosticKind::LegacyParamDecl);
        assert!(diagnostics[1].message.contains("'name'"));
        assert_eq!(diagnostics[1].span, sp(0, 10));
    }

    #[test]
    fn test_injected_access_nested_in_call_args() {
        // The reference sits three call levels deep; the diagnostic must
        // cite the reference node, not any enclosing call.
        let reference = Expr::var("theme", BindingKind::Injected, sp(40, 45));
        let nested = Expr::call(
            "a",
            vec![Expr::call("b", vec![Expr::call("c", vec![reference], sp(30, 50))], sp(20, 55))],
            sp(10, 60),
        );
        let unit = TemplateUnit::new("app.inject", EscapingMode::Strict, sp(0, 70)).with_stmt(
            Stmt::new(StmtKind::Print(ExprSlot::Parsed(nested)), sp(5, 65)),
        );

        let sink = check(&unit, Backend::Vm);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::InjectedParamAccess);
        assert_eq!(diagnostics[0].span, sp(40, 45));
    }

    #[test]
    fn test_legacy_slot_cites_raw_text() {
        let unit = TemplateUnit::new("app.v1", EscapingMode::Strict, sp(0, 30)).with_stmt(
            Stmt::new(
                StmtKind::Print(ExprSlot::Legacy {
                    raw: "$items.0".to_string(),
                }),
                sp(5, 20),
            ),
        );

        let sink = check(&unit, Backend::Vm);
        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::LegacyExpr);
        assert!(diagnostics[0].message.contains("$items.0"));
        assert_eq!(diagnostics[0].span, sp(5, 20));
    }

    #[test]
    fn test_walk_is_exhaustive_not_short_circuiting() {
        // Three independent violations spread across nested structure;
        // a single pass reports all three.
        let unit = TemplateUnit::new("app.mixed", EscapingMode::Disabled, sp(0, 100))
            .with_stmt(Stmt::new(
                StmtKind::If {
                    arms: vec![IfArm {
                        cond: ExprSlot::Parsed(Expr::var(
                            "missing",
                            BindingKind::Undeclared,
                            sp(10, 18),
                        )),
                        body: vec![Stmt::new(
                            StmtKind::Let {
                                name: "x".to_string(),
                                value: ExprSlot::Legacy {
                                    raw: "$x.y.0".to_string(),
                                },
                            },
                            sp(20, 30),
                        )],
                    }],
                    fallback: None,
                },
                sp(8, 40),
            ));

        let sink = check(&unit, Backend::Vm);
        let kinds: Vec<_> = sink.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::NonStrictEscaping,
                DiagnosticKind::UndeclaredParamAccess,
                DiagnosticKind::LegacyExpr,
            ]
        );
    }

    #[test]
    fn test_foreach_and_call_template_slots_are_walked() {
        let unit = TemplateUnit::new("app.loop", EscapingMode::Strict, sp(0, 100))
            .with_stmt(Stmt::new(
                StmtKind::Foreach {
                    var: "item".to_string(),
                    items: ExprSlot::Parsed(Expr::var("rows", BindingKind::Undeclared, sp(10, 15))),
                    body: vec![Stmt::new(
                        StmtKind::CallTemplate {
                            callee: "app.row".to_string(),
                            args: vec![(
                                "data".to_string(),
                                ExprSlot::Parsed(Expr::var(
                                    "ctx",
                                    BindingKind::Injected,
                                    sp(20, 24),
                                )),
                            )],
                        },
                        sp(18, 30),
                    )],
                },
                sp(5, 40),
            ));

        let sink = check(&unit, Backend::Vm);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.diagnostics()[0].span, sp(10, 15));
        assert_eq!(sink.diagnostics()[1].span, sp(20, 24));
    }

    #[test]
    fn test_text_backends_accept_legacy_trees() {
        let unit = TemplateUnit::new("app.legacy", EscapingMode::Contextual, sp(0, 50))
            .with_param(ParamDecl::doc_comment("name", sp(2, 7)))
            .with_stmt(Stmt::new(
                StmtKind::Print(ExprSlot::Parsed(Expr::var(
                    "theme",
                    BindingKind::Injected,
                    sp(10, 15),
                ))),
                sp(9, 16),
            ));

        assert!(check(&unit, Backend::Js).is_empty());
        assert!(check(&unit, Backend::Py).is_empty());
    }
}
