//! Diagnostics and the error-reporting sink.
//!
//! Passes in this crate never abort on the first finding: every
//! user-facing problem is handed to an [`ErrorReporter`] and the walk
//! continues, so one pass surfaces everything wrong with a unit at once.
//! Whether "any diagnostics" means "abort code generation" is the
//! driver's policy, not the reporter's.
//!
//! Internal-invariant violations are a different category entirely: they
//! panic (or surface as hard `Result` errors at the emission seam) and are
//! never dressed up as user diagnostics.

use crate::foundation::{SourceMap, Span};
use std::fmt;

/// Category of a capability diagnostic.
///
/// Closed set; the renderer and any driver-side filtering match on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Unit declares an auto-escaping mode the backend cannot honor.
    NonStrictEscaping,
    /// Parameter declared in the legacy doc-comment form.
    LegacyParamDecl,
    /// Expression slot that never parsed into a tree (legacy v1 syntax).
    LegacyExpr,
    /// Ambient injected-parameter access.
    InjectedParamAccess,
    /// Reference to a parameter that was never declared.
    UndeclaredParamAccess,
}

impl DiagnosticKind {
    /// Human-readable category name.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::NonStrictEscaping => "non-strict escaping",
            DiagnosticKind::LegacyParamDecl => "legacy param declaration",
            DiagnosticKind::LegacyExpr => "legacy expression",
            DiagnosticKind::InjectedParamAccess => "injected param access",
            DiagnosticKind::UndeclaredParamAccess => "undeclared param access",
        }
    }
}

/// One user-facing finding with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of the finding.
    pub kind: DiagnosticKind,
    /// Where in the source it was found.
    pub span: Span,
    /// Human-readable cause.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}: {}", self.kind.name(), self.message)
    }
}

/// The sink a validation pass reports into.
///
/// The core calls [`report`](ErrorReporter::report) zero or more times per
/// pass and never inspects the outcome; an implementation may accumulate,
/// log, or raise as it sees fit.
pub trait ErrorReporter {
    /// Records one finding.
    fn report(&mut self, span: Span, kind: DiagnosticKind, message: String);
}

/// Accumulating [`ErrorReporter`], the default collaborator.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of findings so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Findings in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the sink, yielding its findings.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for ErrorSink {
    fn report(&mut self, span: Span, kind: DiagnosticKind, message: String) {
        tracing::trace!(kind = kind.name(), %span, "diagnostic reported");
        self.diagnostics.push(Diagnostic {
            kind,
            span,
            message,
        });
    }
}

/// Renders a diagnostic with its source line and a caret underline.
pub fn render(diagnostic: &Diagnostic, sources: &SourceMap) -> String {
    let mut out = format!("{diagnostic}\n");

    let (line, col) = sources.line_col(diagnostic.span);
    let path = sources.path(diagnostic.span);
    out.push_str(&format!("  --> {}:{line}:{col}\n", path.display()));

    if let Some(text) = sources.file(diagnostic.span).line_text(line) {
        let available = (text.len() + 1).saturating_sub(col as usize).max(1);
        let width = (diagnostic.span.len() as usize).clamp(1, available);
        out.push_str(&format!("{line:3} | {text}\n"));
        out.push_str(&format!(
            "    | {}{}\n",
            " ".repeat(col as usize - 1),
            "^".repeat(width)
        ));
    }

    out
}

/// Renders several diagnostics, blank-line separated.
pub fn render_all(diagnostics: &[Diagnostic], sources: &SourceMap) -> String {
    diagnostics
        .iter()
        .map(|d| render(d, sources))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::FileId;

    fn sink_with_one() -> ErrorSink {
        let mut sink = ErrorSink::new();
        sink.report(
            Span::new(FileId(0), 0, 4),
            DiagnosticKind::LegacyExpr,
            "legacy expression: $a.0".to_string(),
        );
        sink
    }

    #[test]
    fn test_sink_accumulates() {
        let mut sink = sink_with_one();
        assert_eq!(sink.len(), 1);

        sink.report(
            Span::new(FileId(0), 5, 9),
            DiagnosticKind::UndeclaredParamAccess,
            "undeclared param".to_string(),
        );
        assert_eq!(sink.len(), 2);
        assert!(!sink.is_empty());

        let diagnostics = sink.into_diagnostics();
        assert_eq!(diagnostics[0].kind, DiagnosticKind::LegacyExpr);
        assert_eq!(diagnostics[1].kind, DiagnosticKind::UndeclaredParamAccess);
    }

    #[test]
    fn test_display() {
        let sink = sink_with_one();
        let text = sink.diagnostics()[0].to_string();
        assert!(text.contains("legacy expression"));
        assert!(text.contains("$a.0"));
    }

    #[test]
    fn test_render_includes_location_and_caret() {
        let mut sources = SourceMap::new();
        let file = sources.add("page.weft", "{print $ij.theme}");
        let diagnostic = Diagnostic {
            kind: DiagnosticKind::InjectedParamAccess,
            span: Span::new(file, 7, 16),
            message: "ambient injection".to_string(),
        };

        let rendered = render(&diagnostic, &sources);
        assert!(rendered.contains("page.weft:1:8"));
        assert!(rendered.contains("{print $ij.theme}"));
        assert!(rendered.contains("^^^^^^^^^"));
    }
}
