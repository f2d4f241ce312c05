//! Per-backend implementation strategies.
//!
//! A strategy describes *how* one backend generates code for a function
//! call, declaratively rather than as executable code:
//!
//! - [`BytecodeStrategy`] names a runtime-library operation the VM emitter
//!   must invoke with the already-lowered argument values.
//! - [`TextStrategy`] is a template producing one textual expression from
//!   the already-lowered argument texts, tagged with a precedence so an
//!   enclosing context can decide whether to parenthesize it.
//!
//! The strategy set is closed. Every consumer matches exhaustively on
//! [`Strategy`], so adding a new backend representation is a compile-time
//! event, not a runtime surprise.

use std::fmt;
use std::sync::OnceLock;

/// Precedence of a synthesized textual expression.
///
/// Higher values bind tighter. The comparison rule is uniform across text
/// backends: an expression is wrapped in parentheses only when the
/// enclosing context's precedence is *strictly* higher than the
/// expression's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence(pub u32);

impl Precedence {
    /// Never needs parentheses — the expression is already atomic, e.g.
    /// function-call syntax or a bare identifier.
    pub const ATOMIC: Precedence = Precedence(u32::MAX);

    /// Binds looser than anything; embedding at this level never wraps.
    pub const LOOSEST: Precedence = Precedence(0);
}

/// One textual expression produced by a text backend, with the precedence
/// the enclosing printer needs for parenthesization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExpr {
    /// The expression source text.
    pub text: String,
    /// Precedence of the outermost operator in `text`.
    pub precedence: Precedence,
}

impl TextExpr {
    /// Creates a text expression at the given precedence.
    pub fn new(text: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            text: text.into(),
            precedence,
        }
    }

    /// Creates an atomic text expression (never needs parentheses).
    pub fn atomic(text: impl Into<String>) -> Self {
        Self::new(text, Precedence::ATOMIC)
    }

    /// Renders this expression for embedding in a context of the given
    /// precedence, wrapping in parentheses only when the context binds
    /// strictly tighter than the expression itself.
    pub fn embed(&self, context: Precedence) -> String {
        if context > self.precedence {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Display for TextExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Declarative template producing one textual expression.
///
/// The template string contains positional placeholders `{0}`, `{1}`, …
/// for individual lowered arguments, and `{args}` for all arguments joined
/// with `", "`. Everything else is emitted verbatim.
///
/// Each argument is embedded at `operand_precedence`: `LOOSEST` for
/// call-syntax templates whose delimiters already isolate the arguments,
/// or the operator's own level for infix templates.
///
/// # Examples
///
/// ```
/// use weft_plugin::{Precedence, TextExpr, TextStrategy};
///
/// let call = TextStrategy::call("runtime.keys({0})");
/// let out = call.expand(&[TextExpr::new("a + b", Precedence(11))]);
/// assert_eq!(out.text, "runtime.keys(a + b)");
/// assert_eq!(out.precedence, Precedence::ATOMIC);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStrategy {
    /// Template with `{N}` / `{args}` placeholders.
    pub template: String,
    /// Precedence of the produced expression.
    pub precedence: Precedence,
    /// Precedence context each argument is embedded at.
    pub operand_precedence: Precedence,
}

impl TextStrategy {
    /// General constructor.
    pub fn new(
        template: impl Into<String>,
        precedence: Precedence,
        operand_precedence: Precedence,
    ) -> Self {
        Self {
            template: template.into(),
            precedence,
            operand_precedence,
        }
    }

    /// Call-syntax template: the result is atomic and arguments sit between
    /// explicit delimiters, so they are never wrapped.
    pub fn call(template: impl Into<String>) -> Self {
        Self::new(template, Precedence::ATOMIC, Precedence::LOOSEST)
    }

    /// Expands the template over the lowered argument texts.
    ///
    /// Arity against the template is a caller contract: the type checker
    /// has already validated the call before emission ever runs, so a
    /// placeholder with no matching argument is a defect and panics.
    pub fn expand(&self, args: &[TextExpr]) -> TextExpr {
        let mut out = String::with_capacity(self.template.len() + 16 * args.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open + 1..];
            let close = tail
                .find('}')
                .unwrap_or_else(|| panic!("unterminated placeholder in template '{}'", self.template));
            let token = &tail[..close];

            if token == "args" {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&arg.embed(self.operand_precedence));
                }
            } else {
                let index: usize = token.parse().unwrap_or_else(|_| {
                    panic!("bad placeholder '{{{token}}}' in template '{}'", self.template)
                });
                let arg = args.get(index).unwrap_or_else(|| {
                    panic!(
                        "template '{}' references argument {index} but only {} were lowered",
                        self.template,
                        args.len()
                    )
                });
                out.push_str(&arg.embed(self.operand_precedence));
            }

            rest = &tail[close + 1..];
        }
        out.push_str(rest);

        TextExpr::new(out, self.precedence)
    }
}

/// Resolved form of a bytecode strategy's runtime operation.
///
/// Split from the dotted registration path once, on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeHandle {
    /// Runtime-library module path, e.g. `runtime.map`.
    pub module: String,
    /// Operation symbol within the module, e.g. `to_legacy_dict`.
    pub symbol: String,
    /// Declared operand count.
    pub arity: usize,
}

impl fmt::Display for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}/{}", self.symbol, self.arity)
        } else {
            write!(f, "{}.{}/{}", self.module, self.symbol, self.arity)
        }
    }
}

/// VM strategy: invoke a runtime-library static operation.
///
/// The operation is registered as a dotted path (`runtime.map.keys`); the
/// structured [`RuntimeHandle`] is computed on first use and cached for the
/// lifetime of the registry, so backends that never emit VM code never pay
/// for it. The cache is a `OnceLock`, which keeps concurrent first lookups
/// from parallel compilations race-free.
#[derive(Debug, Clone)]
pub struct BytecodeStrategy {
    op: String,
    arity: usize,
    handle: OnceLock<RuntimeHandle>,
}

impl BytecodeStrategy {
    /// Declares a runtime operation by dotted path and operand count.
    ///
    /// # Panics
    ///
    /// Panics if `op` is empty — a registration-time defect, not a user
    /// diagnostic.
    pub fn new(op: impl Into<String>, arity: usize) -> Self {
        let op = op.into();
        assert!(!op.is_empty(), "bytecode strategy registered with empty runtime op");
        Self {
            op,
            arity,
            handle: OnceLock::new(),
        }
    }

    /// The dotted runtime-operation path as registered.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Declared operand count.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Resolves the structured runtime handle, computing it on first use.
    pub fn handle(&self) -> &RuntimeHandle {
        self.handle.get_or_init(|| {
            tracing::trace!(op = %self.op, "resolving runtime handle");
            let (module, symbol) = match self.op.rfind('.') {
                Some(dot) => (self.op[..dot].to_string(), self.op[dot + 1..].to_string()),
                None => (String::new(), self.op.clone()),
            };
            RuntimeHandle {
                module,
                symbol,
                arity: self.arity,
            }
        })
    }
}

impl PartialEq for BytecodeStrategy {
    fn eq(&self, other: &Self) -> bool {
        // The cached handle is derived state and excluded from identity.
        self.op == other.op && self.arity == other.arity
    }
}

impl Eq for BytecodeStrategy {}

/// One backend's recipe for generating code for a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Invoke a runtime-library operation (VM backend).
    Bytecode(BytecodeStrategy),
    /// Synthesize a textual expression (scripting backends).
    Text(TextStrategy),
}

impl Strategy {
    /// The text strategy, if this is one.
    pub fn as_text(&self) -> Option<&TextStrategy> {
        match self {
            Strategy::Text(text) => Some(text),
            Strategy::Bytecode(_) => None,
        }
    }

    /// The bytecode strategy, if this is one.
    pub fn as_bytecode(&self) -> Option<&BytecodeStrategy> {
        match self {
            Strategy::Bytecode(bytecode) => Some(bytecode),
            Strategy::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_wraps_only_tighter_context() {
        let sum = TextExpr::new("a + b", Precedence(11));

        // Strictly tighter context wraps.
        assert_eq!(sum.embed(Precedence(14)), "(a + b)");
        // Equal or looser context does not.
        assert_eq!(sum.embed(Precedence(11)), "a + b");
        assert_eq!(sum.embed(Precedence::LOOSEST), "a + b");
    }

    #[test]
    fn test_atomic_never_wrapped() {
        let call = TextExpr::atomic("f(x)");
        assert_eq!(call.embed(Precedence::ATOMIC), "f(x)");
    }

    #[test]
    fn test_call_template_positional() {
        let strategy = TextStrategy::call("weft.map.$$toLegacyDict({0})");
        let out = strategy.expand(&[TextExpr::new("a + b", Precedence(11))]);

        assert_eq!(out.text, "weft.map.$$toLegacyDict(a + b)");
        assert_eq!(out.precedence, Precedence::ATOMIC);
    }

    #[test]
    fn test_variadic_template_joins_args() {
        let strategy = TextStrategy::call("range({args})");
        let args = [
            TextExpr::atomic("0"),
            TextExpr::atomic("n"),
            TextExpr::atomic("2"),
        ];
        assert_eq!(strategy.expand(&args).text, "range(0, n, 2)");
    }

    #[test]
    fn test_infix_template_wraps_loose_operands() {
        let strategy = TextStrategy::new("{0} * {1}", Precedence(12), Precedence(12));
        let out = strategy.expand(&[
            TextExpr::new("a + b", Precedence(11)),
            TextExpr::atomic("c"),
        ]);
        assert_eq!(out.text, "(a + b) * c");
    }

    #[test]
    fn test_literal_text_between_placeholders() {
        let strategy = TextStrategy::new("({1}) in ({0})", Precedence(7), Precedence::LOOSEST);
        let out = strategy.expand(&[TextExpr::atomic("haystack"), TextExpr::atomic("needle")]);
        assert_eq!(out.text, "(needle) in (haystack)");
    }

    #[test]
    #[should_panic(expected = "references argument 1")]
    fn test_missing_argument_is_a_defect() {
        TextStrategy::call("f({0}, {1})").expand(&[TextExpr::atomic("x")]);
    }

    #[test]
    fn test_handle_resolved_once() {
        let strategy = BytecodeStrategy::new("runtime.map.to_legacy_dict", 1);

        let first = strategy.handle() as *const RuntimeHandle;
        let second = strategy.handle() as *const RuntimeHandle;
        assert_eq!(first, second);

        let handle = strategy.handle();
        assert_eq!(handle.module, "runtime.map");
        assert_eq!(handle.symbol, "to_legacy_dict");
        assert_eq!(handle.arity, 1);
    }

    #[test]
    fn test_handle_without_module() {
        let strategy = BytecodeStrategy::new("halt", 0);
        let handle = strategy.handle();
        assert_eq!(handle.module, "");
        assert_eq!(handle.symbol, "halt");
        assert_eq!(handle.to_string(), "halt/0");
    }

    #[test]
    fn test_strategy_accessors() {
        let text = Strategy::Text(TextStrategy::call("f({0})"));
        assert!(text.as_text().is_some());
        assert!(text.as_bytecode().is_none());

        let bytecode = Strategy::Bytecode(BytecodeStrategy::new("runtime.list.length", 1));
        assert!(bytecode.as_bytecode().is_some());
        assert!(bytecode.as_text().is_none());
    }
}
