//! The emission contract.
//!
//! Emitters live outside this crate; what lives here is the seam they must
//! go through when they reach a
//! [`FunctionCall`](crate::ast::ExprKind::FunctionCall) node: resolve the
//! function's strategy for the active backend and turn the already-lowered
//! arguments into either one synthesized text expression or one VM runtime
//! invocation.
//!
//! Unlike validation diagnostics, failures here are hard errors. A
//! dispatch gap — the function has no strategy for this backend — aborts
//! code generation for that unit and backend pair with no partial output,
//! and an arity mismatch against a resolved runtime handle is an internal
//! defect, never a user diagnostic.

use thiserror::Error;
use weft_plugin::{Backend, PluginFunction, RuntimeHandle, Strategy, TextExpr};

/// Hard failure at the emission seam.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// The function has no strategy for the active backend.
    #[error("function '{function}' has no implementation for the {backend} backend")]
    DispatchGap {
        /// Function name as registered.
        function: String,
        /// Backend that was about to emit.
        backend: Backend,
    },

    /// The function's strategy for this backend is the wrong flavor for
    /// the requested lowering (e.g. a bytecode strategy on a text path).
    #[error("function '{function}' has no {backend} strategy of the requested form")]
    StrategyMismatch {
        /// Function name as registered.
        function: String,
        /// Backend that was about to emit.
        backend: Backend,
    },

    /// Lowered operand count disagrees with the runtime operation.
    #[error("function '{function}' lowered {found} operand(s) for a runtime op expecting {expected}")]
    ArityMismatch {
        /// Function name as registered.
        function: String,
        /// Operand count the runtime operation declares.
        expected: usize,
        /// Operand count actually lowered.
        found: usize,
    },
}

/// One VM invocation: the resolved runtime operation paired with the
/// lowered operands, in argument order. The emitter writes the actual
/// instruction; no implicit conversions happen here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmCall<'a, A> {
    /// Resolved runtime operation.
    pub handle: &'a RuntimeHandle,
    /// Lowered operands, in argument order.
    pub operands: &'a [A],
}

/// Synthesizes one text expression for a call to `function` on a text
/// backend, from the already-lowered argument texts.
///
/// The result carries the strategy's precedence so the enclosing context
/// can apply the wrap rule ([`TextExpr::embed`]): parenthesize only when
/// the enclosing precedence binds strictly tighter.
pub fn text_call(
    function: &PluginFunction,
    backend: Backend,
    args: &[TextExpr],
) -> Result<TextExpr, EmitError> {
    let strategy = function
        .strategy_for(backend)
        .ok_or_else(|| EmitError::DispatchGap {
            function: function.name().to_string(),
            backend,
        })?;

    let text = match strategy {
        Strategy::Text(text) => text,
        Strategy::Bytecode(_) => {
            return Err(EmitError::StrategyMismatch {
                function: function.name().to_string(),
                backend,
            })
        }
    };

    tracing::trace!(function = function.name(), %backend, "text lowering");
    Ok(text.expand(args))
}

/// Resolves a call to `function` into a VM runtime invocation over the
/// already-lowered operands.
pub fn vm_call<'a, A>(
    function: &'a PluginFunction,
    operands: &'a [A],
) -> Result<VmCall<'a, A>, EmitError> {
    let strategy = function
        .strategy_for(Backend::Vm)
        .ok_or_else(|| EmitError::DispatchGap {
            function: function.name().to_string(),
            backend: Backend::Vm,
        })?;

    let bytecode = match strategy {
        Strategy::Bytecode(bytecode) => bytecode,
        Strategy::Text(_) => {
            return Err(EmitError::StrategyMismatch {
                function: function.name().to_string(),
                backend: Backend::Vm,
            })
        }
    };

    if operands.len() != bytecode.arity() {
        return Err(EmitError::ArityMismatch {
            function: function.name().to_string(),
            expected: bytecode.arity(),
            found: operands.len(),
        });
    }

    tracing::trace!(function = function.name(), "vm lowering");
    Ok(VmCall {
        handle: bytecode.handle(),
        operands,
    })
}
