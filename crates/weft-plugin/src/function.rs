//! Backend-polymorphic function descriptors.

use crate::{Backend, Strategy};
use indexmap::IndexMap;
use std::fmt;

/// Identifier of a runtime-support module generated code depends on.
///
/// Text backends resolve these into import statements; the VM backend
/// links statically and never declares any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared arity bounds of a plugin function.
///
/// This is an opaque contract consumed by the type checker; nothing in
/// this crate reinterprets it. Final return-type resolution is likewise
/// the type checker's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Minimum accepted argument count.
    pub min_args: usize,
    /// Maximum accepted argument count.
    pub max_args: usize,
}

impl Signature {
    /// Fixed-arity signature.
    pub fn exact(arity: usize) -> Self {
        Self {
            min_args: arity,
            max_args: arity,
        }
    }

    /// Bounded variadic signature.
    pub fn range(min_args: usize, max_args: usize) -> Self {
        assert!(min_args <= max_args, "inverted signature bounds");
        Self { min_args, max_args }
    }
}

/// One callable operation, registered once, with an implementation
/// strategy per backend that can run it.
///
/// Separating *what* the function does (one registration) from *how* each
/// backend executes it (N strategies) keeps the catalogue a single source
/// of truth. A function missing a strategy for the active backend fails
/// uniformly through the emission seam rather than through backend-specific
/// errors deep in code generation.
///
/// Descriptors are built at registration time and never mutated afterwards,
/// which is what makes concurrent lookups across simultaneous compilations
/// safe without locks.
///
/// # Examples
///
/// ```
/// use weft_plugin::{Backend, BytecodeStrategy, PluginFunction, Signature, Strategy, TextStrategy};
///
/// let keys = PluginFunction::new("keys", Signature::exact(1))
///     .with_strategy(
///         Backend::Vm,
///         Strategy::Bytecode(BytecodeStrategy::new("runtime.map.keys", 1)),
///     )
///     .with_strategy(
///         Backend::Js,
///         Strategy::Text(TextStrategy::call("weft.map.$$getKeys({0})")),
///     )
///     .with_runtime_module(Backend::Js, "weft.map");
///
/// assert!(keys.strategy_for(Backend::Vm).is_some());
/// assert!(keys.strategy_for(Backend::Py).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PluginFunction {
    name: String,
    signature: Signature,
    strategies: IndexMap<Backend, Strategy>,
    runtime_modules: IndexMap<Backend, Vec<ModuleId>>,
}

impl PluginFunction {
    /// Starts a descriptor with no strategies.
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            strategies: IndexMap::new(),
            runtime_modules: IndexMap::new(),
        }
    }

    /// Adds the implementation strategy for one backend.
    ///
    /// # Panics
    ///
    /// Panics if the backend already has a strategy; the table holds at
    /// most one per backend and a second registration is a defect.
    pub fn with_strategy(mut self, backend: Backend, strategy: Strategy) -> Self {
        let previous = self.strategies.insert(backend, strategy);
        assert!(
            previous.is_none(),
            "duplicate {backend} strategy for function '{}'",
            self.name
        );
        self
    }

    /// Declares a runtime-support module the given backend's generated
    /// code depends on.
    pub fn with_runtime_module(mut self, backend: Backend, module: impl Into<String>) -> Self {
        self.runtime_modules
            .entry(backend)
            .or_default()
            .push(ModuleId::new(module));
        self
    }

    /// Canonical function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity bounds.
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Looks up the strategy for a backend.
    ///
    /// Total: absence is a valid, expected result meaning "this backend
    /// cannot run this function", not a failure.
    pub fn strategy_for(&self, backend: Backend) -> Option<&Strategy> {
        self.strategies.get(&backend)
    }

    /// Runtime-support modules the backend's generated code needs at run
    /// time. Empty for backends that declared none.
    pub fn required_runtime_modules(&self, backend: Backend) -> &[ModuleId] {
        self.runtime_modules
            .get(&backend)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Backends this function has a strategy for.
    pub fn supported_backends(&self) -> impl Iterator<Item = Backend> + '_ {
        self.strategies.keys().copied()
    }
}
