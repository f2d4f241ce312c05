//! Plugin function catalogue for the weft template compiler.
//!
//! A *plugin function* is one logical operation (built-in or user-supplied)
//! that must generate correct code for several unrelated backends. Each
//! backend has its own representation of "generated code": the VM backend
//! emits invocations of runtime-library operations, the scripting backends
//! synthesize textual expressions. Rather than reimplementing the function
//! catalogue once per backend, every function is registered exactly once
//! with a declarative *implementation strategy* per backend it supports.
//!
//! # Architecture
//!
//! - [`Backend`] — closed enum of code-generation targets
//! - [`Strategy`] — per-backend recipe ([`BytecodeStrategy`] or [`TextStrategy`])
//! - [`PluginFunction`] — one registration: name, signature, strategy table
//! - [`PluginRegistry`] — name lookup, populated once, read-only afterwards
//! - [`builtins`] — the built-in function catalogue
//!
//! A function lacking a strategy for the active backend is an *unsupported
//! construct* for that backend. Detecting that condition belongs to the
//! caller (the emitter or the capability validator), which is why
//! [`PluginFunction::strategy_for`] is a total lookup returning `Option`.
//!
//! # Concurrency
//!
//! The registry is populated before any compilation starts and never
//! mutated afterwards, so concurrent lookups from parallel compilations
//! need no synchronization. The one lazily computed piece of state, the
//! structured [`RuntimeHandle`] behind a bytecode strategy, sits behind a
//! `OnceLock` so the parse cost is paid only if the VM backend ever runs.

mod backend;
mod function;
mod registry;
mod strategy;

pub mod builtins;

pub use backend::Backend;
pub use function::{ModuleId, PluginFunction, Signature};
pub use registry::{PluginRegistry, RegistryError};
pub use strategy::{BytecodeStrategy, Precedence, RuntimeHandle, Strategy, TextExpr, TextStrategy};
