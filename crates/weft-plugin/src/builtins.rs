//! Built-in function catalogue.
//!
//! Every built-in is registered once with one strategy per backend it
//! supports. VM strategies name operations in the statically linked
//! runtime library; JS strategies that lean on the generated-code support
//! library declare the `weft.*` module they need, and Py strategies do the
//! same for Python stdlib imports.
//!
//! Precedence values for infix templates follow the conventional C-family
//! ladder: 7 for comparisons, 11 for additive, 12 for multiplicative.

use crate::{
    Backend, BytecodeStrategy, PluginFunction, PluginRegistry, Precedence, Signature, Strategy,
    TextStrategy,
};

/// Converts a typed map into the legacy untyped dict representation.
///
/// The two map types are deliberately incompatible in the template type
/// system; this conversion exists so one template can migrate its params
/// without forcing its transitive callees to migrate in the same change.
/// The declared return type is a placeholder the type checker overrides
/// during type resolution.
pub fn map_to_legacy_dict() -> PluginFunction {
    PluginFunction::new("mapToLegacyDict", Signature::exact(1))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.map.to_legacy_dict", 1)),
        )
        .with_strategy(
            Backend::Js,
            Strategy::Text(TextStrategy::call("weft.map.$$mapToLegacyDict({0})")),
        )
        .with_runtime_module(Backend::Js, "weft.map")
        .with_strategy(
            Backend::Py,
            Strategy::Text(TextStrategy::call("runtime.map_to_legacy_dict({0})")),
        )
}

/// Number of entries in a list or string.
pub fn length() -> PluginFunction {
    PluginFunction::new("length", Signature::exact(1))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.list.length", 1)),
        )
        .with_strategy(
            Backend::Js,
            // Member access: a non-atomic base must be wrapped.
            Strategy::Text(TextStrategy::new(
                "{0}.length",
                Precedence::ATOMIC,
                Precedence::ATOMIC,
            )),
        )
        .with_strategy(Backend::Py, Strategy::Text(TextStrategy::call("len({0})")))
}

/// Keys of a map, as a list.
pub fn keys() -> PluginFunction {
    PluginFunction::new("keys", Signature::exact(1))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.map.keys", 1)),
        )
        .with_strategy(
            Backend::Js,
            Strategy::Text(TextStrategy::call("weft.map.$$getKeys({0})")),
        )
        .with_runtime_module(Backend::Js, "weft.map")
        .with_strategy(
            Backend::Py,
            Strategy::Text(TextStrategy::call("runtime.map_keys({0})")),
        )
}

/// Smallest integer not less than the argument.
pub fn ceiling() -> PluginFunction {
    PluginFunction::new("ceiling", Signature::exact(1))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.math.ceil", 1)),
        )
        .with_strategy(
            Backend::Js,
            Strategy::Text(TextStrategy::call("Math.ceil({0})")),
        )
        .with_strategy(
            Backend::Py,
            Strategy::Text(TextStrategy::call("int(math.ceil({0}))")),
        )
        .with_runtime_module(Backend::Py, "math")
}

/// Whether the first string contains the second.
pub fn str_contains() -> PluginFunction {
    PluginFunction::new("strContains", Signature::exact(2))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.str.contains", 2)),
        )
        .with_strategy(
            Backend::Js,
            // Equality-level result; operands are isolated by template parens.
            Strategy::Text(TextStrategy::new(
                "({0}).indexOf({1}) != -1",
                Precedence(7),
                Precedence::LOOSEST,
            )),
        )
        .with_strategy(
            Backend::Py,
            Strategy::Text(TextStrategy::new(
                "({1}) in ({0})",
                Precedence(7),
                Precedence::LOOSEST,
            )),
        )
}

/// Half-open integer range: `range(stop)`, `range(start, stop)` or
/// `range(start, stop, step)`.
pub fn range() -> PluginFunction {
    PluginFunction::new("range", Signature::range(1, 3))
        .with_strategy(
            Backend::Vm,
            Strategy::Bytecode(BytecodeStrategy::new("runtime.list.range", 3)),
        )
        .with_strategy(
            Backend::Js,
            Strategy::Text(TextStrategy::call("weft.list.$$range({args})")),
        )
        .with_runtime_module(Backend::Js, "weft.list")
        .with_strategy(
            Backend::Py,
            Strategy::Text(TextStrategy::call("range({args})")),
        )
}

/// Registers the whole built-in catalogue into `registry`.
pub fn install(registry: &mut PluginRegistry) -> Result<(), crate::RegistryError> {
    registry.register(map_to_legacy_dict())?;
    registry.register(length())?;
    registry.register(keys())?;
    registry.register(ceiling())?;
    registry.register(str_contains())?;
    registry.register(range())?;
    Ok(())
}

/// A fresh registry holding exactly the built-in catalogue.
pub fn builtin_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    install(&mut registry).expect("builtin catalogue has no duplicate names");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextExpr;

    #[test]
    fn test_catalogue_installs_cleanly() {
        let registry = builtin_registry();
        assert_eq!(registry.len(), 6);
        for name in ["mapToLegacyDict", "length", "keys", "ceiling", "strContains", "range"] {
            assert!(registry.contains(name), "missing builtin '{name}'");
        }
    }

    #[test]
    fn test_every_builtin_covers_all_backends() {
        let registry = builtin_registry();
        for name in registry.names() {
            let function = registry.get(name).unwrap();
            for backend in Backend::ALL {
                assert!(
                    function.strategy_for(backend).is_some(),
                    "builtin '{name}' lacks a {backend} strategy"
                );
            }
        }
    }

    #[test]
    fn test_map_to_legacy_dict_js_form() {
        let function = map_to_legacy_dict();
        let strategy = function.strategy_for(Backend::Js).unwrap();
        let text = strategy.as_text().unwrap();

        let out = text.expand(&[TextExpr::atomic("$m")]);
        assert_eq!(out.text, "weft.map.$$mapToLegacyDict($m)");
        assert_eq!(out.precedence, Precedence::ATOMIC);

        let modules = function.required_runtime_modules(Backend::Js);
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].as_str(), "weft.map");
    }

    #[test]
    fn test_vm_strategies_resolve_handles() {
        let function = map_to_legacy_dict();
        let strategy = function.strategy_for(Backend::Vm).unwrap();
        let handle = strategy.as_bytecode().unwrap().handle();

        assert_eq!(handle.module, "runtime.map");
        assert_eq!(handle.symbol, "to_legacy_dict");
        assert_eq!(handle.arity, 1);
    }

    #[test]
    fn test_vm_backend_needs_no_runtime_modules() {
        for function in [map_to_legacy_dict(), length(), keys(), ceiling(), str_contains(), range()]
        {
            assert!(function.required_runtime_modules(Backend::Vm).is_empty());
        }
    }

    #[test]
    fn test_length_js_wraps_non_atomic_base() {
        let function = length();
        let text = function.strategy_for(Backend::Js).unwrap().as_text().unwrap();

        let sum = TextExpr::new("a + b", Precedence(11));
        assert_eq!(text.expand(&[sum]).text, "(a + b).length");

        let var = TextExpr::atomic("list");
        assert_eq!(text.expand(&[var]).text, "list.length");
    }

    #[test]
    fn test_range_py_is_variadic() {
        let function = range();
        let text = function.strategy_for(Backend::Py).unwrap().as_text().unwrap();

        let args = [TextExpr::atomic("1"), TextExpr::atomic("10")];
        assert_eq!(text.expand(&args).text, "range(1, 10)");
    }
}
