//! Process-wide plugin function registry.

use crate::PluginFunction;
use indexmap::IndexMap;
use thiserror::Error;

/// Error raised while populating a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A second function was registered under an existing name.
    #[error("duplicate plugin function '{0}'")]
    Duplicate(String),
}

/// Name-keyed table of [`PluginFunction`] descriptors.
///
/// Populated once before compilation begins and treated as read-only for
/// the rest of the process: every lookup takes `&self`, so a registry can
/// be shared freely across units and backends compiled in parallel.
///
/// Resolving an *unknown* function name is a type-checking-time error and
/// distinct from "known function, no strategy for this backend" — the
/// registry only answers the lookup, it holds no policy.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    functions: IndexMap<String, PluginFunction>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function under its canonical name.
    pub fn register(&mut self, function: PluginFunction) -> Result<(), RegistryError> {
        let name = function.name().to_string();
        if self.functions.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(function = %name, "plugin function registered");
        self.functions.insert(name, function);
        Ok(())
    }

    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&PluginFunction> {
        self.functions.get(name)
    }

    /// Whether a function with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signature;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PluginRegistry::new();
        registry
            .register(PluginFunction::new("length", Signature::exact(1)))
            .unwrap();

        assert!(registry.contains("length"));
        assert_eq!(registry.get("length").unwrap().name(), "length");
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = PluginRegistry::new();
        registry
            .register(PluginFunction::new("length", Signature::exact(1)))
            .unwrap();

        let err = registry
            .register(PluginFunction::new("length", Signature::exact(1)))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("length".to_string()));

        // The original registration survives.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_in_registration_order() {
        let mut registry = PluginRegistry::new();
        for name in ["ceiling", "abs", "keys"] {
            registry
                .register(PluginFunction::new(name, Signature::exact(1)))
                .unwrap();
        }
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["ceiling", "abs", "keys"]);
    }
}
