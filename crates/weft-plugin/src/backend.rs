//! Code-generation target identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A code-generation target.
///
/// The front end treats a backend as an opaque key: it is used to select
/// implementation strategies and to parameterize the capability validator,
/// never interpreted beyond identity. The set is closed; adding a backend
/// forces every `match` over it to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// Virtual-machine bytecode. Generated code invokes runtime-library
    /// operations through static linkage and never synthesizes source text.
    Vm,
    /// JavaScript source output.
    Js,
    /// Python source output.
    Py,
}

impl Backend {
    /// All backends, in registration order.
    pub const ALL: [Backend; 3] = [Backend::Vm, Backend::Js, Backend::Py];

    /// Whether generated code for this backend is textual source.
    ///
    /// Text backends resolve runtime dependencies through generated import
    /// statements; the VM backend links statically and never needs them.
    pub fn is_text(self) -> bool {
        !matches!(self, Backend::Vm)
    }

    /// Short lowercase name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Backend::Vm => "vm",
            Backend::Js => "js",
            Backend::Py => "py",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_backends() {
        assert!(!Backend::Vm.is_text());
        assert!(Backend::Js.is_text());
        assert!(Backend::Py.is_text());
    }

    #[test]
    fn test_display_matches_name() {
        for backend in Backend::ALL {
            assert_eq!(backend.to_string(), backend.name());
        }
    }
}
