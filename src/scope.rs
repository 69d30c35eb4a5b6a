//! Classpath scope algebra
//!
//! A scope is the classpath visibility category attached to a dependency.
//! The partial order here decides which declared scopes survive onto a
//! given target classpath, and which scopes propagate through transitive
//! expansion at all.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classpath visibility category of a dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    None,
    Compile,
    Provided,
    Runtime,
    System,
    Test,
    /// An unrecognized scope name. Never visible on any classpath.
    Invalid,
}

impl Scope {
    /// Parse a declared scope name. An absent scope defaults to compile.
    pub fn from_name(name: Option<&str>) -> Scope {
        match name {
            None => Scope::Compile,
            Some(name) => match name.to_lowercase().as_str() {
                "compile" => Scope::Compile,
                "provided" => Scope::Provided,
                "runtime" => Scope::Runtime,
                "system" => Scope::System,
                "test" => Scope::Test,
                "none" => Scope::None,
                _ => Scope::Invalid,
            },
        }
    }

    /// Whether a dependency declared with this scope is visible when
    /// assembling the classpath for `target`.
    ///
    /// Compile is visible everywhere, runtime everywhere except compile,
    /// provided and system on the compile and test classpaths, and test
    /// only on its own classpath.
    pub fn is_in_classpath_of(self, target: Scope) -> bool {
        if self == target {
            return !matches!(self, Scope::None | Scope::Invalid);
        }
        match self {
            Scope::Compile => matches!(
                target,
                Scope::Provided | Scope::Runtime | Scope::System | Scope::Test
            ),
            Scope::Runtime => matches!(target, Scope::Test),
            Scope::Provided | Scope::System => matches!(target, Scope::Compile | Scope::Test),
            Scope::Test | Scope::None | Scope::Invalid => false,
        }
    }

    /// Whether this scope propagates beyond a direct dependency.
    ///
    /// Provided, system, and test dependencies stop at the manifest that
    /// declares them; compile and runtime flow through the whole graph.
    pub fn is_transitive(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::None => "none",
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::System => "system",
            Scope::Test => "test",
            Scope::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_defaults_to_compile() {
        assert_eq!(Scope::from_name(None), Scope::Compile);
        assert_eq!(Scope::from_name(Some("compile")), Scope::Compile);
        assert_eq!(Scope::from_name(Some("TEST")), Scope::Test);
        assert_eq!(Scope::from_name(Some("bogus")), Scope::Invalid);
    }

    #[test]
    fn test_compile_visible_on_every_classpath() {
        for target in [Scope::Compile, Scope::Runtime, Scope::Test] {
            assert!(Scope::Compile.is_in_classpath_of(target));
        }
    }

    #[test]
    fn test_runtime_not_on_compile_classpath() {
        assert!(!Scope::Runtime.is_in_classpath_of(Scope::Compile));
        assert!(Scope::Runtime.is_in_classpath_of(Scope::Runtime));
        assert!(Scope::Runtime.is_in_classpath_of(Scope::Test));
    }

    #[test]
    fn test_provided_and_system_skip_runtime() {
        for declared in [Scope::Provided, Scope::System] {
            assert!(declared.is_in_classpath_of(Scope::Compile));
            assert!(!declared.is_in_classpath_of(Scope::Runtime));
            assert!(declared.is_in_classpath_of(Scope::Test));
        }
    }

    #[test]
    fn test_test_scope_only_on_test_classpath() {
        assert!(!Scope::Test.is_in_classpath_of(Scope::Compile));
        assert!(!Scope::Test.is_in_classpath_of(Scope::Runtime));
        assert!(Scope::Test.is_in_classpath_of(Scope::Test));
    }

    #[test]
    fn test_invalid_and_none_never_visible() {
        for declared in [Scope::None, Scope::Invalid] {
            for target in [Scope::Compile, Scope::Runtime, Scope::Test] {
                assert!(!declared.is_in_classpath_of(target));
            }
            assert!(!declared.is_in_classpath_of(declared));
        }
    }

    #[test]
    fn test_transitivity() {
        assert!(Scope::Compile.is_transitive());
        assert!(Scope::Runtime.is_transitive());
        assert!(!Scope::Provided.is_transitive());
        assert!(!Scope::System.is_transitive());
        assert!(!Scope::Test.is_transitive());
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for scope in [
            Scope::Compile,
            Scope::Provided,
            Scope::Runtime,
            Scope::System,
            Scope::Test,
        ] {
            assert_eq!(Scope::from_name(Some(&scope.to_string())), scope);
        }
    }
}
