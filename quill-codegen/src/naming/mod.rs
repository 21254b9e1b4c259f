//! Abbreviation policies for qualified names.
//!
//! - [`NameResolver`] - decides the [`AbbreviationLevel`] of each reference
//! - [`Canonical`] - prints everything fully qualified
//! - [`DiscoveryPolicy`] - provisional levels for the discovery render
//!
//! The final policy of a planned render is the
//! [`ImportPlan`](crate::imports::ImportPlan) itself.

use quill_core::{AbbreviationLevel, QualifiedName};

use crate::{RenderConfig, imports::ImportTable};

/// Decides how much of a qualified name is printed.
///
/// A resolver must give the same answer for equal names during one render.
pub trait NameResolver {
    fn level(&self, name: &QualifiedName) -> AbbreviationLevel;
}

/// Prints every name fully qualified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical;

impl NameResolver for Canonical {
    fn level(&self, _name: &QualifiedName) -> AbbreviationLevel {
        AbbreviationLevel::Full
    }
}

/// Provisional policy used while discovering which names a document uses.
///
/// Its output is thrown away; it only has to keep the discovery render
/// plausible. Explicitly imported names print bare, names from the
/// document's own package or the implicit namespace print relative and
/// everything else prints in full.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryPolicy<'a> {
    package: &'a str,
    imports: &'a ImportTable,
    config: &'a RenderConfig,
}

impl<'a> DiscoveryPolicy<'a> {
    pub fn new(package: &'a str, imports: &'a ImportTable, config: &'a RenderConfig) -> Self {
        Self {
            package,
            imports,
            config,
        }
    }
}

impl NameResolver for DiscoveryPolicy<'_> {
    fn level(&self, name: &QualifiedName) -> AbbreviationLevel {
        if self.imports.contains_type(name) || self.imports.contains_static(name) {
            AbbreviationLevel::Bare
        } else if name.in_package(self.package) || self.config.is_implicit(name) {
            AbbreviationLevel::Relative
        } else {
            AbbreviationLevel::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn test_canonical() {
        assert_eq!(
            Canonical.level(&name("java.util.List")),
            AbbreviationLevel::Full
        );
    }

    #[test]
    fn test_discovery_levels() {
        let config = RenderConfig::default();
        let mut imports = ImportTable::new();
        imports.add_type(name("java.util.List"));
        imports.add_static(name("java.util.Collections#emptyList"));
        let policy = DiscoveryPolicy::new("com.example", &imports, &config);

        assert_eq!(policy.level(&name("java.util.List")), AbbreviationLevel::Bare);
        assert_eq!(
            policy.level(&name("java.util.Collections#emptyList")),
            AbbreviationLevel::Bare
        );
        assert_eq!(
            policy.level(&name("com.example.Greeter")),
            AbbreviationLevel::Relative
        );
        assert_eq!(
            policy.level(&name("java.lang.String")),
            AbbreviationLevel::Relative
        );
        assert_eq!(policy.level(&name("java.util.Map")), AbbreviationLevel::Full);
        assert_eq!(
            policy.level(&name("com.example.sub.Other")),
            AbbreviationLevel::Full
        );
    }
}
