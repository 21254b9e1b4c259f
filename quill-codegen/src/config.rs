//! Render configuration.

use quill_core::QualifiedName;
use serde::{Deserialize, Serialize};

use crate::Indent;

/// How references are abbreviated in a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Print every name fully qualified in a single pass.
    Canonical,
    /// Plan abbreviations, but only through imports the caller declared.
    ExplicitOnly,
    /// Plan abbreviations and add the single imports they need.
    #[default]
    AutoImport,
}

impl NamingPolicy {
    /// Whether this policy needs the discovery pass.
    pub fn is_planned(&self) -> bool {
        !matches!(self, Self::Canonical)
    }
}

/// Configuration surface of a render.
///
/// Every field has a default so a partial `[render]` table is enough:
///
/// ```
/// use quill_codegen::{NamingPolicy, RenderConfig};
///
/// let config = RenderConfig::default()
///     .indent_unit("  ")
///     .naming(NamingPolicy::ExplicitOnly);
/// assert_eq!(config.indent_unit, "  ");
/// assert_eq!(config.line_separator, "\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// String written once per indentation level.
    pub indent_unit: String,
    /// String written after every finalized line.
    pub line_separator: String,
    /// Drop declared single imports that no reference uses.
    pub prune_unused_imports: bool,
    /// Abbreviation strategy.
    pub naming: NamingPolicy,
    /// Packages visible without any import (`java.lang`).
    pub implicit_packages: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_unit: Indent::JAVA.unit(),
            line_separator: "\n".to_string(),
            prune_unused_imports: true,
            naming: NamingPolicy::default(),
            implicit_packages: vec!["java.lang".to_string()],
        }
    }
}

impl RenderConfig {
    pub fn indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// Use one of the [`Indent`] presets.
    pub fn indent(self, indent: Indent) -> Self {
        self.indent_unit(indent.unit())
    }

    pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    pub fn prune_unused_imports(mut self, prune: bool) -> Self {
        self.prune_unused_imports = prune;
        self
    }

    pub fn naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Add a package to the implicitly visible namespace.
    pub fn implicit_package(mut self, package: impl Into<String>) -> Self {
        self.implicit_packages.push(package.into());
        self
    }

    /// Whether `name` is visible without an import through the implicit namespace.
    pub fn is_implicit(&self, name: &QualifiedName) -> bool {
        !name.is_package()
            && self
                .implicit_packages
                .iter()
                .any(|p| p == name.package_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.indent_unit, "    ");
        assert_eq!(config.line_separator, "\n");
        assert!(config.prune_unused_imports);
        assert_eq!(config.naming, NamingPolicy::AutoImport);
        assert_eq!(config.implicit_packages, vec!["java.lang"]);
    }

    #[test]
    fn test_is_implicit() {
        let config = RenderConfig::default();
        let string = QualifiedName::parse("java.lang.String").unwrap();
        let state = QualifiedName::parse("java.lang.Thread.State").unwrap();
        let method = QualifiedName::parse("java.lang.reflect.Method").unwrap();
        assert!(config.is_implicit(&string));
        assert!(config.is_implicit(&state));
        assert!(!config.is_implicit(&method));
    }

    #[test]
    fn test_partial_toml_table() {
        let config: RenderConfig = toml::from_str(
            r#"
            indent_unit = "\t"
            naming = "explicit-only"
            "#,
        )
        .unwrap();
        assert_eq!(config.indent_unit, "\t");
        assert_eq!(config.naming, NamingPolicy::ExplicitOnly);
        assert!(config.prune_unused_imports);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<RenderConfig, _> = toml::from_str("indent = 2");
        assert!(result.is_err());
    }
}
