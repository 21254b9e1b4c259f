use std::{path::Path, str::FromStr};

use quill_codegen::{Document, RenderConfig};
use quill_core::QualifiedName;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Item, Result, Scope, validate::ParseContext};

/// Default manifest filename.
pub const MANIFEST_FILE: &str = "listing.toml";

/// Root of a `listing.toml` manifest: one source file.
///
/// ```toml
/// package = "com.example"
/// primary = "Greeter"
///
/// [render]
/// indent_unit = "  "
///
/// [imports]
/// types = ["java.util.List"]
///
/// [[body]]
/// block = "public final class Greeter"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Package of the file, empty for the default package
    #[serde(default)]
    pub package: String,

    /// Simple name of the primary type; names the output file
    pub primary: String,

    /// Comment written before the package clause
    #[serde(default)]
    pub header: Option<String>,

    /// Other top-level types declared in the file
    #[serde(default)]
    pub declares: Vec<String>,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub imports: Imports,

    #[serde(default)]
    pub body: Vec<Item>,
}

/// Imports declared by the manifest author.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Imports {
    /// Single-type imports (`java.util.List`)
    pub types: Vec<QualifiedName>,
    /// Single-static imports (`java.util.Collections#emptyList`)
    pub statics: Vec<QualifiedName>,
    /// On-demand imports of packages or nested types (`java.util`, `java.util.Map`)
    pub wildcards: Vec<Scope>,
    /// On-demand static imports of a type's members (`java.lang.Math`)
    pub static_wildcards: Vec<QualifiedName>,
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, MANIFEST_FILE)
    }
}

impl Manifest {
    /// Parse a manifest file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a manifest from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
        manifest.validate(content, filename)?;
        debug!(
            file = filename,
            primary = %manifest.primary,
            items = manifest.body.len(),
            "parsed manifest"
        );
        Ok(manifest)
    }

    /// Build the document described by this manifest.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new(&self.package, &self.primary);
        if let Some(header) = &self.header {
            doc = doc.header(header.clone());
        }
        for name in &self.declares {
            doc = doc.declare(name.clone());
        }

        let imports = doc.imports_mut();
        for name in &self.imports.types {
            imports.add_type(name.clone());
        }
        for member in &self.imports.statics {
            imports.add_static(member.clone());
        }
        for scope in &self.imports.wildcards {
            imports.add_wildcard(scope.0.clone());
        }
        for owner in &self.imports.static_wildcards {
            imports.add_static_wildcard(owner.clone());
        }

        doc.add_all(self.body.iter().map(Item::to_node))
    }

    /// Path of the rendered file relative to the output directory.
    pub fn file_path(&self) -> std::path::PathBuf {
        self.to_document().file_path()
    }

    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        let ctx = ParseContext::new(src, filename);

        ctx.validate_package(&self.package)?;
        ctx.validate_identifier(&self.primary, "primary type")?;
        for name in &self.declares {
            ctx.validate_identifier(name, "declared type")?;
            if *name == self.primary {
                return Err(ctx.error_at(
                    format!("'{name}' is already the primary type"),
                    name,
                ));
            }
        }

        for name in &self.imports.types {
            if name.is_member() || name.is_package() {
                return Err(ctx.error_at(
                    format!("'{name}' is not a type; use 'statics' or 'wildcards'"),
                    name.canonical(),
                ));
            }
        }
        for member in &self.imports.statics {
            if !member.is_member() {
                return Err(ctx.error(format!(
                    "static import '{member}' must name a member as 'Type#member'"
                )));
            }
        }
        for owner in &self.imports.static_wildcards {
            if owner.is_member() || owner.is_package() {
                return Err(ctx.error_at(
                    format!("'{owner}' is not a type"),
                    owner.canonical(),
                ));
            }
        }

        for (i, item) in self.body.iter().enumerate() {
            item.validate(&ctx.push(format!("body[{i}]")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quill_codegen::NamingPolicy;

    use super::*;

    fn parse(src: &str) -> Result<Manifest> {
        Manifest::from_str(src)
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = parse(r#"primary = "Main""#).unwrap();
        assert_eq!(manifest.package, "");
        assert_eq!(manifest.render, RenderConfig::default());
        assert_eq!(manifest.file_path(), std::path::PathBuf::from("Main.java"));
    }

    #[test]
    fn test_render_table() {
        let manifest = parse(
            r#"
            package = "com.example"
            primary = "Greeter"

            [render]
            indent_unit = "  "
            naming = "canonical"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.render.indent_unit, "  ");
        assert_eq!(manifest.render.naming, NamingPolicy::Canonical);
        assert!(manifest.render.prune_unused_imports);
    }

    #[test]
    fn test_imports_table() {
        let manifest = parse(
            r#"
            primary = "A"

            [imports]
            types = ["java.util.List"]
            statics = ["java.util.Collections#emptyList"]
            wildcards = ["java.nio.file", "java.util.Map"]
            static_wildcards = ["java.lang.Math"]
            "#,
        )
        .unwrap();
        let doc = manifest.to_document();
        let imports = doc.imports();
        assert_eq!(imports.len(), 5);
        assert!(imports.contains_static(&QualifiedName::parse("java.util.Collections#emptyList").unwrap()));
        assert!(imports.covers_type(&QualifiedName::parse("java.nio.file.Path").unwrap()));
        assert!(imports.covers_type(&QualifiedName::parse("java.util.Map.Entry").unwrap()));
    }

    #[test]
    fn test_static_import_must_be_member() {
        let err = parse(
            r#"
            primary = "A"
            [imports]
            statics = ["java.util.Collections"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_invalid_primary() {
        let err = parse(r#"primary = "not-valid""#).unwrap_err();
        assert!(matches!(*err, Error::Validation { span: Some(_), .. }));
    }

    #[test]
    fn test_invalid_package() {
        let err = parse("package = \"com..x\"\nprimary = \"A\"").unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let err = parse("primary = \"A\"\ncolour = \"red\"").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_invalid_import_name_is_parse_error() {
        let err = parse(
            r#"
            primary = "A"
            [imports]
            types = ["java.util.1List"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_template_error_names_item() {
        let err = parse(
            r#"
            primary = "A"

            [[body]]
            block = "class A"

            [[body.body]]
            statement = "int x = {{Q}}"
            "#,
        )
        .unwrap_err();
        match *err {
            Error::Template { ref item, ref source } => {
                assert_eq!(item, "body[0].body[0]");
                assert_eq!(source.fragment(), "{{Q}}");
            }
            ref other => panic!("expected a template error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_argument_is_template_error() {
        let err = parse(
            r#"
            primary = "A"

            [[body]]
            statement = "{{$}} = {{$}}"
            args = ["x"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::Template { .. }));
    }

    #[test]
    fn test_item_shape_errors() {
        for body in [
            "[[body]]\n",
            "[[body]]\nline = \"a\"\nstatement = \"b\"\n",
            "[[body]]\nline = \"a\"\n[[body.body]]\nline = \"b\"\n",
            "[[body]]\nline = \"a\"\nargs = [1]\n",
            "[[body]]\nstatement = \"a\"\nclose = \"}\"\n",
        ] {
            let src = format!("primary = \"A\"\n{body}");
            let err = parse(&src).unwrap_err();
            assert!(matches!(*err, Error::Validation { .. }), "{body}: {err}");
        }
    }

    #[test]
    fn test_declared_type_cannot_repeat_primary() {
        let err = parse("primary = \"A\"\ndeclares = [\"A\"]").unwrap_err();
        assert!(matches!(*err, Error::Validation { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "primary = \"Main\"\n").unwrap();
        assert_eq!(Manifest::from_file(&path).unwrap().primary, "Main");

        let err = Manifest::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
