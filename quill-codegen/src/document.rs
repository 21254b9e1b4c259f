//! A source document and its two-pass render.
//!
//! The first pass writes the whole document through a discovery listing to
//! learn which names it references. The planner turns those names into an
//! [`ImportPlan`], and the second pass writes the same tree again with the
//! plan as resolver. Only the second pass produces output.

use std::path::PathBuf;

use indexmap::IndexSet;
use quill_core::QualifiedName;
use tracing::debug;

use crate::{
    Emit, ImportPlan, ImportPlanner, ImportTable, Listing, RenderConfig, Result, SourceFile,
    naming::DiscoveryPolicy,
};

/// A compilation unit: header, package clause, imports and body items.
///
/// Sections are separated by one blank line, as are body items.
///
/// # Example
///
/// ```
/// use quill_codegen::{Document, Node, RenderConfig, Statement};
/// use quill_core::QualifiedName;
///
/// let list = QualifiedName::parse("java.util.List").unwrap();
/// let doc = Document::new("com.example", "Names").add(Node::block(
///     "public final class Names",
///     vec![Node::statement(
///         Statement::new("private final {{T}}<String> all = {{T}}.of()")
///             .arg(list.clone())
///             .arg(list),
///     )],
/// ));
///
/// let text = doc.render(&RenderConfig::default()).unwrap();
/// assert_eq!(
///     text,
///     "package com.example;\n\
///      \n\
///      import java.util.List;\n\
///      \n\
///      public final class Names {\n    \
///          private final List<String> all = List.of();\n\
///      }\n"
/// );
/// ```
pub struct Document {
    package: String,
    primary: String,
    header: Option<String>,
    imports: ImportTable,
    declared: Vec<String>,
    body: Vec<Box<dyn Emit>>,
}

impl Document {
    /// Create a document for the primary type `primary` in `package`.
    ///
    /// An empty package denotes the default package.
    pub fn new(package: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            primary: primary.into(),
            header: None,
            imports: ImportTable::new(),
            declared: Vec::new(),
            body: Vec::new(),
        }
    }

    /// A comment written verbatim before the package clause.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn import(mut self, name: QualifiedName) -> Self {
        self.imports.add_type(name);
        self
    }

    pub fn import_static(mut self, member: QualifiedName) -> Self {
        self.imports.add_static(member);
        self
    }

    pub fn import_wildcard(mut self, scope: QualifiedName) -> Self {
        self.imports.add_wildcard(scope);
        self
    }

    pub fn import_static_wildcard(mut self, owner: QualifiedName) -> Self {
        self.imports.add_static_wildcard(owner);
        self
    }

    /// Declared imports, before planning.
    pub fn imports(&self) -> &ImportTable {
        &self.imports
    }

    pub fn imports_mut(&mut self) -> &mut ImportTable {
        &mut self.imports
    }

    /// Declare another top-level type of this file so its simple name is reserved.
    pub fn declare(mut self, simple_name: impl Into<String>) -> Self {
        self.declared.push(simple_name.into());
        self
    }

    /// Add a body item.
    #[allow(clippy::should_implement_trait)]
    pub fn add<E: Emit + 'static>(mut self, item: E) -> Self {
        self.body.push(Box::new(item));
        self
    }

    /// Add multiple body items.
    pub fn add_all<E: Emit + 'static>(mut self, items: impl IntoIterator<Item = E>) -> Self {
        for item in items {
            self.body.push(Box::new(item));
        }
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Names of the types this file declares.
    pub fn declared_names(&self) -> Vec<QualifiedName> {
        std::iter::once(&self.primary)
            .chain(&self.declared)
            .filter_map(|simple| QualifiedName::new(&self.package, [simple.as_str()]).ok())
            .collect()
    }

    /// Path of the file relative to a source root: `<package dirs>/<Primary>.java`.
    pub fn file_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(format!("{}.java", self.primary));
        path
    }

    /// Run the discovery pass and return every referenced name.
    pub fn discover(&self, config: &RenderConfig) -> Result<IndexSet<QualifiedName>> {
        let policy = DiscoveryPolicy::new(&self.package, &self.imports, config);
        let mut listing = Listing::discovery(config, &policy);
        self.write(&mut listing, &self.imports)?;
        let names = listing.into_collected();
        debug!(document = %self.primary, names = names.len(), "discovery pass");
        Ok(names)
    }

    /// Compute the import plan for `config`.
    pub fn plan(&self, config: &RenderConfig) -> Result<ImportPlan> {
        if !config.naming.is_planned() {
            return Ok(ImportPlan::canonical(&self.imports));
        }
        let names = self.discover(config)?;
        Ok(ImportPlanner::new(&self.package, &self.imports, config)
            .reserve(self.declared_names())
            .plan(&names))
    }

    /// Write the document with a finished plan.
    pub fn render_with(&self, plan: &ImportPlan, config: &RenderConfig) -> Result<String> {
        let mut listing = Listing::with_resolver(config, plan);
        self.write(&mut listing, plan.imports())?;
        let text = listing.materialize();
        debug!(
            document = %self.primary,
            lines = listing.lines().len(),
            imports = plan.imports().len(),
            "render pass"
        );
        Ok(text)
    }

    /// Plan and render in one call.
    pub fn render(&self, config: &RenderConfig) -> Result<String> {
        let plan = self.plan(config)?;
        self.render_with(&plan, config)
    }

    /// Render into a [`SourceFile`] at [`Document::file_path`].
    pub fn source_file(&self, config: &RenderConfig) -> Result<SourceFile> {
        Ok(SourceFile::new(self.file_path(), self.render(config)?))
    }

    fn write(&self, out: &mut Listing<'_>, imports: &ImportTable) -> Result<()> {
        if let Some(header) = &self.header {
            for line in header.lines() {
                out.line(line);
            }
        }
        if !self.package.is_empty() {
            out.blank();
            out.append("package ").append(&self.package).append(";").newline();
        }
        if !imports.is_empty() {
            out.blank();
            out.emit(imports)?;
        }
        for item in &self.body {
            out.blank();
            item.emit(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AbbreviationLevel, NamingPolicy, Node, Statement};

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn test_file_path() {
        assert_eq!(
            Document::new("com.example", "Greeter").file_path(),
            PathBuf::from("com/example/Greeter.java")
        );
        assert_eq!(
            Document::new("", "Main").file_path(),
            PathBuf::from("Main.java")
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new("", "Empty");
        assert_eq!(doc.render(&RenderConfig::default()).unwrap(), "");
    }

    #[test]
    fn test_sections_without_trailing_blank() {
        let doc = Document::new("com.example", "A")
            .header("// generated")
            .add(Node::line("class A {}"));
        assert_eq!(
            doc.render(&RenderConfig::default()).unwrap(),
            "// generated\n\npackage com.example;\n\nclass A {}\n"
        );
    }

    #[test]
    fn test_discover_collects_body_names_only() {
        let doc = Document::new("com.example", "A")
            .import(name("java.io.File"))
            .add(Node::statement(
                Statement::new("{{T}} x = {{T}}.of()")
                    .arg(name("java.util.List"))
                    .arg(name("java.util.List")),
            ));
        let names = doc.discover(&RenderConfig::default()).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec![name("java.util.List")]);
    }

    #[test]
    fn test_plan_reserves_declared_types() {
        let doc = Document::new("com.example", "List")
            .add(Node::statement(Statement::new("{{T}} x").arg(name("java.util.List"))));
        let plan = doc.plan(&RenderConfig::default()).unwrap();
        assert_eq!(plan.level(&name("java.util.List")), AbbreviationLevel::Full);
        assert!(plan.imports().is_empty());
    }

    #[test]
    fn test_canonical_policy_is_single_pass() {
        let doc = Document::new("com.example", "A")
            .import(name("java.io.File"))
            .add(Node::statement(Statement::new("{{T}} x").arg(name("java.util.List"))));
        let config = RenderConfig::default().naming(NamingPolicy::Canonical);
        assert_eq!(
            doc.render(&config).unwrap(),
            "package com.example;\n\nimport java.io.File;\n\njava.util.List x;\n"
        );
    }

    #[test]
    fn test_template_error_aborts_render() {
        let doc = Document::new("com.example", "A").add(Node::statement("x = {{Z}}"));
        assert!(doc.render(&RenderConfig::default()).is_err());
    }
}
