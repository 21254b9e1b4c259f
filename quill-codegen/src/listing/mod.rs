//! Incremental text assembly with indentation and blank-line control.

mod indent;

pub use indent::Indent;
use indexmap::IndexSet;
use quill_core::{Bound, QualifiedName, TypeRef};

use crate::{
    Emit, RenderConfig, Result,
    naming::{Canonical, NameResolver},
    template::{Arg, Template},
};

/// Number of indentation prefixes computed up front.
const PRECOMPUTED_DEPTHS: usize = 8;

/// Append-only line assembler.
///
/// Text is appended to an in-progress line; [`Listing::newline`] finalizes
/// it with the indentation of the current depth. Empty lines are collapsed:
/// a listing never starts with a blank line and never holds two blank lines
/// in a row.
///
/// Every [`QualifiedName`] goes through a [`NameResolver`] that decides how
/// much of it to print. A discovery listing additionally records each name
/// it sees.
///
/// # Example
///
/// ```
/// use quill_codegen::{Listing, RenderConfig};
///
/// let config = RenderConfig::default().indent_unit("  ");
/// let mut listing = Listing::new(&config);
/// listing.append("BEGIN").newline();
/// listing.indent(1).append("body").newline();
/// listing.indent(-1).append("END.").newline();
/// assert_eq!(listing.materialize(), "BEGIN\n  body\nEND.\n");
/// ```
pub struct Listing<'a> {
    lines: Vec<String>,
    current: String,
    depth: usize,
    indents: Vec<String>,
    indent_unit: String,
    line_separator: String,
    resolver: &'a dyn NameResolver,
    collected: Option<IndexSet<QualifiedName>>,
}

impl Listing<'static> {
    /// Create a listing that prints every name fully qualified.
    pub fn new(config: &RenderConfig) -> Self {
        Listing::with_resolver(config, &Canonical)
    }
}

impl<'a> Listing<'a> {
    /// Create a listing that abbreviates names through `resolver`.
    pub fn with_resolver(config: &RenderConfig, resolver: &'a dyn NameResolver) -> Self {
        let indents = (0..PRECOMPUTED_DEPTHS)
            .map(|depth| config.indent_unit.repeat(depth))
            .collect();
        Self {
            lines: Vec::new(),
            current: String::new(),
            depth: 0,
            indents,
            indent_unit: config.indent_unit.clone(),
            line_separator: config.line_separator.clone(),
            resolver,
            collected: None,
        }
    }

    /// Create a discovery listing that records every name written to it.
    pub fn discovery(config: &RenderConfig, resolver: &'a dyn NameResolver) -> Self {
        let mut listing = Self::with_resolver(config, resolver);
        listing.collected = Some(IndexSet::new());
        listing
    }

    /// Append text to the in-progress line.
    ///
    /// `text` must not contain line breaks; use [`Listing::newline`] or
    /// [`Listing::eval`] for multi-line content.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.current.push_str(text);
        self
    }

    /// Finalize the in-progress line.
    ///
    /// An empty line is dropped when the previous line is empty too, or when
    /// nothing has been written yet.
    pub fn newline(&mut self) -> &mut Self {
        let line = std::mem::take(&mut self.current);
        if line.is_empty() {
            if self.lines.last().is_some_and(|l| !l.is_empty()) {
                self.lines.push(line);
            }
            return self;
        }
        let mut stored = String::with_capacity(self.prefix().len() + line.len());
        stored.push_str(self.prefix());
        stored.push_str(&line);
        self.lines.push(stored);
        self
    }

    /// Append `text` and finalize the line.
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.append(text).newline()
    }

    /// Finalize any open line, then add a blank line (subject to collapsing).
    pub fn blank(&mut self) -> &mut Self {
        if !self.current.is_empty() {
            self.newline();
        }
        self.newline()
    }

    /// Change the indentation depth by `delta`, clamping at zero.
    pub fn indent(&mut self, delta: isize) -> &mut Self {
        self.depth = self.depth.saturating_add_signed(delta);
        while self.indents.len() <= self.depth {
            let next = self.indent_unit.repeat(self.indents.len());
            self.indents.push(next);
        }
        self
    }

    /// Append every item, separated by `separator`.
    pub fn join_all<I, S>(&mut self, items: I, separator: &str) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            self.append(item.as_ref());
        }
        self
    }

    /// Write every item with `f`, separated by `separator`.
    pub fn join_with<I, T, F>(&mut self, items: I, separator: &str, mut f: F) -> Result<&mut Self>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T) -> Result<()>,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.append(separator);
            }
            f(self, item)?;
        }
        Ok(self)
    }

    /// Append a name abbreviated by the resolver.
    pub fn name(&mut self, name: &QualifiedName) -> &mut Self {
        let level = self.resolver.level(name);
        if let Some(collected) = &mut self.collected {
            collected.insert(name.clone());
        }
        self.current.push_str(level.apply(name));
        self
    }

    /// Append the textual form of a type, resolving every contained name.
    pub fn type_ref(&mut self, ty: &TypeRef) -> &mut Self {
        match ty {
            TypeRef::Primitive(p) => self.append(p.as_str()),
            TypeRef::Class { name, args } => {
                self.name(name);
                if !args.is_empty() {
                    self.append("<");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.append(", ");
                        }
                        self.type_ref(arg);
                    }
                    self.append(">");
                }
                self
            }
            TypeRef::Array(component) => self.type_ref(component).append("[]"),
            TypeRef::Variable(name) => self.append(name),
            TypeRef::Wildcard(None) => self.append("?"),
            TypeRef::Wildcard(Some(Bound::Extends(bound))) => {
                self.append("? extends ").type_ref(bound)
            }
            TypeRef::Wildcard(Some(Bound::Super(bound))) => self.append("? super ").type_ref(bound),
        }
    }

    /// Expand a template against `args` into this listing.
    pub fn eval(&mut self, template: &str, args: &[Arg]) -> Result<&mut Self> {
        Template::parse(template)?.write(self, args)?;
        Ok(self)
    }

    /// Emit a node.
    pub fn emit<E: Emit + ?Sized>(&mut self, node: &E) -> Result<&mut Self> {
        node.emit(self)?;
        Ok(self)
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Finalized lines, including their indentation.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Text of the in-progress line, without indentation.
    pub fn current_line(&self) -> &str {
        &self.current
    }

    /// Consume the listing and return the recorded names.
    pub fn into_collected(self) -> IndexSet<QualifiedName> {
        self.collected.unwrap_or_default()
    }

    /// Join all finalized lines and the open line into the final text.
    pub fn materialize(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push_str(&self.line_separator);
        }
        if !self.current.is_empty() {
            out.push_str(self.prefix());
            out.push_str(&self.current);
        }
        out
    }

    fn prefix(&self) -> &str {
        // indent() keeps the table at least depth + 1 long
        &self.indents[self.depth]
    }
}

impl Default for Listing<'static> {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use quill_core::{AbbreviationLevel, Primitive};

    use super::*;

    fn two_spaces() -> RenderConfig {
        RenderConfig::default().indent_unit("  ")
    }

    struct Bare;

    impl NameResolver for Bare {
        fn level(&self, _name: &QualifiedName) -> AbbreviationLevel {
            AbbreviationLevel::Bare
        }
    }

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn test_indentation_scenario() {
        let config = two_spaces();
        let mut listing = Listing::new(&config);
        listing.append("BEGIN").newline();
        listing.indent(1).append("body").newline();
        listing.indent(-1).append("END.").newline();
        assert_eq!(listing.materialize(), "BEGIN\n  body\nEND.\n");
    }

    #[test]
    fn test_blank_lines_collapse_on_fresh_buffer() {
        let mut listing = Listing::default();
        for _ in 0..5 {
            listing.newline();
        }
        assert!(listing.lines().is_empty());
        assert_eq!(listing.materialize(), "");
    }

    #[test]
    fn test_no_double_blank_lines() {
        let mut listing = Listing::default();
        listing.line("a").newline().newline().newline().line("b");
        listing.blank().blank().line("c");
        assert_eq!(listing.materialize(), "a\n\nb\n\nc\n");
    }

    #[test]
    fn test_indent_clamps_at_zero() {
        let mut listing = Listing::default();
        listing.indent(-100);
        assert_eq!(listing.depth(), 0);
        listing.line("x");
        assert_eq!(listing.materialize(), "x\n");
    }

    #[test]
    fn test_deep_indentation_grows_table() {
        let config = RenderConfig::default().indent_unit("-");
        let mut listing = Listing::new(&config);
        listing.indent(12).line("deep");
        assert_eq!(listing.materialize(), "------------deep\n");
    }

    #[test]
    fn test_blank_line_has_no_indentation() {
        let config = two_spaces();
        let mut listing = Listing::new(&config);
        listing.indent(2).line("a").blank().line("b");
        assert_eq!(listing.materialize(), "    a\n\n    b\n");
    }

    #[test]
    fn test_open_line_is_materialized_with_prefix() {
        let config = two_spaces();
        let mut listing = Listing::new(&config);
        listing.line("a").indent(1).append("open");
        assert_eq!(listing.materialize(), "a\n  open");
        // materialize doesn't consume state
        assert_eq!(listing.current_line(), "open");
    }

    #[test]
    fn test_custom_line_separator() {
        let config = RenderConfig::default().line_separator("\r\n");
        let mut listing = Listing::new(&config);
        listing.line("a").line("b");
        assert_eq!(listing.materialize(), "a\r\nb\r\n");
    }

    #[test]
    fn test_join_all() {
        let mut listing = Listing::default();
        listing.join_all(Vec::<&str>::new(), ", ");
        assert_eq!(listing.current_line(), "");
        listing.join_all(["a"], ", ");
        assert_eq!(listing.current_line(), "a");

        let mut listing = Listing::default();
        listing.join_all(["a", "b", "c"], ", ");
        assert_eq!(listing.current_line(), "a, b, c");
    }

    #[test]
    fn test_join_with() {
        let mut listing = Listing::default();
        let names = [name("java.util.List"), name("java.util.Set")];
        listing
            .join_with(&names, " & ", |out, n| {
                out.name(n);
                Ok(())
            })
            .unwrap();
        assert_eq!(listing.current_line(), "java.util.List & java.util.Set");
    }

    #[test]
    fn test_discovery_collects_names_once() {
        let config = RenderConfig::default();
        let mut listing = Listing::discovery(&config, &Bare);
        let list = name("java.util.List");
        listing.name(&list).append(" ").name(&list).append(" ");
        listing.name(&name("java.util.Map"));
        assert_eq!(listing.current_line(), "List List Map");
        let collected = listing.into_collected();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected.first(), Some(&list));
    }

    #[test]
    fn test_regular_listing_does_not_collect() {
        let mut listing = Listing::default();
        listing.name(&name("java.util.List"));
        assert!(listing.into_collected().is_empty());
    }

    #[test]
    fn test_type_ref_text() {
        let config = RenderConfig::default();
        let mut listing = Listing::with_resolver(&config, &Bare);
        let ty = TypeRef::generic(
            name("java.util.Map"),
            vec![
                TypeRef::class(name("java.lang.String")),
                TypeRef::array(TypeRef::primitive(Primitive::Int)),
            ],
        );
        listing.type_ref(&ty);
        assert_eq!(listing.current_line(), "Map<String, int[]>");
    }

    #[test]
    fn test_type_ref_wildcards() {
        let config = RenderConfig::default();
        let mut listing = Listing::with_resolver(&config, &Bare);
        let ty = TypeRef::generic(
            name("java.util.List"),
            vec![TypeRef::super_(TypeRef::variable("T"))],
        );
        listing.type_ref(&ty).append(" ");
        listing.type_ref(&TypeRef::generic(name("java.util.List"), vec![TypeRef::wildcard()]));
        assert_eq!(listing.current_line(), "List<? super T> List<?>");
    }
}
