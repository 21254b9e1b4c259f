//! Emittable nodes of a document body.
//!
//! Nodes form the declaration tree a [`Document`](crate::Document) renders
//! twice. They hold no rendering state, so both passes walk the exact same
//! tree.

use crate::{Arg, Listing, Result, Template};

/// Something that can write itself into a [`Listing`].
///
/// Implementations must write through the listing's name methods
/// ([`Listing::name`], [`Listing::type_ref`], [`Listing::eval`]) so that
/// discovery sees every reference.
pub trait Emit {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()>;
}

impl<T: Emit + ?Sized> Emit for &T {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        (*self).emit(out)
    }
}

impl<T: Emit + ?Sized> Emit for Box<T> {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        self.as_ref().emit(out)
    }
}

impl<T: Emit> Emit for [T] {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        for item in self {
            item.emit(out)?;
        }
        Ok(())
    }
}

impl<T: Emit> Emit for Vec<T> {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        self.as_slice().emit(out)
    }
}

/// A template with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub template: String,
    pub args: Vec<Arg>,
}

impl Statement {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            args: Vec::new(),
        }
    }

    /// Add one argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Parse the template and bind the arguments without writing anything.
    pub fn check(&self) -> Result<()> {
        Template::parse(&self.template)?.check(&self.args)
    }

    fn write(&self, out: &mut Listing<'_>) -> Result<()> {
        out.eval(&self.template, &self.args)?;
        Ok(())
    }
}

impl From<&str> for Statement {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// A node of the document body.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Verbatim text, one listing line per text line. No name resolution.
    Line(String),
    /// A blank line (collapsed with neighbouring blanks).
    Blank,
    /// A template on its own line.
    Code(Statement),
    /// A template terminated by `;`.
    Statement(Statement),
    /// `header {`, the indented body, then the closing line (`}` by default).
    Block {
        header: Statement,
        body: Vec<Node>,
        close: Option<Statement>,
    },
    /// Nodes one level deeper.
    Indent(Vec<Node>),
    /// Nodes at the current level.
    Sequence(Vec<Node>),
    /// A Javadoc comment.
    Doc(String),
}

impl Node {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    pub fn blank() -> Self {
        Self::Blank
    }

    pub fn code(statement: impl Into<Statement>) -> Self {
        Self::Code(statement.into())
    }

    pub fn statement(statement: impl Into<Statement>) -> Self {
        Self::Statement(statement.into())
    }

    pub fn block(header: impl Into<Statement>, body: Vec<Node>) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close: None,
        }
    }

    /// A block with a custom closing line such as `} while (running);`.
    pub fn block_with_close(
        header: impl Into<Statement>,
        body: Vec<Node>,
        close: impl Into<Statement>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close: Some(close.into()),
        }
    }

    pub fn indent(nodes: Vec<Node>) -> Self {
        Self::Indent(nodes)
    }

    pub fn sequence(nodes: Vec<Node>) -> Self {
        Self::Sequence(nodes)
    }

    pub fn doc(text: impl Into<String>) -> Self {
        Self::Doc(text.into())
    }

    /// Validate every template in this node and its children.
    pub fn check(&self) -> Result<()> {
        match self {
            Self::Line(_) | Self::Blank | Self::Doc(_) => Ok(()),
            Self::Code(s) | Self::Statement(s) => s.check(),
            Self::Block {
                header,
                body,
                close,
            } => {
                header.check()?;
                body.iter().try_for_each(Node::check)?;
                close.as_ref().map_or(Ok(()), Statement::check)
            }
            Self::Indent(nodes) | Self::Sequence(nodes) => nodes.iter().try_for_each(Node::check),
        }
    }
}

impl From<Statement> for Node {
    fn from(statement: Statement) -> Self {
        Self::Statement(statement)
    }
}

impl Emit for Node {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        match self {
            Self::Line(text) => {
                for line in text.lines() {
                    out.line(line);
                }
            }
            Self::Blank => {
                out.blank();
            }
            Self::Code(statement) => {
                statement.write(out)?;
                finish_line(out);
            }
            Self::Statement(statement) => {
                statement.write(out)?;
                out.append(";").newline();
            }
            Self::Block {
                header,
                body,
                close,
            } => {
                header.write(out)?;
                out.append(" {").newline();
                out.indent(1);
                body.emit(out)?;
                out.indent(-1);
                match close {
                    Some(close) => {
                        close.write(out)?;
                        finish_line(out);
                    }
                    None => {
                        out.line("}");
                    }
                }
            }
            Self::Indent(nodes) => {
                out.indent(1);
                nodes.emit(out)?;
                out.indent(-1);
            }
            Self::Sequence(nodes) => nodes.emit(out)?,
            Self::Doc(text) => emit_doc(out, text),
        }
        Ok(())
    }
}

fn finish_line(out: &mut Listing<'_>) {
    if !out.current_line().is_empty() {
        out.newline();
    }
}

fn emit_doc(out: &mut Listing<'_>, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    if let [single] = lines.as_slice() {
        out.append("/** ").append(single).append(" */").newline();
        return;
    }
    out.line("/**");
    for line in lines {
        if line.is_empty() {
            out.line(" *");
        } else {
            out.append(" * ").append(line).newline();
        }
    }
    out.line(" */");
}

#[cfg(test)]
mod tests {
    use quill_core::QualifiedName;

    use super::*;
    use crate::RenderConfig;

    fn render(node: &Node) -> String {
        let config = RenderConfig::default().indent_unit("  ");
        let mut listing = Listing::new(&config);
        listing.emit(node).unwrap();
        listing.materialize()
    }

    #[test]
    fn test_statement() {
        let node = Node::statement(Statement::new("int {{$}} = {{$}}").arg("count").arg(0));
        assert_eq!(render(&node), "int count = 0;\n");
    }

    #[test]
    fn test_block() {
        let node = Node::block(
            Statement::new("if ({{$}})").arg("ready"),
            vec![Node::statement("start()"), Node::statement("return")],
        );
        assert_eq!(render(&node), "if (ready) {\n  start();\n  return;\n}\n");
    }

    #[test]
    fn test_block_with_close() {
        let node = Node::block_with_close(
            "do",
            vec![Node::statement("step()")],
            Statement::new("} while ({{$}});").arg("running"),
        );
        assert_eq!(render(&node), "do {\n  step();\n} while (running);\n");
    }

    #[test]
    fn test_nested_blocks() {
        let node = Node::block(
            "class Outer",
            vec![Node::block(
                "void run()",
                vec![Node::statement("System.out.println()")],
            )],
        );
        assert_eq!(
            render(&node),
            "class Outer {\n  void run() {\n    System.out.println();\n  }\n}\n"
        );
    }

    #[test]
    fn test_code_with_trailing_newline() {
        let node = Node::sequence(vec![Node::code("@Override\n"), Node::line("void run();")]);
        assert_eq!(render(&node), "@Override\nvoid run();\n");
    }

    #[test]
    fn test_indent_group() {
        let node = Node::sequence(vec![
            Node::line("a"),
            Node::indent(vec![Node::line("b\nc")]),
            Node::line("d"),
        ]);
        assert_eq!(render(&node), "a\n  b\n  c\nd\n");
    }

    #[test]
    fn test_doc_comments() {
        assert_eq!(render(&Node::doc("Greets.")), "/** Greets. */\n");
        assert_eq!(
            render(&Node::doc("Greets.\n\n@author me")),
            "/**\n * Greets.\n *\n * @author me\n */\n"
        );
    }

    #[test]
    fn test_check_finds_nested_errors() {
        let node = Node::block(
            "class A",
            vec![Node::indent(vec![Node::statement("x = {{Q}}")])],
        );
        assert!(node.check().is_err());
        let node = Node::block(
            "class A",
            vec![Node::statement(
                Statement::new("{{T}} x").arg(QualifiedName::parse("java.io.File").unwrap()),
            )],
        );
        assert!(node.check().is_ok());
    }
}
