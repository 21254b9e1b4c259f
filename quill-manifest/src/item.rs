//! Body items and template arguments of a listing manifest.

use quill_codegen::{Arg, Node, Statement};
use quill_core::{Primitive, QualifiedName, Reflect, TypeRef, is_identifier};
use serde::Deserialize;

use crate::{Error, Result, validate::ParseContext};

/// One `[[body]]` entry.
///
/// Exactly one of `line`, `code`, `statement`, `block` or `blank` sets the
/// kind of the item. A `doc` comment may accompany any of them or stand alone.
///
/// ```toml
/// [[body]]
/// doc = "Greets people."
/// block = "public final class Greeter"
///
/// [[body.body]]
/// statement = "private final {{T}} names"
/// args = [{ type = "java.util.List", args = [{ type = "java.lang.String" }] }]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Item {
    pub doc: Option<String>,
    /// Verbatim text, no placeholders.
    pub line: Option<String>,
    /// A template on its own line.
    pub code: Option<String>,
    /// A template terminated by `;`.
    pub statement: Option<String>,
    /// Header template of a `{ ... }` block.
    pub block: Option<String>,
    /// Closing template of a block, `}` when absent.
    pub close: Option<String>,
    pub blank: bool,
    pub args: Vec<ArgSpec>,
    pub close_args: Vec<ArgSpec>,
    /// Children of a block.
    pub body: Vec<Item>,
}

impl Item {
    /// Check the item shape and every template it contains.
    pub(crate) fn validate(&self, ctx: &ParseContext<'_>) -> Result<()> {
        let kinds = [
            self.line.is_some(),
            self.code.is_some(),
            self.statement.is_some(),
            self.block.is_some(),
            self.blank,
        ];
        let location = ctx.path_string();
        match kinds.iter().filter(|set| **set).count() {
            0 if self.doc.is_none() => {
                return Err(ctx.error(format!(
                    "{location} needs one of 'line', 'code', 'statement', 'block', 'blank' or 'doc'"
                )));
            }
            0 | 1 => {}
            _ => {
                return Err(ctx.error(format!(
                    "{location} mixes several of 'line', 'code', 'statement', 'block' and 'blank'"
                )));
            }
        }
        if self.block.is_none() {
            if !self.body.is_empty() {
                return Err(ctx.error(format!("{location} has a body but is not a block")));
            }
            if self.close.is_some() {
                return Err(ctx.error(format!("{location} has 'close' but is not a block")));
            }
        }
        let templated = self.code.is_some() || self.statement.is_some() || self.block.is_some();
        if !templated && !self.args.is_empty() {
            return Err(ctx.error(format!("{location} takes no 'args'")));
        }
        if self.close.is_none() && !self.close_args.is_empty() {
            return Err(ctx.error(format!("{location} has 'close_args' without 'close'")));
        }

        for (i, child) in self.body.iter().enumerate() {
            child.validate(&ctx.push(format!("body[{i}]")))?;
        }

        let mut own = self.to_node_shallow();
        if let Node::Block { body, .. } = &mut own {
            body.clear();
        }
        own.check().map_err(|e| Error::template(location, e))
    }

    /// Convert into a body node.
    pub fn to_node(&self) -> Node {
        let node = self.to_node_shallow();
        match &self.doc {
            Some(doc) if matches!(node, Node::Sequence(ref nodes) if nodes.is_empty()) => {
                Node::doc(doc.clone())
            }
            Some(doc) => Node::sequence(vec![Node::doc(doc.clone()), node]),
            None => node,
        }
    }

    fn to_node_shallow(&self) -> Node {
        let statement = |template: &str, args: &[ArgSpec]| {
            Statement::new(template).args(args.iter().map(ArgSpec::to_arg))
        };
        if let Some(text) = &self.line {
            Node::line(text.clone())
        } else if let Some(template) = &self.code {
            Node::code(statement(template, &self.args))
        } else if let Some(template) = &self.statement {
            Node::statement(statement(template, &self.args))
        } else if let Some(header) = &self.block {
            let body = self.body.iter().map(Item::to_node).collect();
            let header = statement(header, &self.args);
            match &self.close {
                Some(close) => {
                    Node::block_with_close(header, body, statement(close, &self.close_args))
                }
                None => Node::block(header, body),
            }
        } else if self.blank {
            Node::blank()
        } else {
            Node::sequence(Vec::new())
        }
    }
}

/// A template argument as written in TOML.
///
/// Plain values map to themselves; tables pick the argument kind:
/// `{ name = "java.util.List" }`, `{ char = "x" }`, `{ null = true }` or a
/// [`TypeSpec`] such as `{ type = "int", dims = 1 }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArgSpec {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Name { name: QualifiedName },
    Char { char: char },
    Null { null: bool },
    Type(TypeSpec),
}

impl ArgSpec {
    pub fn to_arg(&self) -> Arg {
        match self {
            Self::Bool(b) => Arg::Bool(*b),
            Self::Int(n) => Arg::Int(*n),
            Self::Float(x) => Arg::Float(*x),
            Self::Str(s) => Arg::Str(s.clone()),
            Self::Name { name } => Arg::Name(name.clone()),
            Self::Char { char } => Arg::Char(*char),
            Self::Null { .. } => Arg::Null,
            Self::Type(ty) => Arg::reflect(ty),
        }
    }
}

/// A type reference as written in TOML, checked while parsing.
///
/// `type` is a primitive keyword, `?` for a wildcard, or a qualified class
/// name. `variable = true` marks a type variable, `dims` adds array
/// dimensions and `args` holds type arguments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawType")]
pub struct TypeSpec(TypeRef);

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawType {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    args: Vec<TypeSpec>,
    #[serde(default)]
    dims: usize,
    #[serde(default)]
    variable: bool,
    #[serde(default)]
    extends: Option<Box<TypeSpec>>,
    #[serde(default, rename = "super")]
    super_: Option<Box<TypeSpec>>,
}

impl TryFrom<RawType> for TypeSpec {
    type Error = String;

    fn try_from(raw: RawType) -> std::result::Result<Self, Self::Error> {
        let RawType {
            ty,
            args,
            dims,
            variable,
            extends,
            super_,
        } = raw;

        if ty != "?" && (extends.is_some() || super_.is_some()) {
            return Err(format!("only wildcards take bounds, '{ty}' is not '?'"));
        }
        let base = if ty == "?" {
            if dims > 0 || !args.is_empty() {
                return Err("a wildcard takes no 'args' or 'dims'".to_string());
            }
            match (extends, super_) {
                (None, None) => TypeRef::wildcard(),
                (Some(bound), None) => TypeRef::extends(bound.0),
                (None, Some(bound)) => TypeRef::super_(bound.0),
                (Some(_), Some(_)) => {
                    return Err("a wildcard has either 'extends' or 'super'".to_string());
                }
            }
        } else if variable {
            if !is_identifier(&ty) || !args.is_empty() {
                return Err(format!("invalid type variable '{ty}'"));
            }
            TypeRef::variable(ty)
        } else if let Some(primitive) = Primitive::from_keyword(&ty) {
            if !args.is_empty() {
                return Err(format!("primitive '{ty}' takes no type arguments"));
            }
            TypeRef::primitive(primitive)
        } else {
            let name = QualifiedName::parse(&ty).map_err(|e| e.to_string())?;
            if name.is_member() {
                return Err(format!("'{ty}' is a member, not a type"));
            }
            TypeRef::generic(name, args.into_iter().map(|a| a.0).collect())
        };
        Ok(Self(TypeRef::array_of(base, dims)))
    }
}

impl Reflect for TypeSpec {
    fn reflect(&self) -> TypeRef {
        self.0.clone()
    }
}

/// Target of a wildcard import: a package (`java.util`) or a type (`java.util.Map`).
///
/// A trailing lowercase segment means a package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Scope(pub QualifiedName);

impl TryFrom<String> for Scope {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let last = s.rsplit('.').next().unwrap_or_default();
        let name = if last.chars().next().is_some_and(char::is_lowercase) {
            QualifiedName::package(&s)
        } else {
            QualifiedName::parse(&s)
        };
        match name {
            Ok(name) if name.is_member() => Err(format!("'{s}' is a member, not a package or type")),
            Ok(name) => Ok(Self(name)),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Args {
        args: Vec<ArgSpec>,
    }

    fn args(src: &str) -> Vec<ArgSpec> {
        toml::from_str::<Args>(src).unwrap().args
    }

    fn ty(src: &str) -> std::result::Result<TypeRef, toml::de::Error> {
        toml::from_str::<std::collections::HashMap<String, TypeSpec>>(src)
            .map(|mut map| map.remove("t").unwrap().reflect())
    }

    #[test]
    fn test_plain_args() {
        let parsed = args(r#"args = [true, 3, 1.5, "x"]"#);
        assert_eq!(
            parsed.iter().map(ArgSpec::to_arg).collect::<Vec<_>>(),
            vec![Arg::Bool(true), Arg::Int(3), Arg::Float(1.5), Arg::from("x")]
        );
    }

    #[test]
    fn test_table_args() {
        let parsed = args(
            r#"args = [{ name = "java.util.Collections#emptyList" }, { char = "c" }, { null = true }]"#,
        );
        assert_eq!(
            parsed[0].to_arg(),
            Arg::Name(QualifiedName::parse("java.util.Collections#emptyList").unwrap())
        );
        assert_eq!(parsed[1].to_arg(), Arg::Char('c'));
        assert_eq!(parsed[2].to_arg(), Arg::Null);
    }

    #[test]
    fn test_type_specs() {
        assert_eq!(ty(r#"t = { type = "int", dims = 2 }"#).unwrap().to_string(), "int[][]");
        assert_eq!(
            ty(r#"t = { type = "java.util.Map", args = [{ type = "java.lang.String" }, { type = "?", extends = { type = "java.lang.Number" } }] }"#)
                .unwrap()
                .to_string(),
            "java.util.Map<java.lang.String, ? extends java.lang.Number>"
        );
        assert_eq!(
            ty(r#"t = { type = "T", variable = true }"#).unwrap(),
            TypeRef::variable("T")
        );
    }

    #[test]
    fn test_invalid_type_specs() {
        assert!(ty(r#"t = { type = "int", args = [{ type = "java.lang.String" }] }"#).is_err());
        assert!(ty(r#"t = { type = "java.util.List", extends = { type = "java.lang.Object" } }"#).is_err());
        assert!(ty(r#"t = { type = "java.util.1List" }"#).is_err());
        assert!(ty(r#"t = { type = "java.util.List", colour = "red" }"#).is_err());
    }

    #[test]
    fn test_scope() {
        let package = Scope::try_from("java.util".to_string()).unwrap();
        assert!(package.0.is_package());
        let ty = Scope::try_from("java.util.Map".to_string()).unwrap();
        assert!(!ty.0.is_package());
        assert!(Scope::try_from("java.util.Collections#emptyList".to_string()).is_err());
    }

    #[test]
    fn test_doc_only_item() {
        let item = Item {
            doc: Some("Note.".to_string()),
            ..Item::default()
        };
        assert_eq!(item.to_node(), Node::doc("Note."));
    }
}
