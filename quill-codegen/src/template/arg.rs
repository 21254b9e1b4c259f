use quill_core::{QualifiedName, Reflect, TypeRef};
use serde::Serialize;

/// A positional template argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Arg {
    Str(String),
    Char(char),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// A name routed through the resolver by `N` and `T`.
    Name(QualifiedName),
    Type(TypeRef),
}

impl Arg {
    /// Mirror anything reflectable into a type argument.
    pub fn reflect(value: &impl Reflect) -> Self {
        Self::Type(value.reflect())
    }

    /// Short kind label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Char(_) => "char",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Null => "null",
            Self::Name(_) => "name",
            Self::Type(_) => "type",
        }
    }

    /// The plain string form written by `$`.
    pub fn plain(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Char(c) => c.to_string(),
            Self::Int(n) => n.to_string(),
            // Debug keeps the fractional part: 1.0 rather than 1
            Self::Float(x) => format!("{x:?}"),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Name(name) => name.canonical().to_string(),
            Self::Type(ty) => ty.to_string(),
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<QualifiedName> for Arg {
    fn from(value: QualifiedName) -> Self {
        Self::Name(value)
    }
}

impl From<&QualifiedName> for Arg {
    fn from(value: &QualifiedName) -> Self {
        Self::Name(value.clone())
    }
}

impl From<TypeRef> for Arg {
    fn from(value: TypeRef) -> Self {
        Self::Type(value)
    }
}

impl From<&TypeRef> for Arg {
    fn from(value: &TypeRef) -> Self {
        Self::Type(value.clone())
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
