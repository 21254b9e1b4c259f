//! Type references of the generated language.
//!
//! A [`TypeRef`] is the shape of a type as it appears at a use site. Names
//! inside it stay [`QualifiedName`]s so the renderer can abbreviate each of
//! them independently.

use std::fmt;

use serde::Serialize;

use crate::QualifiedName;

/// Primitive types, including `void` for return positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    /// The keyword of this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Parse a primitive keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "char" => Self::Char,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "void" => Self::Void,
            _ => return None,
        })
    }

    /// The single-letter JVM descriptor used inside array binary names.
    pub fn descriptor(&self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Byte => 'B',
            Self::Short => 'S',
            Self::Char => 'C',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
            Self::Void => 'V',
        }
    }
}

/// Bound of a wildcard type argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Bound {
    /// `? extends T`
    Extends(Box<TypeRef>),
    /// `? super T`
    Super(Box<TypeRef>),
}

/// A type reference at a use site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    /// A primitive type or `void`.
    Primitive(Primitive),
    /// A class or interface type, optionally parameterized.
    Class {
        name: QualifiedName,
        args: Vec<TypeRef>,
    },
    /// An array of the component type.
    Array(Box<TypeRef>),
    /// A type variable such as `T`.
    Variable(String),
    /// A wildcard type argument, `None` for the unbounded `?`.
    Wildcard(Option<Bound>),
}

impl TypeRef {
    /// A raw (unparameterized) class type.
    pub fn class(name: QualifiedName) -> Self {
        Self::Class {
            name,
            args: Vec::new(),
        }
    }

    /// A parameterized class type.
    pub fn generic(name: QualifiedName, args: Vec<TypeRef>) -> Self {
        Self::Class { name, args }
    }

    pub fn primitive(ty: Primitive) -> Self {
        Self::Primitive(ty)
    }

    /// An array of `component`.
    pub fn array(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    /// An array with `dims` dimensions; zero returns the component unchanged.
    pub fn array_of(component: TypeRef, dims: usize) -> Self {
        (0..dims).fold(component, |ty, _| Self::array(ty))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// The unbounded wildcard `?`.
    pub fn wildcard() -> Self {
        Self::Wildcard(None)
    }

    /// `? extends bound`
    pub fn extends(bound: TypeRef) -> Self {
        Self::Wildcard(Some(Bound::Extends(Box::new(bound))))
    }

    /// `? super bound`
    pub fn super_(bound: TypeRef) -> Self {
        Self::Wildcard(Some(Bound::Super(Box::new(bound))))
    }

    /// The class name if this is a class type.
    pub fn name(&self) -> Option<&QualifiedName> {
        match self {
            Self::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The runtime binary name of the erased type.
    ///
    /// ```
    /// use quill_core::{Primitive, QualifiedName, TypeRef};
    ///
    /// let strings = TypeRef::array(TypeRef::class(QualifiedName::parse("java.lang.String").unwrap()));
    /// assert_eq!(strings.binary_name(), "[Ljava.lang.String;");
    /// assert_eq!(TypeRef::array(TypeRef::primitive(Primitive::Int)).binary_name(), "[I");
    /// ```
    pub fn binary_name(&self) -> String {
        match self {
            Self::Primitive(p) => p.as_str().to_string(),
            Self::Class { name, .. } => name.binary_name(),
            Self::Array(component) => format!("[{}", component.descriptor()),
            Self::Variable(_) | Self::Wildcard(_) => OBJECT.to_string(),
        }
    }

    fn descriptor(&self) -> String {
        match self {
            Self::Primitive(p) => p.descriptor().to_string(),
            Self::Array(component) => format!("[{}", component.descriptor()),
            other => format!("L{};", other.binary_name()),
        }
    }
}

/// Binary name used for erased type variables and wildcards.
const OBJECT: &str = "java.lang.Object";

/// Canonical text of the type with every name fully qualified.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => f.write_str(p.as_str()),
            Self::Class { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(component) => write!(f, "{}[]", component),
            Self::Variable(name) => f.write_str(name),
            Self::Wildcard(None) => f.write_str("?"),
            Self::Wildcard(Some(Bound::Extends(bound))) => write!(f, "? extends {}", bound),
            Self::Wildcard(Some(Bound::Super(bound))) => write!(f, "? super {}", bound),
        }
    }
}

/// Mirrors an existing type into a [`TypeRef`].
///
/// Implemented by whatever describes already-known types (manifest type
/// specs, compiler mirrors, hand-written tables) so the renderer never has
/// to know where a type came from.
pub trait Reflect {
    /// The type reference this handle denotes.
    fn reflect(&self) -> TypeRef;

    /// The qualified name of the mirrored type, if it is a class type.
    fn qualified_name(&self) -> Option<QualifiedName> {
        self.reflect().name().cloned()
    }
}

impl Reflect for TypeRef {
    fn reflect(&self) -> TypeRef {
        self.clone()
    }
}

impl Reflect for QualifiedName {
    fn reflect(&self) -> TypeRef {
        TypeRef::class(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> QualifiedName {
        QualifiedName::parse(s).unwrap()
    }

    #[test]
    fn test_display_generic() {
        let ty = TypeRef::generic(
            name("java.util.Map"),
            vec![
                TypeRef::class(name("java.lang.String")),
                TypeRef::extends(TypeRef::class(name("java.lang.Number"))),
            ],
        );
        assert_eq!(
            ty.to_string(),
            "java.util.Map<java.lang.String, ? extends java.lang.Number>"
        );
    }

    #[test]
    fn test_array_of() {
        let ty = TypeRef::array_of(TypeRef::primitive(Primitive::Int), 2);
        assert_eq!(ty.to_string(), "int[][]");
        assert_eq!(ty.binary_name(), "[[I");
        assert_eq!(
            TypeRef::array_of(TypeRef::primitive(Primitive::Long), 0),
            TypeRef::primitive(Primitive::Long)
        );
    }

    #[test]
    fn test_binary_names() {
        assert_eq!(TypeRef::primitive(Primitive::Boolean).binary_name(), "boolean");
        assert_eq!(
            TypeRef::class(name("java.util.Map.Entry")).binary_name(),
            "java.util.Map$Entry"
        );
        assert_eq!(
            TypeRef::array(TypeRef::class(name("java.util.Map.Entry"))).binary_name(),
            "[Ljava.util.Map$Entry;"
        );
        assert_eq!(TypeRef::variable("T").binary_name(), "java.lang.Object");
    }

    #[test]
    fn test_primitive_keywords() {
        for p in [Primitive::Int, Primitive::Void, Primitive::Char] {
            assert_eq!(Primitive::from_keyword(p.as_str()), Some(p));
        }
        assert_eq!(Primitive::from_keyword("String"), None);
    }

    #[test]
    fn test_reflect_name() {
        let list = name("java.util.List");
        assert_eq!(list.qualified_name(), Some(list.clone()));
        assert_eq!(TypeRef::variable("T").qualified_name(), None);
    }
}
