use thiserror::Error;

/// Reasons a [`QualifiedName`](crate::QualifiedName) can't be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("a qualified name needs at least one identifier")]
    Empty,

    #[error("package level {level} is out of range for '{name}' ({len} identifiers)")]
    PackageLevel {
        name: String,
        level: usize,
        len: usize,
    },

    #[error("'{segment}' is not a valid identifier in '{name}'")]
    InvalidIdentifier { name: String, segment: String },

    #[error("'{owner}' can't declare members or nested types")]
    MemberOwner { owner: String },
}
