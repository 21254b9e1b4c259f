//! The import section of a document.

use std::collections::BTreeSet;

use quill_core::QualifiedName;
use serde::Serialize;

use crate::{Emit, Listing, Result};

/// Four-way partition of import declarations.
///
/// Each set is ordered by canonical name so the emitted section is stable.
/// Wildcard type imports hold packages (`java.util.*`) or enclosing types
/// (`java.util.Map.*`); static imports hold member references; static
/// wildcards hold the types whose members are imported on demand.
///
/// # Example
///
/// ```
/// use quill_codegen::{ImportTable, Listing};
/// use quill_core::QualifiedName;
///
/// let mut imports = ImportTable::new();
/// imports.add_type(QualifiedName::parse("java.util.List").unwrap());
/// imports.add_static(QualifiedName::parse("java.util.Collections#emptyList").unwrap());
///
/// let mut listing = Listing::default();
/// listing.emit(&imports).unwrap();
/// assert_eq!(
///     listing.materialize(),
///     "import static java.util.Collections.emptyList;\nimport java.util.List;\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportTable {
    static_wildcards: BTreeSet<QualifiedName>,
    statics: BTreeSet<QualifiedName>,
    wildcards: BTreeSet<QualifiedName>,
    types: BTreeSet<QualifiedName>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-type import. Packages and members are rejected.
    pub fn add_type(&mut self, name: QualifiedName) -> bool {
        if name.is_package() || name.is_member() {
            return false;
        }
        self.types.insert(name)
    }

    /// Add a single-static import of a member reference.
    pub fn add_static(&mut self, member: QualifiedName) -> bool {
        if !member.is_member() {
            return false;
        }
        self.statics.insert(member)
    }

    /// Add an on-demand import of a package or of an enclosing type's nested types.
    pub fn add_wildcard(&mut self, scope: QualifiedName) -> bool {
        if scope.is_member() {
            return false;
        }
        self.wildcards.insert(scope)
    }

    /// Add an on-demand static import of a type's members.
    pub fn add_static_wildcard(&mut self, owner: QualifiedName) -> bool {
        if owner.is_package() || owner.is_member() {
            return false;
        }
        self.static_wildcards.insert(owner)
    }

    pub fn remove_type(&mut self, name: &QualifiedName) -> bool {
        self.types.remove(name)
    }

    pub fn remove_static(&mut self, member: &QualifiedName) -> bool {
        self.statics.remove(member)
    }

    pub fn contains_type(&self, name: &QualifiedName) -> bool {
        self.types.contains(name)
    }

    pub fn contains_static(&self, member: &QualifiedName) -> bool {
        self.statics.contains(member)
    }

    /// Whether a wildcard type import makes `name` visible by its simple name.
    pub fn covers_type(&self, name: &QualifiedName) -> bool {
        if name.is_package() || name.is_member() {
            return false;
        }
        match name.enclosing() {
            Some(owner) => self.wildcards.contains(&owner),
            None => self
                .wildcards
                .iter()
                .any(|w| w.is_package() && w.canonical() == name.package_name()),
        }
    }

    /// Whether a static wildcard import makes `member` visible by its simple name.
    pub fn covers_static(&self, member: &QualifiedName) -> bool {
        member.is_member()
            && member
                .enclosing()
                .is_some_and(|owner| self.static_wildcards.contains(&owner))
    }

    pub fn types(&self) -> impl Iterator<Item = &QualifiedName> {
        self.types.iter()
    }

    pub fn statics(&self) -> impl Iterator<Item = &QualifiedName> {
        self.statics.iter()
    }

    pub fn wildcards(&self) -> impl Iterator<Item = &QualifiedName> {
        self.wildcards.iter()
    }

    pub fn static_wildcards(&self) -> impl Iterator<Item = &QualifiedName> {
        self.static_wildcards.iter()
    }

    /// A copy holding only the wildcard sets.
    pub(crate) fn wildcards_only(&self) -> Self {
        Self {
            static_wildcards: self.static_wildcards.clone(),
            wildcards: self.wildcards.clone(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of import declarations.
    pub fn len(&self) -> usize {
        self.static_wildcards.len() + self.statics.len() + self.wildcards.len() + self.types.len()
    }
}

impl Emit for ImportTable {
    fn emit(&self, out: &mut Listing<'_>) -> Result<()> {
        for owner in &self.static_wildcards {
            out.append("import static ")
                .append(owner.canonical())
                .append(".*;")
                .newline();
        }
        for member in &self.statics {
            out.append("import static ")
                .append(member.canonical())
                .append(";")
                .newline();
        }
        for scope in &self.wildcards {
            out.append("import ")
                .append(scope.canonical())
                .append(".*;")
                .newline();
        }
        for name in &self.types {
            out.append("import ").append(name.canonical()).append(";").newline();
        }
        Ok(())
    }
}
