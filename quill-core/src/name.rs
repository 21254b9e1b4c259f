//! Qualified names with a package/type split point.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::NameError;

/// An immutable dotted identifier path such as `java.util.Map.Entry`.
///
/// The `package_level` marks where the package prefix ends: for
/// `java.util.Map.Entry` it is `2`, splitting the path into the package
/// `java.util` and the relative path `Map.Entry`. A member reference
/// (static field or method) keeps its declaring type in the path and is
/// flagged with [`QualifiedName::is_member`].
///
/// Equality, ordering and hashing only look at the canonical string, so two
/// names built from different sources compare equal when they print the same.
///
/// # Example
///
/// ```
/// use quill_core::QualifiedName;
///
/// let entry = QualifiedName::new("java.util", ["Map", "Entry"]).unwrap();
/// assert_eq!(entry.canonical(), "java.util.Map.Entry");
/// assert_eq!(entry.package_name(), "java.util");
/// assert_eq!(entry.relative_path(), "Map.Entry");
/// assert_eq!(entry.last_segment(), "Entry");
/// assert_eq!(entry.top_level_segment(), Some("Map"));
/// ```
#[derive(Debug, Clone)]
pub struct QualifiedName {
    identifiers: Vec<String>,
    package_level: usize,
    member: bool,
    canonical: String,
    package_name: String,
    relative_path: String,
}

impl QualifiedName {
    /// Create a type name from a dotted package and one or more simple names.
    ///
    /// An empty `package` denotes the default (unnamed) package.
    pub fn new<I, S>(package: &str, names: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut identifiers = split_package(package);
        let package_level = identifiers.len();
        identifiers.extend(names.into_iter().map(Into::into));
        if identifiers.len() == package_level {
            return Err(NameError::Empty);
        }
        Self::from_parts(identifiers, package_level)
    }

    /// Create a name that denotes a package itself (e.g. for `import java.util.*;`).
    pub fn package(package: &str) -> Result<Self, NameError> {
        let identifiers = split_package(package);
        let level = identifiers.len();
        Self::from_parts(identifiers, level)
    }

    /// Create a static member reference (field or method) declared by `owner`.
    pub fn member(owner: &QualifiedName, member: &str) -> Result<Self, NameError> {
        if owner.is_package() || owner.is_member() {
            return Err(NameError::MemberOwner {
                owner: owner.canonical.clone(),
            });
        }
        let mut identifiers = owner.identifiers.clone();
        identifiers.push(member.to_string());
        let mut name = Self::from_parts(identifiers, owner.package_level)?;
        name.member = true;
        Ok(name)
    }

    /// Create a name from raw identifiers and an explicit split point.
    pub fn from_parts(identifiers: Vec<String>, package_level: usize) -> Result<Self, NameError> {
        if identifiers.is_empty() {
            return Err(NameError::Empty);
        }
        let canonical = identifiers.join(".");
        if package_level > identifiers.len() {
            return Err(NameError::PackageLevel {
                name: canonical,
                level: package_level,
                len: identifiers.len(),
            });
        }
        if let Some(segment) = identifiers.iter().find(|s| !is_identifier(s)) {
            return Err(NameError::InvalidIdentifier {
                name: canonical,
                segment: segment.clone(),
            });
        }
        let package_name = identifiers[..package_level].join(".");
        let relative_path = identifiers[package_level..].join(".");
        Ok(Self {
            identifiers,
            package_level,
            member: false,
            canonical,
            package_name,
            relative_path,
        })
    }

    /// Best-guess parse of a dotted name.
    ///
    /// Leading segments that start with a lowercase letter form the package;
    /// the last segment is always part of the type path. A `#` separates a
    /// static member from its declaring type: `java.util.Collections#emptyList`.
    pub fn parse(s: &str) -> Result<Self, NameError> {
        if let Some((owner, member)) = s.split_once('#') {
            let owner = Self::parse(owner)?;
            return Self::member(&owner, member);
        }
        let identifiers: Vec<String> = s.split('.').map(str::to_string).collect();
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        let package_level = identifiers
            .iter()
            .take(identifiers.len() - 1)
            .take_while(|s| s.chars().next().is_some_and(char::is_lowercase))
            .count();
        Self::from_parts(identifiers, package_level)
    }

    /// Create a nested type name, e.g. `Map` -> `Map.Entry`.
    pub fn nested(&self, name: &str) -> Result<Self, NameError> {
        if self.member {
            return Err(NameError::MemberOwner {
                owner: self.canonical.clone(),
            });
        }
        let mut identifiers = self.identifiers.clone();
        identifiers.push(name.to_string());
        Self::from_parts(identifiers, self.package_level)
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn package_level(&self) -> usize {
        self.package_level
    }

    /// All identifiers joined by dots.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The package prefix, empty for the default package.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The path below the package (`Map.Entry`, `Collections.emptyList`).
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn last_segment(&self) -> &str {
        // identifiers is never empty
        self.identifiers.last().map(String::as_str).unwrap_or_default()
    }

    /// The identifier right after the package, `None` for package names.
    pub fn top_level_segment(&self) -> Option<&str> {
        self.identifiers.get(self.package_level).map(String::as_str)
    }

    /// Whether this name denotes a package rather than a type or member.
    pub fn is_package(&self) -> bool {
        self.package_level == self.identifiers.len()
    }

    /// Whether this name is a static member reference.
    pub fn is_member(&self) -> bool {
        self.member
    }

    /// Whether this is a top-level type (not nested, not a member).
    pub fn is_top_level(&self) -> bool {
        !self.member && self.identifiers.len() == self.package_level + 1
    }

    /// Whether the name lives directly in `package`.
    pub fn in_package(&self, package: &str) -> bool {
        !self.is_package() && self.package_name == package
    }

    /// The declaring type of a member or nested type.
    pub fn enclosing(&self) -> Option<QualifiedName> {
        if self.is_package() || self.is_top_level() {
            return None;
        }
        let identifiers = self.identifiers[..self.identifiers.len() - 1].to_vec();
        Self::from_parts(identifiers, self.package_level).ok()
    }

    /// The outermost type of this name; a top-level type returns itself.
    pub fn top_level(&self) -> Option<QualifiedName> {
        if self.is_package() {
            return None;
        }
        if self.is_top_level() {
            return Some(self.clone());
        }
        let identifiers = self.identifiers[..=self.package_level].to_vec();
        Self::from_parts(identifiers, self.package_level).ok()
    }

    /// The runtime binary name: nested types are joined with `$`.
    ///
    /// ```
    /// use quill_core::QualifiedName;
    ///
    /// let entry = QualifiedName::parse("java.util.Map.Entry").unwrap();
    /// assert_eq!(entry.binary_name(), "java.util.Map$Entry");
    /// ```
    pub fn binary_name(&self) -> String {
        if self.is_package() {
            return self.canonical.clone();
        }
        let path = &self.identifiers[self.package_level..];
        let (types, member) = match (self.member, path.split_last()) {
            (true, Some((member, types))) => (types, Some(member)),
            _ => (path, None),
        };
        let mut binary = String::new();
        if !self.package_name.is_empty() {
            binary.push_str(&self.package_name);
            binary.push('.');
        }
        binary.push_str(&types.join("$"));
        if let Some(member) = member {
            binary.push('.');
            binary.push_str(member);
        }
        binary
    }
}

fn split_package(package: &str) -> Vec<String> {
    if package.is_empty() {
        Vec::new()
    } else {
        package.split('.').map(str::to_string).collect()
    }
}

/// Check whether `s` is a valid identifier of the generated language.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for QualifiedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for QualifiedName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// How much of a [`QualifiedName`] is printed at a reference site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbbreviationLevel {
    /// The canonical path: `java.util.Map.Entry`.
    Full,
    /// The package-relative path: `Map.Entry`.
    Relative,
    /// Only the last segment: `Entry`.
    Bare,
}

impl AbbreviationLevel {
    /// The text printed for `name` at this level.
    pub fn apply<'a>(&self, name: &'a QualifiedName) -> &'a str {
        match self {
            Self::Full => name.canonical(),
            Self::Relative => name.relative_path(),
            Self::Bare => name.last_segment(),
        }
    }
}

impl fmt::Display for AbbreviationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Relative => write!(f, "relative"),
            Self::Bare => write!(f, "bare"),
        }
    }
}
