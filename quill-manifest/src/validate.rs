//! Validation context for listing manifests.

use miette::SourceSpan;
use quill_core::is_identifier;

use crate::{Error, Result};

/// Source information carried through recursive validation.
///
/// The path records where in the body tree validation currently is, e.g.
/// `body[0].body[2]`, so errors can name the offending item.
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    src: &'a str,
    filename: &'a str,
    path: Vec<String>,
}

impl<'a> ParseContext<'a> {
    pub fn new(src: &'a str, filename: &'a str) -> Self {
        Self {
            src,
            filename,
            path: Vec::new(),
        }
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Self {
            src: self.src,
            filename: self.filename,
            path,
        }
    }

    /// The current path, dot-separated.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Find the span of a value in the source.
    pub fn find_span(&self, needle: &str) -> Option<SourceSpan> {
        find_value_span(self.src, needle)
    }

    /// A validation error labelled at the first occurrence of `needle`.
    pub fn error_at(&self, message: impl Into<String>, needle: &str) -> Box<Error> {
        Error::validation(message, self.src, self.filename, self.find_span(needle))
    }

    /// A validation error without a label.
    pub fn error(&self, message: impl Into<String>) -> Box<Error> {
        Error::validation(message, self.src, self.filename, None)
    }

    /// Validate a simple type name.
    pub fn validate_identifier(&self, name: &str, kind: &str) -> Result<()> {
        if is_identifier(name) {
            Ok(())
        } else {
            Err(self.error_at(format!("invalid {kind} name '{name}'"), name))
        }
    }

    /// Validate a dotted package name; the empty string is the default package.
    pub fn validate_package(&self, package: &str) -> Result<()> {
        if package.is_empty() || package.split('.').all(is_identifier) {
            Ok(())
        } else {
            Err(self.error_at(format!("invalid package name '{package}'"), package))
        }
    }
}

/// Find the span of a TOML string value, preferring its quoted form.
pub(crate) fn find_value_span(src: &str, needle: &str) -> Option<SourceSpan> {
    if needle.is_empty() {
        return None;
    }
    let quoted = format!("\"{needle}\"");
    if let Some(pos) = src.find(&quoted) {
        // +1 to skip the opening quote
        return Some(SourceSpan::from((pos + 1, needle.len())));
    }
    src.find(needle)
        .map(|pos| SourceSpan::from((pos, needle.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_value_span_prefers_quoted() {
        let src = "primary = \"Greeter\"\nheader = \"Greeter\"";
        let span = find_value_span(src, "Greeter").unwrap();
        assert_eq!(span.offset(), 11);
        assert_eq!(span.len(), 7);
    }

    #[test]
    fn test_find_value_span_missing() {
        assert!(find_value_span("a = 1", "b").is_none());
        assert!(find_value_span("a = 1", "").is_none());
    }

    #[test]
    fn test_validate_package() {
        let ctx = ParseContext::new("", "listing.toml");
        assert!(ctx.validate_package("").is_ok());
        assert!(ctx.validate_package("com.example").is_ok());
        assert!(ctx.validate_package("com..example").is_err());
        assert!(ctx.validate_package("com.1up").is_err());
    }

    #[test]
    fn test_path_string() {
        let ctx = ParseContext::new("", "listing.toml");
        assert_eq!(ctx.push("body[0]").push("body[2]").path_string(), "body[0].body[2]");
    }
}
