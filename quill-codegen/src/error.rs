use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Result type for rendering operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<TemplateError>>;

/// A template that cannot be expanded against its arguments.
///
/// Every variant carries the whole template as source code and labels the
/// offending placeholder, so a `miette::Report` points straight at it.
#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("unknown placeholder tag '{tag}' in '{fragment}' at offset {position}")]
    #[diagnostic(
        code(quill::template::unknown_tag),
        help("valid tags are $, E, N, T, B, > and <")
    )]
    UnknownTag {
        #[source_code]
        template: String,
        #[label("unknown tag")]
        span: SourceSpan,
        fragment: String,
        position: usize,
        tag: String,
    },

    #[error("'{fragment}' at offset {position} needs argument {index}, but only {count} were given")]
    #[diagnostic(code(quill::template::index_out_of_range))]
    IndexOutOfRange {
        #[source_code]
        template: String,
        #[label("no argument {index}")]
        span: SourceSpan,
        fragment: String,
        position: usize,
        index: usize,
        count: usize,
    },

    #[error("malformed placeholder '{fragment}' at offset {position}: {reason}")]
    #[diagnostic(code(quill::template::malformed))]
    Malformed {
        #[source_code]
        template: String,
        #[label("{reason}")]
        span: SourceSpan,
        fragment: String,
        position: usize,
        reason: String,
    },

    #[error("'{fragment}' at offset {position} expects {expected}, got a {kind} argument")]
    #[diagnostic(code(quill::template::argument_mismatch))]
    ArgumentMismatch {
        #[source_code]
        template: String,
        #[label("{kind} argument used here")]
        span: SourceSpan,
        fragment: String,
        position: usize,
        expected: &'static str,
        kind: &'static str,
    },
}

impl TemplateError {
    /// The placeholder text that caused the error.
    pub fn fragment(&self) -> &str {
        match self {
            Self::UnknownTag { fragment, .. }
            | Self::IndexOutOfRange { fragment, .. }
            | Self::Malformed { fragment, .. }
            | Self::ArgumentMismatch { fragment, .. } => fragment,
        }
    }

    /// Byte offset of the fragment within the template.
    pub fn position(&self) -> usize {
        match self {
            Self::UnknownTag { position, .. }
            | Self::IndexOutOfRange { position, .. }
            | Self::Malformed { position, .. }
            | Self::ArgumentMismatch { position, .. } => *position,
        }
    }
}
