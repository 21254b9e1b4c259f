//! Placeholder templates.
//!
//! A template is literal text with `{{tag}}` or `{{tag:index}}` placeholders:
//!
//! | tag | writes | argument |
//! |-----|--------|----------|
//! | `$` | the plain string form | any |
//! | `E` | an escaped string or char literal | string, char, null |
//! | `N` | an identifier, names go through the resolver | name, string |
//! | `T` | a type, every contained name goes through the resolver | type, name |
//! | `B` | the binary (runtime) name | type, name |
//! | `>` | one indentation level more | none |
//! | `<` | one indentation level less | none |
//!
//! Arguments are consumed left to right. A `:index` pins a placeholder to one
//! argument without moving the cursor, so `{{$:0}} = {{$:0}}` repeats the
//! first argument. Single braces are plain text. Line breaks in the literal
//! text finalize the current line of the listing.

mod arg;

pub use arg::Arg;
use miette::SourceSpan;
use quill_core::{char_literal, string_literal};

use crate::{Listing, Result, TemplateError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Placeholder tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `$`
    Plain,
    /// `E`
    Escaped,
    /// `N`
    Name,
    /// `T`
    Type,
    /// `B`
    Binary,
    /// `>`
    Indent,
    /// `<`
    Dedent,
}

impl Tag {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "$" => Some(Self::Plain),
            "E" => Some(Self::Escaped),
            "N" => Some(Self::Name),
            "T" => Some(Self::Type),
            "B" => Some(Self::Binary),
            ">" => Some(Self::Indent),
            "<" => Some(Self::Dedent),
            _ => None,
        }
    }

    /// Whether the tag consumes an argument.
    pub fn consumes(&self) -> bool {
        !matches!(self, Self::Indent | Self::Dedent)
    }

    /// Human readable list of the accepted argument kinds.
    fn expected(&self) -> &'static str {
        match self {
            Self::Plain => "any argument",
            Self::Escaped => "a string, char or null argument",
            Self::Name => "a name or string argument",
            Self::Type | Self::Binary => "a type or name argument",
            Self::Indent | Self::Dedent => "no argument",
        }
    }

    fn accepts(&self, arg: &Arg) -> bool {
        match self {
            Self::Plain => true,
            Self::Escaped => matches!(arg, Arg::Str(_) | Arg::Char(_) | Arg::Null),
            Self::Name => matches!(arg, Arg::Name(_) | Arg::Str(_)),
            Self::Type | Self::Binary => matches!(arg, Arg::Type(_) | Arg::Name(_)),
            Self::Indent | Self::Dedent => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Byte range of literal text without line breaks.
    Text(usize, usize),
    Newline,
    Placeholder {
        tag: Tag,
        index: Option<usize>,
        start: usize,
        end: usize,
    },
}

/// A parsed template, ready to be written any number of times.
///
/// # Example
///
/// ```
/// use quill_codegen::{Arg, Listing, Template};
///
/// let template = Template::parse("{{$:0}} = {{$:0}}").unwrap();
/// let mut listing = Listing::default();
/// template.write(&mut listing, &[Arg::from("x")]).unwrap();
/// assert_eq!(listing.materialize(), "x = x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, rejecting unknown tags and malformed placeholders.
    pub fn parse(source: &str) -> Result<Self> {
        let mut template = Self {
            source: source.to_string(),
            segments: Vec::new(),
        };
        let mut pos = 0;
        while pos < source.len() {
            let rest = &source[pos..];
            let Some(open) = rest.find(OPEN) else {
                template.push_text(pos, source.len());
                break;
            };
            let start = pos + open;
            template.push_text(pos, start);

            let inner_start = start + OPEN.len();
            let Some(close) = source[inner_start..].find(CLOSE) else {
                return Err(template.malformed(start, source.len(), "unclosed placeholder"));
            };
            let end = inner_start + close + CLOSE.len();
            let inner = &source[inner_start..inner_start + close];
            let segment = template.placeholder(inner, start, end)?;
            template.segments.push(segment);
            pos = end;
        }
        Ok(template)
    }

    /// The template text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check that `args` satisfy every placeholder without writing anything.
    pub fn check(&self, args: &[Arg]) -> Result<()> {
        self.bind(args).map(|_| ())
    }

    /// Expand the template into `out`.
    ///
    /// All placeholders are bound before the first write, so an error leaves
    /// `out` untouched.
    pub fn write(&self, out: &mut Listing<'_>, args: &[Arg]) -> Result<()> {
        let bound = self.bind(args)?;
        let mut bound = bound.into_iter();
        for segment in &self.segments {
            match segment {
                Segment::Text(start, end) => {
                    out.append(&self.source[*start..*end]);
                }
                Segment::Newline => {
                    out.newline();
                }
                Segment::Placeholder { tag, .. } => match tag {
                    Tag::Indent => {
                        out.indent(1);
                    }
                    Tag::Dedent => {
                        out.indent(-1);
                    }
                    _ => {
                        if let Some(arg) = bound.next() {
                            write_arg(out, *tag, arg);
                        }
                    }
                },
            }
        }
        Ok(())
    }

    /// Resolve the argument of every consuming placeholder, in order.
    fn bind<'a>(&self, args: &'a [Arg]) -> Result<Vec<&'a Arg>> {
        let mut cursor = 0;
        let mut bound = Vec::new();
        for segment in &self.segments {
            let Segment::Placeholder {
                tag,
                index,
                start,
                end,
            } = segment
            else {
                continue;
            };
            if !tag.consumes() {
                continue;
            }
            let i = match index {
                Some(i) => *i,
                None => {
                    cursor += 1;
                    cursor - 1
                }
            };
            let Some(arg) = args.get(i) else {
                return Err(Box::new(TemplateError::IndexOutOfRange {
                    template: self.source.clone(),
                    span: self.span(*start, *end),
                    fragment: self.source[*start..*end].to_string(),
                    position: *start,
                    index: i,
                    count: args.len(),
                }));
            };
            if !tag.accepts(arg) {
                return Err(Box::new(TemplateError::ArgumentMismatch {
                    template: self.source.clone(),
                    span: self.span(*start, *end),
                    fragment: self.source[*start..*end].to_string(),
                    position: *start,
                    expected: tag.expected(),
                    kind: arg.kind(),
                }));
            }
            bound.push(arg);
        }
        Ok(bound)
    }

    fn push_text(&mut self, start: usize, end: usize) {
        let mut line_start = start;
        for (offset, _) in self.source[start..end].match_indices('\n') {
            let newline = start + offset;
            let text_end = if self.source[..newline].ends_with('\r') && newline > line_start {
                newline - 1
            } else {
                newline
            };
            if text_end > line_start {
                self.segments.push(Segment::Text(line_start, text_end));
            }
            self.segments.push(Segment::Newline);
            line_start = newline + 1;
        }
        if end > line_start {
            self.segments.push(Segment::Text(line_start, end));
        }
    }

    fn placeholder(&self, inner: &str, start: usize, end: usize) -> Result<Segment> {
        let (keyword, index) = match inner.split_once(':') {
            Some((keyword, index)) => (keyword, Some(index)),
            None => (inner, None),
        };
        if keyword.is_empty() {
            return Err(self.malformed(start, end, "missing tag"));
        }
        let Some(tag) = Tag::from_keyword(keyword) else {
            return Err(Box::new(TemplateError::UnknownTag {
                template: self.source.clone(),
                span: self.span(start, end),
                fragment: self.source[start..end].to_string(),
                position: start,
                tag: keyword.to_string(),
            }));
        };
        let index = match index {
            None => None,
            Some(_) if !tag.consumes() => {
                return Err(self.malformed(start, end, "indentation tags take no argument"));
            }
            Some(digits) => match digits.parse::<usize>() {
                Ok(i) if digits.bytes().all(|b| b.is_ascii_digit()) => Some(i),
                _ => return Err(self.malformed(start, end, "argument index is not a number")),
            },
        };
        Ok(Segment::Placeholder {
            tag,
            index,
            start,
            end,
        })
    }

    fn malformed(&self, start: usize, end: usize, reason: &str) -> Box<TemplateError> {
        Box::new(TemplateError::Malformed {
            template: self.source.clone(),
            span: self.span(start, end),
            fragment: self.source[start..end].to_string(),
            position: start,
            reason: reason.to_string(),
        })
    }

    fn span(&self, start: usize, end: usize) -> SourceSpan {
        (start, end - start).into()
    }
}

fn write_arg(out: &mut Listing<'_>, tag: Tag, arg: &Arg) {
    match (tag, arg) {
        (Tag::Escaped, Arg::Str(s)) => {
            out.append(&string_literal(s));
        }
        (Tag::Escaped, Arg::Char(c)) => {
            out.append(&char_literal(*c));
        }
        (Tag::Name | Tag::Type, Arg::Name(name)) => {
            out.name(name);
        }
        (Tag::Type, Arg::Type(ty)) => {
            out.type_ref(ty);
        }
        (Tag::Binary, Arg::Name(name)) => {
            out.append(&name.binary_name());
        }
        (Tag::Binary, Arg::Type(ty)) => {
            out.append(&ty.binary_name());
        }
        (_, arg) => {
            append_lines(out, &arg.plain());
        }
    }
}

/// Append `text`, turning each line break into a real line of the listing.
fn append_lines(out: &mut Listing<'_>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.newline();
        }
        out.append(line.strip_suffix('\r').unwrap_or(line));
    }
}
