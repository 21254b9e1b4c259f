//! String and character literal escaping.

/// Quote `s` as a string literal, escaping as needed.
///
/// ```
/// use quill_core::string_literal;
///
/// assert_eq!(string_literal("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\'' => out.push('\''),
            c => escape_common(c, &mut out),
        }
    }
    out.push('"');
    out
}

/// Quote `c` as a character literal.
pub fn char_literal(c: char) -> String {
    let mut out = String::with_capacity(4);
    out.push('\'');
    match c {
        '\'' => out.push_str("\\'"),
        '"' => out.push('"'),
        c => escape_common(c, &mut out),
    }
    out.push('\'');
    out
}

fn escape_common(c: char, out: &mut String) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\u{8}' => out.push_str("\\b"),
        '\u{c}' => out.push_str("\\f"),
        c if c.is_control() => {
            out.push_str(&format!("\\u{:04x}", c as u32));
        }
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_plain() {
        assert_eq!(string_literal("hello"), "\"hello\"");
        assert_eq!(string_literal(""), "\"\"");
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("a\\b"), r#""a\\b""#);
        assert_eq!(string_literal("tab\there"), r#""tab\there""#);
        assert_eq!(string_literal("it's"), r#""it's""#);
        assert_eq!(string_literal("\u{0}"), r#""\u0000""#);
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(char_literal('x'), "'x'");
        assert_eq!(char_literal('\''), r"'\''");
        assert_eq!(char_literal('"'), "'\"'");
        assert_eq!(char_literal('\n'), r"'\n'");
    }
}
