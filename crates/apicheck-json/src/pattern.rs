//! Delimited regular expressions as written in step text.
//!
//! Steps carry patterns such as `/^ab+$/i` or `#\d+#`: a delimiter, the
//! expression body, the closing delimiter, then optional flag letters.
//! Text without that shape is compiled as-is.

use regex::Regex;

use crate::errors::JsonError;

/// Compile a step pattern into a [`Regex`].
///
/// The delimiter is the first character when it is neither alphanumeric,
/// whitespace, nor a backslash. Bracket delimiters close with their pair.
/// The flags `i`, `m`, `s` and `x` map onto inline flags; `u` is accepted
/// and ignored because matching is always Unicode-aware.
///
/// # Errors
/// Returns [`JsonError::InvalidPattern`] when a flag is unknown or the body
/// is not a valid expression.
///
/// # Examples
/// ```
/// use apicheck_json::compile_pattern;
///
/// let regex = compile_pattern("/^hello WORLD$/i").unwrap();
/// assert!(regex.is_match("Hello world"));
/// assert!(compile_pattern("{^\\d+$}").unwrap().is_match("42"));
/// assert!(compile_pattern("^plain").unwrap().is_match("plain text"));
/// assert!(compile_pattern("/abc/q").is_err());
/// ```
pub fn compile_pattern(pattern: &str) -> Result<Regex, JsonError> {
    let source = match split_delimited(pattern) {
        Some((body, flags)) => with_inline_flags(pattern, body, flags)?,
        None => pattern.to_owned(),
    };
    Regex::new(&source).map_err(|err| {
        log::debug!("pattern {pattern:?} rejected: {err}");
        JsonError::invalid_pattern(pattern, err)
    })
}

fn closing_delimiter(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        c if c.is_alphanumeric() || c.is_whitespace() || c == '\\' => None,
        c => Some(c),
    }
}

/// Split `pattern` into its body and trailing flags when it is delimited.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let open = pattern.chars().next()?;
    let close = closing_delimiter(open)?;
    let rest = pattern.get(open.len_utf8()..)?;
    let end = rest.rfind(close)?;
    let body = rest.get(..end)?;
    let flags = rest.get(end + close.len_utf8()..)?;
    flags
        .chars()
        .all(|flag| flag.is_ascii_alphabetic())
        .then_some((body, flags))
}

fn with_inline_flags(pattern: &str, body: &str, flags: &str) -> Result<String, JsonError> {
    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            'u' => {}
            other => {
                return Err(JsonError::invalid_pattern(
                    pattern,
                    format!("unknown flag '{other}'"),
                ));
            }
        }
    }
    if inline.is_empty() {
        Ok(body.to_owned())
    } else {
        Ok(format!("(?{inline}){body}"))
    }
}
