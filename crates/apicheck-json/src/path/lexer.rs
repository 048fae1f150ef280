//! Path lexer converting expression text into navigation steps.

use std::fmt;

const ROOT_PREFIX: &str = "root.";
const ARROW: &str = "->";

/// A single navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    Property(String),
    Index(usize),
}

/// Reason a segment could not be lexed. Kept internal so callers only ever
/// see the expression as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LexError {
    EmptySegment { segment: usize },
    UnclosedIndex { segment: usize },
    InvalidIndex { segment: usize, raw: String },
    TrailingText { segment: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySegment { segment } => write!(f, "segment {segment} is empty"),
            Self::UnclosedIndex { segment } => {
                write!(f, "segment {segment} has an unclosed index")
            }
            Self::InvalidIndex { segment, raw } => {
                write!(f, "segment {segment} has invalid index '{raw}'")
            }
            Self::TrailingText { segment } => {
                write!(f, "segment {segment} has text after its indices")
            }
        }
    }
}

/// Normalise an expression: trim it, turn `->` separators into `.`, and drop
/// a leading `root.` prefix.
pub(crate) fn normalise(expression: &str) -> String {
    let normalised = expression.trim().replace(ARROW, ".");
    normalised
        .strip_prefix(ROOT_PREFIX)
        .map_or_else(|| normalised.clone(), str::to_owned)
}

pub(crate) fn lex_path(normalised: &str) -> Result<Vec<Step>, LexError> {
    let mut steps = Vec::new();
    if normalised.trim().is_empty() {
        return Ok(steps);
    }
    for (segment, text) in normalised.split('.').enumerate() {
        lex_segment(segment, text, &mut steps)?;
    }
    Ok(steps)
}

fn lex_segment(segment: usize, text: &str, steps: &mut Vec<Step>) -> Result<(), LexError> {
    let (name, mut indices) = text.find('[').map_or((text, ""), |at| text.split_at(at));
    if name.is_empty() && indices.is_empty() {
        return Err(LexError::EmptySegment { segment });
    }
    if !name.is_empty() {
        steps.push(Step::Property(name.to_owned()));
    }
    while !indices.is_empty() {
        let Some(open) = indices.strip_prefix('[') else {
            return Err(LexError::TrailingText { segment });
        };
        let Some((raw, rest)) = open.split_once(']') else {
            return Err(LexError::UnclosedIndex { segment });
        };
        steps.push(Step::Index(parse_index(segment, raw)?));
        indices = rest;
    }
    Ok(())
}

fn parse_index(segment: usize, raw: &str) -> Result<usize, LexError> {
    let invalid = || LexError::InvalidIndex {
        segment,
        raw: raw.to_owned(),
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lex_ok(expression: &str) -> Vec<Step> {
        match lex_path(&normalise(expression)) {
            Ok(steps) => steps,
            Err(err) => panic!("{expression:?} should lex: {err:?}"),
        }
    }

    fn lex_err(expression: &str) -> LexError {
        match lex_path(&normalise(expression)) {
            Ok(steps) => panic!("{expression:?} should fail, got {steps:?}"),
            Err(err) => err,
        }
    }

    #[rstest]
    #[case("", "")]
    #[case("   ", "")]
    #[case("root.", "")]
    #[case("root->", "")]
    #[case(" root->[0]->foo ", "[0].foo")]
    #[case("root.items", "items")]
    #[case("root", "root")]
    #[case("rooted.value", "rooted.value")]
    fn normalises_expressions(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalise(input), expected);
    }

    #[test]
    fn lexes_properties_and_indices() {
        assert_eq!(
            lex_ok("items[0][1].name"),
            vec![
                Step::Property("items".into()),
                Step::Index(0),
                Step::Index(1),
                Step::Property("name".into()),
            ]
        );
    }

    #[test]
    fn lexes_leading_index_segment() {
        assert_eq!(
            lex_ok("root.[0].foo"),
            vec![Step::Index(0), Step::Property("foo".into())]
        );
    }

    #[test]
    fn whole_document_has_no_steps() {
        assert!(lex_ok("root.").is_empty());
    }

    #[rstest]
    #[case("foo..bar", LexError::EmptySegment { segment: 1 })]
    #[case("foo.", LexError::EmptySegment { segment: 1 })]
    #[case("items[0", LexError::UnclosedIndex { segment: 0 })]
    #[case("items[-1]", LexError::InvalidIndex { segment: 0, raw: "-1".into() })]
    #[case("items[one]", LexError::InvalidIndex { segment: 0, raw: "one".into() })]
    #[case("items[]", LexError::InvalidIndex { segment: 0, raw: String::new() })]
    #[case("items[0]x", LexError::TrailingText { segment: 0 })]
    fn rejects_malformed_segments(#[case] expression: &str, #[case] expected: LexError) {
        assert_eq!(lex_err(expression), expected);
    }

    #[test]
    fn rejects_index_overflow() {
        let err = lex_err("items[99999999999999999999999]");
        assert!(matches!(err, LexError::InvalidIndex { .. }));
    }
}
