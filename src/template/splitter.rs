use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// A `##` comment running to the end of its line. The newline stays.
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"##[^\n]*").unwrap());

/// The two interpolation markers, matched leftmost first.
static MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{|\}\}").unwrap());

/// One piece of a split string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output unchanged.
    Literal(String),
    /// The source of an expression whose value is interpolated.
    Expression(String),
}

/// Why the markers of a literal do not balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerImbalance {
    /// A `}}` appeared with no open `{{`, at this byte offset of the
    /// comment-stripped text.
    UnexpectedClose {
        /// Byte offset of the marker.
        offset: usize,
    },
    /// The text ended while this many `{{` were still open.
    Unclosed {
        /// The nesting depth at the end of the text.
        depth: usize,
    },
}

impl std::fmt::Display for MarkerImbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedClose { offset } => write!(f, "unexpected '}}}}' at offset {offset}"),
            Self::Unclosed { depth } => write!(f, "{depth} unclosed '{{{{'"),
        }
    }
}

/// Removes every `##` comment from a literal's text.
///
/// Returns the input unchanged, without allocating, when there is no
/// comment.
///
/// # Example
/// ```
/// use stencil::template::splitter::strip_comments;
///
/// assert_eq!(strip_comments("a ## note\nb"), "a \nb");
/// assert_eq!(strip_comments("plain"), "plain");
/// ```
#[must_use]
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    COMMENT.replace_all(text, "")
}

/// Splits a literal's text into alternating literal and expression segments.
///
/// Comments are stripped first. Markers are then tracked with a depth
/// counter: a segment ends at every transition from depth 0 to 1 and from
/// 1 to 0, while markers at deeper levels stay part of the expression text.
/// The result always starts and ends with a literal segment, so it has an
/// odd number of elements.
///
/// # Errors
/// A `}}` at depth 0, or open markers at the end of the text.
///
/// # Example
/// ```
/// use stencil::template::splitter::{Segment, split};
///
/// let segments = split("a{{f('{{x}}')}}b").unwrap();
///
/// assert_eq!(segments,
///            vec![Segment::Literal("a".to_string()),
///                 Segment::Expression("f('{{x}}')".to_string()),
///                 Segment::Literal("b".to_string())]);
///
/// assert!(split("a}}b").is_err());
/// ```
pub fn split(text: &str) -> Result<Vec<Segment>, MarkerImbalance> {
    let text = strip_comments(text);
    let mut segments = Vec::new();
    let mut depth = 0_usize;
    let mut segment_start = 0;

    for marker in MARKER.find_iter(&text) {
        if marker.as_str() == "{{" {
            if depth == 0 {
                segments.push(Segment::Literal(text[segment_start..marker.start()].to_string()));
                segment_start = marker.end();
            }
            depth += 1;
        } else {
            match depth {
                0 => return Err(MarkerImbalance::UnexpectedClose { offset: marker.start() }),
                1 => {
                    segments.push(Segment::Expression(text[segment_start..marker.start()].to_string()));
                    segment_start = marker.end();
                },
                _ => {},
            }
            depth -= 1;
        }
    }

    if depth > 0 {
        return Err(MarkerImbalance::Unclosed { depth });
    }

    segments.push(Segment::Literal(text[segment_start..].to_string()));
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(text: &str) -> Segment {
        Segment::Literal(text.to_string())
    }

    fn expr(text: &str) -> Segment {
        Segment::Expression(text.to_string())
    }

    #[test]
    fn text_without_markers_is_one_literal() {
        assert_eq!(split("hello world").unwrap(), vec![lit("hello world")]);
    }

    #[test]
    fn empty_text_is_one_empty_literal() {
        assert_eq!(split("").unwrap(), vec![lit("")]);
        assert_eq!(split("## only a comment").unwrap(), vec![lit("")]);
    }

    #[test]
    fn segments_alternate_and_start_with_literal() {
        let segments = split("{{a}} and {{b}}").unwrap();

        assert_eq!(segments, vec![lit(""), expr("a"), lit(" and "), expr("b"), lit("")]);
        assert_eq!(segments.len() % 2, 1);
    }

    #[test]
    fn nested_markers_stay_inside_expression() {
        let segments = split("x{{ g(\"{{ {{y}} }}\") }}z").unwrap();

        assert_eq!(segments, vec![lit("x"), expr(" g(\"{{ {{y}} }}\") "), lit("z")]);
    }

    #[test]
    fn comments_are_stripped_but_newline_kept() {
        let segments = split("a{{x}} ## {{ignored\nb").unwrap();

        assert_eq!(segments, vec![lit("a"), expr("x"), lit(" \nb")]);
    }

    #[test]
    fn comment_inside_expression_is_stripped() {
        let segments = split("{{x ## note\n}}").unwrap();

        assert_eq!(segments, vec![lit(""), expr("x \n"), lit("")]);
    }

    #[test]
    fn unbalanced_markers_are_rejected() {
        assert_eq!(split("a{{b"), Err(MarkerImbalance::Unclosed { depth: 1 }));
        assert_eq!(split("a}}b"), Err(MarkerImbalance::UnexpectedClose { offset: 1 }));
        assert_eq!(split("{{{{x}}"), Err(MarkerImbalance::Unclosed { depth: 1 }));
    }

    #[test]
    fn single_braces_are_plain_text() {
        assert_eq!(split("{a} }").unwrap(), vec![lit("{a} }")]);
    }

    #[test]
    fn triple_braces_match_leftmost_pairs() {
        // "{{{" is "{{" followed by "{"; "}}}" is "}}" followed by "}"
        let segments = split("{{{x}}}").unwrap();

        assert_eq!(segments, vec![lit(""), expr("{x"), lit("}")]);
    }
}
