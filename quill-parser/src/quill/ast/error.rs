//! Error types for reading, rendering and markup handling

use crate::quill::ast::range::Range;
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;

#[cfg(test)]
use crate::quill::ast::range::Position;

/// A malformed region found by the reader
///
/// Structural problems (mismatched or missing delimiters) are reported through the same type.
/// These never abort a render: each one is also present in the form stream as an error form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub range: Range,
}

impl ParseError {
    pub fn new(message: impl Into<String>, range: Range) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.range.start)
    }
}

impl std::error::Error for ParseError {}

/// Errors raised by the renderer when its caller breaks the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Tags and line index disagree (a programming error in the calling layer)
    HostContractViolation {
        line: usize,
        column: Option<usize>,
        reason: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::HostContractViolation {
                line,
                column: Some(column),
                reason,
            } => write!(f, "Host contract violation at {}:{}: {}", line, column, reason),
            RenderError::HostContractViolation {
                line,
                column: None,
                reason,
            } => write!(f, "Host contract violation on line {}: {}", line, reason),
        }
    }
}

impl std::error::Error for RenderError {}

/// Errors reading rendered markup back into a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    UnclosedElement { offset: usize },
    UnexpectedClose { offset: usize },
    MalformedTag { offset: usize },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::UnclosedElement { offset } => {
                write!(f, "Element opened at byte {} is never closed", offset)
            }
            MarkupError::UnexpectedClose { offset } => {
                write!(f, "Closing tag at byte {} has no open element", offset)
            }
            MarkupError::MalformedTag { offset } => {
                write!(f, "Malformed tag at byte {}", offset)
            }
        }
    }
}

impl std::error::Error for MarkupError {}

/// Format source code context around an error location
///
/// Shows up to 2 lines on either side of the error line, which is marked with `>>` and
/// underlined with carets from the error column to the end of the range (or of the line, when
/// the range continues past it). Lines are numbered from 1.
pub fn format_source_context(source: &str, range: &Range) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let error_line = range.start.line;
    if error_line >= lines.len() {
        return String::new();
    }

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        let _ = writeln!(context, "{} {:3} | {}", marker, line_num + 1, line);
        if line_num == error_line {
            let _ = writeln!(context, "{:>6} | {}", "", underline(line, range));
        }
    }

    context
}

fn underline(line: &str, range: &Range) -> String {
    let width = line.chars().count();
    let start = range.start.column.min(width);
    let end = if range.end.line == range.start.line {
        range.end.column.min(width)
    } else {
        width
    };

    // keep tabs so the carets line up in a terminal
    let mut underline: String = line
        .chars()
        .take(start)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    underline.push_str(&"^".repeat(end.saturating_sub(start).max(1)));
    underline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_source_context() {
        let source = "(a)\n(b)\n(c)\n(d\n(e)\n(f)\n(g)";
        let range = Range::new(12..22, Position::new(3, 0), Position::new(6, 3));

        let context = format_source_context(source, &range);

        assert_eq!(
            context,
            concat!(
                "     2 | (b)\n",
                "     3 | (c)\n",
                ">>   4 | (d\n",
                "       | ^^\n",
                "     5 | (e)\n",
                "     6 | (f)\n",
            )
        );
    }

    #[test]
    fn test_source_context_underlines_the_range() {
        let source = "(foo\n\t[1 2) bar)";
        let range = Range::new(6..11, Position::new(1, 1), Position::new(1, 6));

        let context = format_source_context(source, &range);
        assert_eq!(
            context,
            concat!(
                "     1 | (foo\n",
                ">>   2 | \t[1 2) bar)\n",
                "       | \t^^^^^\n",
            )
        );
    }

    #[test]
    fn test_source_context_for_zero_width_and_missing_lines() {
        let range = Range::new(3..3, Position::new(0, 3), Position::new(0, 3));
        assert!(format_source_context("(a ", &range).ends_with("       |    ^\n"));

        let past_end = Range::new(0..0, Position::new(9, 0), Position::new(9, 0));
        assert_eq!(format_source_context("(a)", &past_end), "");
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new(
            "EOF while reading",
            Range::new(0..4, Position::new(0, 0), Position::new(0, 4)),
        );
        assert_eq!(error.to_string(), "EOF while reading at 0:0");
    }

    #[test]
    fn test_render_error_display() {
        let error = RenderError::HostContractViolation {
            line: 3,
            column: None,
            reason: "tag outside the line index".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Host contract violation on line 3: tag outside the line index"
        );
    }
}
