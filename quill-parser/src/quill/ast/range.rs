//! Position and location tracking for source code locations
//!
//! ## Types
//!
//! - [`Position`] - A line:column position in source code
//! - [`Range`] - A source code range with start/end positions and byte span
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! ## Key Design
//!
//! - **Explicit positions**: every [`Form`](super::Form) carries its `Range` directly
//! - **0-based**: lines and columns both start at 0, the end position is exclusive
//! - **Character columns**: columns count `char`s, not bytes, so rendered markup lines up
//!   with what the user sees. Byte spans are kept alongside for slicing.
//! - **Efficient conversion**: O(log n) binary searches for the line and for the column, so
//!   converting every token of a long single line stays linear overall

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// Represents a position in source code (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Represents a location in source code (start and end positions)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Check if another range lies completely inside this one
    pub fn encloses(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::new(
            ByteRange { start: 0, end: 0 },
            Position::default(),
            Position::default(),
        )
    }
}

/// Provides fast conversion from byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    /// For every multi-byte character: the byte offset just past it, and the total number of
    /// continuation bytes up to and including it
    wide_chars: Vec<(usize, usize)>,
}

impl<'a> SourceLocation<'a> {
    /// Create a new SourceLocation from source code
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut wide_chars = Vec::new();
        let mut extra = 0;

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
            let width = ch.len_utf8();
            if width > 1 {
                extra += width - 1;
                wide_chars.push((byte_pos + width, extra));
            }
        }

        Self {
            source,
            line_starts,
            wide_chars,
        }
    }

    /// Continuation bytes before `byte_offset`
    fn extra_bytes_before(&self, byte_offset: usize) -> usize {
        let index = self
            .wide_chars
            .partition_point(|&(end, _)| end <= byte_offset);
        match index {
            0 => 0,
            i => self.wide_chars[i - 1].1,
        }
    }

    /// Convert a byte offset to a line/column position
    ///
    /// Offsets past the end of the source clamp to the end.
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let byte_offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let line_start = self.line_starts[line];
        let bytes = byte_offset - line_start;
        let column =
            bytes - (self.extra_bytes_before(byte_offset) - self.extra_bytes_before(line_start));

        Position::new(line, column)
    }

    /// Convert a byte range to a location
    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset for the start of a line
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }
}
