//! Line index over a source snapshot
//!
//! Lines are split on `\n` only; a `\r` before it stays part of the line text; terminator
//! normalization belongs to the host. The empty document has no lines at all, and a trailing
//! newline opens one final empty line.

/// The raw lines of one snapshot, borrowed from the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let lines = if source.is_empty() {
            Vec::new()
        } else {
            source.split('\n').collect()
        };
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line: usize) -> Option<&'a str> {
        self.lines.get(line).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().copied()
    }

    /// Leading spaces and tabs of a line
    pub fn leading_whitespace(&self, line: usize) -> &'a str {
        self.get(line).map(leading_whitespace).unwrap_or("")
    }
}

/// Leading spaces and tabs of `text`
pub fn leading_whitespace(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counts() {
        assert_eq!(LineIndex::new("").len(), 0);
        assert_eq!(LineIndex::new("a").len(), 1);
        assert_eq!(LineIndex::new("a\n").len(), 2);
        assert_eq!(LineIndex::new("a\r\nb").get(0), Some("a\r"));
    }

    #[test]
    fn test_leading_whitespace() {
        let index = LineIndex::new("(a\n \t (b))\n   ");
        assert_eq!(index.leading_whitespace(0), "");
        assert_eq!(index.leading_whitespace(1), " \t ");
        assert_eq!(index.leading_whitespace(2), "   ");
        assert_eq!(index.leading_whitespace(7), "");
    }
}
