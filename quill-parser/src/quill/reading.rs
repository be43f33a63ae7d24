//! Reader
//!
//!     Turns the raw buffer into top-level [`Form`]s. The entry point is [`read_forms`], which
//!     returns a lazy, finite and restartable sequence: each call to `next` reads exactly one
//!     top-level form, and the sequence can be cloned or restarted without re-reading anything
//!     already consumed by another copy.
//!
//! Error Recovery
//!
//!     A malformed form never stops the sequence. The reader emits one error form spanning the
//!     malformed region and carries on at the next token boundary:
//!
//!         - unterminated collection: spans from the opening delimiter to the last token
//!         - mismatched closing delimiter: spans the collection through the wrong closer
//!         - stray closing delimiter: spans the delimiter
//!         - unterminated string: spans to the end of input
//!         - odd number of forms in a map literal: spans the map
//!         - nesting past [`MAX_NESTING`]: spans the too-deep form, which is skipped unread
//!
//!     Errors nested inside collections stay in place as children, so a typo deep inside a form
//!     only degrades that one child.

mod reader;

use crate::quill::ast::{Form, ParseError, SourceLocation};
use reader::Reader;
use std::rc::Rc;

/// Deepest nesting of collections and reader macros read into a tree
pub const MAX_NESTING: usize = 512;

/// Lazy sequence of top-level forms over one source snapshot
#[derive(Debug, Clone)]
pub struct Forms<'a> {
    source: &'a str,
    locator: Rc<SourceLocation<'a>>,
    offset: usize,
}

impl<'a> Forms<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            locator: Rc::new(SourceLocation::new(source)),
            offset: 0,
        }
    }

    /// A fresh sequence over the same source, starting from the first form
    pub fn restart(&self) -> Self {
        Self {
            source: self.source,
            locator: Rc::clone(&self.locator),
            offset: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }
}

impl<'a> Iterator for Forms<'a> {
    type Item = Form;

    fn next(&mut self) -> Option<Form> {
        loop {
            if self.offset >= self.source.len() {
                return None;
            }
            let mut reader = Reader::new(self.source, self.offset, &self.locator);
            let form = reader.read_form();
            let consumed = reader.consumed();

            match form {
                Some(form) => {
                    self.offset = consumed;
                    return Some(form);
                }
                // Only whitespace and comments were left
                None if consumed <= self.offset => {
                    self.offset = self.source.len();
                    return None;
                }
                // A discarded form; keep reading after it
                None => self.offset = consumed,
            }
        }
    }
}

/// Read the top-level forms of `source` lazily
pub fn read_forms(source: &str) -> Forms<'_> {
    Forms::new(source)
}

/// Read every top-level form of `source`
pub fn read_all(source: &str) -> Vec<Form> {
    read_forms(source).collect()
}

/// Collect every error form, including ones nested inside collections, in source order
pub fn parse_errors(forms: &[Form]) -> Vec<ParseError> {
    let mut errors = Vec::new();
    for form in forms {
        form.walk(&mut |_, node| {
            if let Some(message) = node.error_message() {
                errors.push(ParseError::new(message, node.range.clone()));
            }
        });
    }
    errors
}
