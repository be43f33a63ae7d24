//! Recursive descent over the logos token stream
//!
//! A [`Reader`] reads exactly one top-level form starting at a byte offset. It never fails:
//! malformed input comes back as an error form spanning the malformed region, and the reader
//! stops at the next token boundary so the caller can resume from [`Reader::consumed`].
//!
//! Recursion is bounded by [`MAX_NESTING`]: a form nested deeper is consumed iteratively and
//! comes back as a single error form.

use crate::quill::ast::{AtomKind, CollectionKind, Form, SourceLocation};
use crate::quill::lexing::{classify_atom, Token};
use crate::quill::reading::MAX_NESTING;
use logos::{Logos, SpannedIter};
use std::ops::Range;

type Lexeme = (Result<Token, ()>, Range<usize>);

pub(super) struct Reader<'s, 'l> {
    source: &'s str,
    base: usize,
    lexer: SpannedIter<'s, Token>,
    peeked: Option<Lexeme>,
    consumed: usize,
    depth: usize,
    locator: &'l SourceLocation<'s>,
}

impl<'s, 'l> Reader<'s, 'l> {
    pub(super) fn new(source: &'s str, offset: usize, locator: &'l SourceLocation<'s>) -> Self {
        Self {
            source,
            base: offset,
            lexer: Token::lexer(&source[offset..]).spanned(),
            peeked: None,
            consumed: offset,
            depth: 0,
            locator,
        }
    }

    /// Byte offset just past the last token this reader consumed
    pub(super) fn consumed(&self) -> usize {
        self.consumed
    }

    fn pull(&mut self) -> Option<Lexeme> {
        let (token, span) = self.lexer.next()?;
        Some((token, span.start + self.base..span.end + self.base))
    }

    fn peek(&mut self) -> Option<Lexeme> {
        if self.peeked.is_none() {
            self.peeked = self.pull();
        }
        self.peeked.clone()
    }

    fn advance(&mut self) -> Option<Lexeme> {
        let lexeme = match self.peeked.take() {
            Some(lexeme) => Some(lexeme),
            None => self.pull(),
        }?;
        self.consumed = lexeme.1.end;
        Some(lexeme)
    }

    fn next_is_closer_or_eof(&mut self) -> bool {
        match self.peek() {
            None => true,
            Some((Ok(token), _)) => token.closing_delimiter().is_some(),
            Some((Err(()), _)) => false,
        }
    }

    fn error(&self, message: impl Into<String>, span: Range<usize>) -> Form {
        Form::error(message, self.locator.byte_range_to_range(&span))
    }

    /// Read the next form.
    ///
    /// Returns `None` when nothing is left before a closing delimiter or the end of input,
    /// which only happens at EOF or after a `#_` discarded the last form.
    pub(super) fn read_form(&mut self) -> Option<Form> {
        self.depth += 1;
        let form = self.read_form_at_depth();
        self.depth -= 1;
        form
    }

    fn read_form_at_depth(&mut self) -> Option<Form> {
        loop {
            let (token, span) = self.advance()?;
            let token = match token {
                Ok(token) => token,
                Err(()) => {
                    let text = &self.source[span.clone()];
                    return Some(self.error(format!("Invalid token: {}", text), span));
                }
            };

            if self.depth > MAX_NESTING && (token.is_opening_delimiter() || token.takes_operand()) {
                return Some(self.skip_too_deep(token, span));
            }

            let form = match token {
                Token::OpenParen => self.read_collection(CollectionKind::List, span),
                Token::OpenBracket => self.read_collection(CollectionKind::Vector, span),
                Token::OpenBrace => self.read_collection(CollectionKind::Map, span),
                Token::OpenSet => self.read_collection(CollectionKind::Set, span),
                Token::OpenFn => self.read_collection(CollectionKind::Fn, span),
                Token::CloseParen | Token::CloseBracket | Token::CloseBrace => {
                    let text = &self.source[span.clone()];
                    self.error(format!("Unmatched delimiter: {}", text), span)
                }
                Token::Discard => {
                    let discarded = self.read_operand(token, span);
                    if discarded.is_error() {
                        return Some(discarded);
                    }
                    if self.next_is_closer_or_eof() {
                        return None;
                    }
                    continue;
                }
                Token::Meta => self.read_operand(token, span),
                token if token.is_prefix() => self.read_operand(token, span),
                Token::Dispatch => self.read_tagged(span),
                Token::String | Token::Regex | Token::Character => {
                    Form::atom(AtomKind::String, self.locator.byte_range_to_range(&span))
                }
                Token::UnterminatedString => self.error("EOF while reading string", span),
                Token::Atom => {
                    let kind = classify_atom(&self.source[span.clone()]);
                    Form::atom(kind, self.locator.byte_range_to_range(&span))
                }
                _ => self.error(format!("Unexpected token: {}", token), span),
            };
            return Some(form);
        }
    }

    /// Read the form a reader macro applies to. The prefix itself stays untagged.
    fn read_operand(&mut self, prefix: Token, span: Range<usize>) -> Form {
        if self.peek().is_none() {
            return self.error("EOF while reading", span);
        }
        if self.next_is_closer_or_eof() {
            return self.error(format!("Expected a form after {}", prefix), span);
        }
        match self.read_form() {
            Some(form) => form,
            None => self.error(format!("Expected a form after {}", prefix), span),
        }
    }

    /// Consume the rest of a form opened past the nesting limit, without recursing
    fn skip_too_deep(&mut self, first: Token, span: Range<usize>) -> Form {
        let mut open = 0usize;
        let mut current = Some(first);
        while let Some(token) = current {
            if token.is_opening_delimiter() {
                open += 1;
            } else if token.closing_delimiter().is_some() {
                open = open.saturating_sub(1);
            }
            if open == 0 && !token.takes_operand() {
                break;
            }
            current = match self.peek() {
                Some((Ok(next), _)) if open == 0 && next.closing_delimiter().is_some() => None,
                // invalid input counts as an atom
                Some((next, _)) => {
                    self.advance();
                    Some(next.unwrap_or(Token::Atom))
                }
                None => None,
            };
        }
        self.error("Nesting too deep", span.start..self.consumed)
    }

    /// `#tag` reads as one symbol when the tag follows the `#` directly
    fn read_tagged(&mut self, span: Range<usize>) -> Form {
        if let Some((Ok(Token::Atom), tag)) = self.peek() {
            let adjacent = tag.start == span.end;
            if adjacent && classify_atom(&self.source[tag.clone()]) == AtomKind::Symbol {
                self.advance();
                return Form::atom(
                    AtomKind::Symbol,
                    self.locator.byte_range_to_range(&(span.start..tag.end)),
                );
            }
        }
        self.error("Unknown dispatch character", span)
    }

    fn read_collection(&mut self, kind: CollectionKind, open: Range<usize>) -> Form {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                None => {
                    let start = self.locator.byte_to_position(open.start);
                    return self.error(
                        format!("EOF while reading, starting at line {}", start.line + 1),
                        open.start..self.consumed,
                    );
                }
                Some((Ok(token), close)) if token.closing_delimiter().is_some() => {
                    self.advance();
                    let span = open.start..close.end;
                    let found = &self.source[close];
                    if token.closing_delimiter() != Some(kind.close()) {
                        return self.error(
                            format!(
                                "Unmatched delimiter: {}, expected: {}",
                                found,
                                kind.close()
                            ),
                            span,
                        );
                    }
                    if kind == CollectionKind::Map && children.len() % 2 != 0 {
                        return self
                            .error("Map literal must contain an even number of forms", span);
                    }
                    return Form::collection(
                        kind,
                        children,
                        self.locator.byte_range_to_range(&span),
                    );
                }
                Some(_) => {
                    if let Some(child) = self.read_form() {
                        children.push(child);
                    }
                }
            }
        }
    }
}
