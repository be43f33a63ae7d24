//! Lexer
//!
//!     Tokenization of the buffer with a vanilla logos lexer. Whitespace, commas and `;` line
//!     comments are skipped, everything else becomes a token carrying the byte range of its
//!     source text. Those ranges are the only position information the reader gets, and they
//!     have to be preserved exactly: the renderer relies on them to line markup up with text.
//!
//!     Bare tokens (symbols, numbers, keywords, `nil`, booleans) share a single `Atom` token.
//!     They are told apart from their text by [`classify_atom`], which keeps the logos
//!     definitions free of overlapping patterns.
//!
//!     Lexing never fails as a whole. Input logos cannot match comes back as `Err(())` for that
//!     slice only, and the reader turns it into an error form.

use crate::quill::ast::AtomKind;
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n,]|;[^\n]*)+")]
pub enum Token {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("#{")]
    OpenSet,
    #[token("#(")]
    OpenFn,

    // Reader macros
    #[token("#_")]
    Discard,
    #[token("#'")]
    VarQuote,
    #[token("#")]
    Dispatch,
    #[token("'")]
    Quote,
    #[token("`")]
    SyntaxQuote,
    #[token("~")]
    Unquote,
    #[token("~@")]
    UnquoteSplicing,
    #[token("@")]
    Deref,
    #[token("^")]
    Meta,

    // Literals
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    // Runs to EOF without a closing quote; the terminated form always wins when both match
    #[regex(r#""([^"\\]|\\.)*"#, priority = 0)]
    UnterminatedString,
    #[regex(r#"#"([^"\\]|\\.)*""#)]
    Regex,
    #[regex(r"\\.[a-zA-Z0-9]*")]
    Character,

    #[regex(r#"[^ \t\r\n,()\[\]{}"'`~^@;\\#][^ \t\r\n,()\[\]{}"`~^@;\\]*"#)]
    Atom,
}

impl Token {
    /// Closing delimiter character, if this token is one
    pub fn closing_delimiter(&self) -> Option<char> {
        match self {
            Token::CloseParen => Some(')'),
            Token::CloseBracket => Some(']'),
            Token::CloseBrace => Some('}'),
            _ => None,
        }
    }

    pub fn is_opening_delimiter(&self) -> bool {
        matches!(
            self,
            Token::OpenParen
                | Token::OpenBracket
                | Token::OpenBrace
                | Token::OpenSet
                | Token::OpenFn
        )
    }

    /// Tokens that are not a form on their own and consume the next one
    pub fn takes_operand(&self) -> bool {
        self.is_prefix() || matches!(self, Token::Meta | Token::Discard)
    }

    /// Reader macros that wrap the form following them
    pub fn is_prefix(&self) -> bool {
        matches!(
            self,
            Token::Quote
                | Token::SyntaxQuote
                | Token::Unquote
                | Token::UnquoteSplicing
                | Token::Deref
                | Token::VarQuote
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenSet => "#{",
            Token::OpenFn => "#(",
            Token::Discard => "#_",
            Token::VarQuote => "#'",
            Token::Dispatch => "#",
            Token::Quote => "'",
            Token::SyntaxQuote => "`",
            Token::Unquote => "~",
            Token::UnquoteSplicing => "~@",
            Token::Deref => "@",
            Token::Meta => "^",
            Token::String => "<string>",
            Token::UnterminatedString => "<unterminated-string>",
            Token::Regex => "<regex>",
            Token::Character => "<character>",
            Token::Atom => "<atom>",
        };
        write!(f, "{}", s)
    }
}

/// Tokenize a whole source, keeping byte ranges
pub fn tokenize(source: &str) -> Vec<(Result<Token, ()>, Range<usize>)> {
    Token::lexer(source).spanned().collect()
}

/// Decide which kind of atom a bare token is from its text
pub fn classify_atom(text: &str) -> AtomKind {
    match text {
        "nil" => return AtomKind::Nil,
        "true" | "false" => return AtomKind::Boolean,
        _ => {}
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(':') => AtomKind::Keyword,
        Some(c) if c.is_ascii_digit() => AtomKind::Number,
        Some('+') | Some('-') if chars.next().is_some_and(|c| c.is_ascii_digit()) => {
            AtomKind::Number
        }
        _ => AtomKind::Symbol,
    }
}
