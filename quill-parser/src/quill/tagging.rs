//! Tag Extraction
//!
//!     Walks forms and emits a flat list of positioned [`Tag`]s: the instructions the renderer
//!     splices into each line. Extraction is a pure function of a form and an
//!     [`ExtractionContext`], so every node can be checked in isolation.
//!
//! Tags Per Form
//!
//!     Error:      ErrorMarker at the start, LevelMarker at the end
//!     Atom:       TokenBegin, TokenEnd, LevelMarker at the end
//!     Collection: TokenBegin, DelimiterOpen/DelimiterClose around the opening delimiter,
//!                 LevelMarker for the children, the children's tags,
//!                 DelimiterOpen/DelimiterClose around the closing delimiter,
//!                 TokenEnd, LevelMarker at the end
//!
//!     Every node ends with a LevelMarker carrying the level a following line would resume
//!     at. The indent calculator only looks at those.
//!
//! Levels
//!
//!     A [`Level`] has two parts. `depth` counts enclosing collections. `indent` is the
//!     hanging-indent column for continuation lines. It is derived from the context
//!     accumulators when entering a collection:
//!
//!         adjust = 2 for lists and `#(` literals, else the opening delimiter width
//!         column = the open delimiter's column, or when the collection starts on a later line
//!                  than its parent's delimiter, the larger of that column and the indent it
//!                  inherited
//!         indent = column + adjust
//!
//!     which aligns bodies under their opening delimiter instead of indenting flat.
//!
//! Ordering
//!
//!     Tags are emitted unordered across lines. [`sort_tags`] orders them by position. At one
//!     position, closing tags go first, then zero-width markers, then opening tags, each group
//!     keeping emission order. Spans that end where the next begins therefore close before
//!     the next one opens, which keeps the markup well nested.

use crate::quill::ast::{AtomKind, CollectionKind, Form, FormKind, Position};
use serde::Serialize;

/// Nesting level in effect at a point in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Level {
    pub depth: usize,
    pub indent: usize,
}

impl Level {
    pub fn new(depth: usize, indent: usize) -> Self {
        Self { depth, indent }
    }
}

/// Styling kind carried by a `TokenBegin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Atom(AtomKind),
    Collection(CollectionKind),
}

impl TokenKind {
    /// Class attribute used in markup
    pub fn class(&self) -> &'static str {
        match self {
            TokenKind::Atom(kind) => kind.as_str(),
            TokenKind::Collection(CollectionKind::List) => "collection list",
            TokenKind::Collection(CollectionKind::Vector) => "collection vector",
            TokenKind::Collection(CollectionKind::Map) => "collection map",
            TokenKind::Collection(CollectionKind::Set) => "collection set",
            TokenKind::Collection(CollectionKind::Fn) => "collection fn",
        }
    }
}

/// A positioned rendering instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tag {
    TokenBegin { at: Position, kind: TokenKind },
    TokenEnd { at: Position },
    DelimiterOpen { at: Position },
    DelimiterClose { at: Position },
    LevelMarker { at: Position, level: Level },
    IndentMarker { line: usize, level: Level },
    ErrorMarker { at: Position, message: String },
}

impl Tag {
    pub fn position(&self) -> Position {
        match self {
            Tag::TokenBegin { at, .. }
            | Tag::TokenEnd { at }
            | Tag::DelimiterOpen { at }
            | Tag::DelimiterClose { at }
            | Tag::LevelMarker { at, .. }
            | Tag::ErrorMarker { at, .. } => *at,
            Tag::IndentMarker { line, .. } => Position::new(*line, 0),
        }
    }

    pub fn line(&self) -> usize {
        self.position().line
    }

    /// Column of the anchor, `None` for line-wide markers
    pub fn column(&self) -> Option<usize> {
        match self {
            Tag::IndentMarker { .. } => None,
            tag => Some(tag.position().column),
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, Tag::TokenBegin { .. } | Tag::DelimiterOpen { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Tag::TokenEnd { .. } | Tag::DelimiterClose { .. })
    }

    /// Tie-break among tags sharing a position
    fn rank(&self) -> u8 {
        match self {
            Tag::IndentMarker { .. } => 0,
            Tag::TokenEnd { .. } | Tag::DelimiterClose { .. } => 1,
            Tag::LevelMarker { .. } | Tag::ErrorMarker { .. } => 2,
            Tag::TokenBegin { .. } | Tag::DelimiterOpen { .. } => 3,
        }
    }
}

/// Stable sort into document order
pub fn sort_tags(tags: &mut [Tag]) {
    tags.sort_by_key(|tag| (tag.position(), tag.rank()));
}

/// Accumulators handed from a collection to its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionContext {
    /// Number of enclosing collections
    pub depth: usize,
    /// Extra indentation past `column` for continuation lines
    pub adjust: usize,
    /// Alignment column of the enclosing opening delimiter
    pub column: usize,
    /// Line of the enclosing opening delimiter
    pub line: usize,
}

impl ExtractionContext {
    /// Context for top-level forms
    pub fn top_level() -> Self {
        Self::default()
    }

    /// Level of a form read in this context
    pub fn level(&self) -> Level {
        Level::new(self.depth, self.column + self.adjust)
    }

    /// Context for the children of a collection opened at `open`
    pub fn enter(&self, kind: CollectionKind, open: Position) -> Self {
        let column = open.column.max(self.column);
        let adjust = if kind.is_list_like() {
            2
        } else {
            kind.open_width()
        };
        Self {
            depth: self.depth + 1,
            adjust,
            column,
            line: open.line,
        }
    }
}

/// Tags for one form and everything nested in it
pub fn extract_tags(form: &Form, context: ExtractionContext) -> Vec<Tag> {
    let mut tags = Vec::new();
    extract_into(form, context, &mut tags);
    tags
}

/// Tags for a sequence of top-level forms
pub fn extract_document_tags(forms: &[Form]) -> Vec<Tag> {
    let mut tags = Vec::new();
    for form in forms {
        extract_into(form, ExtractionContext::top_level(), &mut tags);
    }
    tags
}

fn extract_into(form: &Form, context: ExtractionContext, tags: &mut Vec<Tag>) {
    let start = form.range.start;
    let end = form.range.end;

    match &form.kind {
        FormKind::Error { message } => {
            tags.push(Tag::ErrorMarker {
                at: start,
                message: message.clone(),
            });
        }
        FormKind::Atom(kind) => {
            tags.push(Tag::TokenBegin {
                at: start,
                kind: TokenKind::Atom(*kind),
            });
            tags.push(Tag::TokenEnd { at: end });
        }
        FormKind::Collection { kind, children } => {
            let inner = context.enter(*kind, start);
            let open_end = Position::new(start.line, start.column + kind.open_width());
            let close_start = Position::new(end.line, end.column.saturating_sub(1));

            tags.push(Tag::TokenBegin {
                at: start,
                kind: TokenKind::Collection(*kind),
            });
            tags.push(Tag::DelimiterOpen { at: start });
            tags.push(Tag::DelimiterClose { at: open_end });
            tags.push(Tag::LevelMarker {
                at: open_end,
                level: inner.level(),
            });

            for child in children {
                extract_into(child, inner, tags);
            }

            tags.push(Tag::DelimiterOpen { at: close_start });
            tags.push(Tag::DelimiterClose { at: end });
            tags.push(Tag::TokenEnd { at: end });
        }
    }

    tags.push(Tag::LevelMarker {
        at: end,
        level: context.level(),
    });
}
