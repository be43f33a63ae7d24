//! Forms
//!
//!     A form is one syntactic unit read from the buffer: an atom, a collection or a reader
//!     error. Every form carries its own [`Range`], so position information never has to be
//!     recovered from anywhere else. Collections own their children in source order.
//!
//!     Errors are forms too. A malformed region is read as one `FormKind::Error` spanning that
//!     region, which lets it flow through tagging and rendering like any other form.

use super::range::Range;
use serde::Serialize;
use std::fmt;

/// Kinds of non-collection tokens, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AtomKind {
    Symbol,
    Number,
    String,
    Keyword,
    Nil,
    Boolean,
}

impl AtomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtomKind::Symbol => "symbol",
            AtomKind::Number => "number",
            AtomKind::String => "string",
            AtomKind::Keyword => "keyword",
            AtomKind::Nil => "nil",
            AtomKind::Boolean => "boolean",
        }
    }
}

/// Collection flavours, distinguished by their delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKind {
    /// `( )`
    List,
    /// `[ ]`
    Vector,
    /// `{ }`
    Map,
    /// `#{ }`
    Set,
    /// `#( )`, an anonymous function literal
    Fn,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::List => "list",
            CollectionKind::Vector => "vector",
            CollectionKind::Map => "map",
            CollectionKind::Set => "set",
            CollectionKind::Fn => "fn",
        }
    }

    pub fn open(&self) -> &'static str {
        match self {
            CollectionKind::List => "(",
            CollectionKind::Vector => "[",
            CollectionKind::Map => "{",
            CollectionKind::Set => "#{",
            CollectionKind::Fn => "#(",
        }
    }

    pub fn close(&self) -> char {
        match self {
            CollectionKind::List | CollectionKind::Fn => ')',
            CollectionKind::Vector => ']',
            CollectionKind::Map | CollectionKind::Set => '}',
        }
    }

    /// Width in characters of the opening delimiter
    pub fn open_width(&self) -> usize {
        self.open().chars().count()
    }

    /// Lists (and `#(` function literals) indent their bodies like calls
    pub fn is_list_like(&self) -> bool {
        matches!(self, CollectionKind::List | CollectionKind::Fn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Atom(AtomKind),
    Collection {
        kind: CollectionKind,
        children: Vec<Form>,
    },
    Error {
        message: String,
    },
}

/// One parsed syntactic unit and where it sits in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub range: Range,
    pub kind: FormKind,
}

impl Form {
    pub fn atom(kind: AtomKind, range: Range) -> Self {
        Self {
            range,
            kind: FormKind::Atom(kind),
        }
    }

    pub fn collection(kind: CollectionKind, children: Vec<Form>, range: Range) -> Self {
        Self {
            range,
            kind: FormKind::Collection { kind, children },
        }
    }

    pub fn error(message: impl Into<String>, range: Range) -> Self {
        Self {
            range,
            kind: FormKind::Error {
                message: message.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, FormKind::Error { .. })
    }

    pub fn children(&self) -> &[Form] {
        match &self.kind {
            FormKind::Collection { children, .. } => children,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.kind {
            FormKind::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Short type name used by tree views and assertion messages
    pub fn node_type(&self) -> &'static str {
        match &self.kind {
            FormKind::Atom(kind) => kind.as_str(),
            FormKind::Collection { kind, .. } => kind.as_str(),
            FormKind::Error { .. } => "error",
        }
    }

    /// Source text covered by this form
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.range.span.clone()]
    }

    /// Resolve a structural path of child indices below this form
    pub fn at_path(&self, path: &FormPath) -> Option<&Form> {
        path.indices()
            .iter()
            .try_fold(self, |form, &index| form.children().get(index))
    }

    /// Depth-first walk over this form and all descendants, paired with their paths
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&FormPath, &Form),
    {
        fn go<F>(form: &Form, path: &mut Vec<usize>, visit: &mut F)
        where
            F: FnMut(&FormPath, &Form),
        {
            visit(&FormPath(path.clone()), form);
            for (index, child) in form.children().iter().enumerate() {
                path.push(index);
                go(child, path, visit);
                path.pop();
            }
        }
        go(self, &mut Vec::new(), visit);
    }
}

/// Path of child indices identifying a form inside a top-level form
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FormPath(pub Vec<usize>);

impl FormPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::ast::range::Position;

    fn range(start: usize, end: usize) -> Range {
        Range::new(start..end, Position::new(0, start), Position::new(0, end))
    }

    fn sample() -> Form {
        // (a [b])
        Form::collection(
            CollectionKind::List,
            vec![
                Form::atom(AtomKind::Symbol, range(1, 2)),
                Form::collection(
                    CollectionKind::Vector,
                    vec![Form::atom(AtomKind::Symbol, range(4, 5))],
                    range(3, 6),
                ),
            ],
            range(0, 7),
        )
    }

    #[test]
    fn test_at_path() {
        let form = sample();
        assert_eq!(form.at_path(&FormPath::root()), Some(&form));
        assert_eq!(
            form.at_path(&FormPath(vec![1, 0])).map(|f| f.range.span.clone()),
            Some(4..5)
        );
        assert!(form.at_path(&FormPath(vec![0, 0])).is_none());
        assert!(form.at_path(&FormPath(vec![2])).is_none());
    }

    #[test]
    fn test_walk_visits_in_source_order() {
        let mut seen = Vec::new();
        sample().walk(&mut |path, form| seen.push(format!("{} {}", path, form.node_type())));
        assert_eq!(seen, vec!["/ list", "/0 symbol", "/1 vector", "/1/0 symbol"]);
    }

    #[test]
    fn test_delimiter_widths() {
        assert_eq!(CollectionKind::List.open_width(), 1);
        assert_eq!(CollectionKind::Set.open_width(), 2);
        assert_eq!(CollectionKind::Fn.open_width(), 2);
        assert!(CollectionKind::Fn.is_list_like());
        assert!(!CollectionKind::Map.is_list_like());
    }
}
