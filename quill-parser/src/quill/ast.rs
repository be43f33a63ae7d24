//! Forms and positions
//!
//!     The reader's output: a tree of [`Form`]s with explicit [`Range`]s, plus the error types
//!     shared by the rest of the pipeline.

pub mod error;
pub mod form;
pub mod range;

pub use error::{format_source_context, MarkupError, ParseError, RenderError};
pub use form::{AtomKind, CollectionKind, Form, FormKind, FormPath};
pub use range::{Position, Range, SourceLocation};
