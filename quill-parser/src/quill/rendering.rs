//! Line rendering
//!
//!     Splices sorted tags into the text of each line. Every tag anchors at a character column;
//!     the line text is cut at those columns and the tag fragments are inserted in tag order,
//!     so the markup lines up character for character with the source.
//!
//!     The line's `IndentMarker` becomes a span around the leading whitespace. Everything else
//!     maps one tag to one fragment of the vocabulary in [`crate::quill::markup`]. Level markers
//!     render nothing.
//!
//!     Per-line markup is not balanced on its own: a collection spanning several lines opens on
//!     one line and closes on a later one. The joined document always is.
//!
//! Pipeline
//!
//!     [`render`] runs the whole thing for one snapshot:
//!
//!         read_all -> extract_document_tags -> compute_indents -> sort_tags -> render_document

use crate::quill::ast::{ParseError, RenderError};
use crate::quill::indentation::compute_indents;
use crate::quill::lines::{leading_whitespace, LineIndex};
use crate::quill::markup::{
    error_marker, escape_text, indent_open, open_span, CLOSE_SPAN, DEFAULT_LINE_SEPARATOR,
    DELIMITER_OPEN,
};
use crate::quill::reading::{parse_errors, read_all};
use crate::quill::tagging::{extract_document_tags, sort_tags, Level, Tag};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Markup placed between lines
    pub line_separator: String,
    /// Replace leading whitespace with the computed indent
    pub reindent: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
            reindent: false,
        }
    }
}

/// Markup for a whole snapshot plus every reader error in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub markup: String,
    pub errors: Vec<ParseError>,
}

/// Render one line from the tags anchored on it
///
/// `tags` may arrive in any order and should all belong to `line`. A tag past the end of the
/// text is a contract violation.
pub fn render_line(
    line: usize,
    text: &str,
    tags: &[Tag],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut tags = tags.to_vec();
    sort_tags(&mut tags);

    // byte offset of every character column, plus the end of the line
    let mut offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    offsets.push(text.len());
    let width = offsets.len() - 1;

    let mut indent: Option<Level> = None;
    let mut anchored = Vec::with_capacity(tags.len());
    for tag in &tags {
        if tag.line() != line {
            return Err(RenderError::HostContractViolation {
                line,
                column: tag.column(),
                reason: format!("tag for line {} handed to line {}", tag.line(), line),
            });
        }
        match (tag, tag.column()) {
            (Tag::IndentMarker { level, .. }, _) => indent = Some(*level),
            (_, Some(column)) if column > width => {
                return Err(RenderError::HostContractViolation {
                    line,
                    column: Some(column),
                    reason: format!("column past the end of a {} character line", width),
                });
            }
            (_, Some(column)) => anchored.push((column, tag)),
            (_, None) => {}
        }
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut cursor = 0;

    if let Some(level) = indent {
        let whitespace = leading_whitespace(text).chars().count();
        let first_tag = anchored.first();
        let end = first_tag.map_or(whitespace, |(column, _)| whitespace.min(*column));

        out.push_str(&indent_open(&level));
        let reindent = options.reindent
            && matches!(first_tag, Some((column, tag)) if *column == whitespace && !tag.is_end());
        if reindent {
            out.push_str(&" ".repeat(level.indent));
        } else {
            escape_text(&text[..offsets[end]], &mut out);
        }
        out.push_str(CLOSE_SPAN);
        cursor = end;
    }

    for (column, tag) in anchored {
        if column > cursor {
            escape_text(&text[offsets[cursor]..offsets[column]], &mut out);
            cursor = column;
        }
        push_fragment(tag, &mut out);
    }
    escape_text(&text[offsets[cursor]..], &mut out);

    Ok(out)
}

fn push_fragment(tag: &Tag, out: &mut String) {
    match tag {
        Tag::TokenBegin { kind, .. } => out.push_str(&open_span(kind.class())),
        Tag::TokenEnd { .. } | Tag::DelimiterClose { .. } => out.push_str(CLOSE_SPAN),
        Tag::DelimiterOpen { .. } => out.push_str(DELIMITER_OPEN),
        Tag::ErrorMarker { message, .. } => out.push_str(&error_marker(message)),
        Tag::LevelMarker { .. } | Tag::IndentMarker { .. } => {}
    }
}

/// Render every line of `lines`, joined by the line separator
pub fn render_document(
    lines: &LineIndex<'_>,
    tags: &[Tag],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut per_line: Vec<Vec<Tag>> = vec![Vec::new(); lines.len()];
    for tag in tags {
        let line = tag.line();
        match per_line.get_mut(line) {
            Some(bucket) => bucket.push(tag.clone()),
            None => {
                return Err(RenderError::HostContractViolation {
                    line,
                    column: tag.column(),
                    reason: format!("tag outside a {} line document", lines.len()),
                })
            }
        }
    }

    let rendered = lines
        .iter()
        .zip(per_line.iter())
        .enumerate()
        .map(|(line, (text, tags))| render_line(line, text, tags, options))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(&options.line_separator))
}

/// Render a snapshot with the default options
pub fn render(text: &str) -> RenderOutput {
    render_with(text, &RenderOptions::default())
}

/// Render a snapshot: read, tag, indent and splice every line
pub fn render_with(text: &str, options: &RenderOptions) -> RenderOutput {
    let forms = read_all(text);
    let errors = parse_errors(&forms);
    let lines = LineIndex::new(text);

    let mut tags = extract_document_tags(&forms);
    let indents = compute_indents(&tags, lines.len());
    tags.extend(indents);
    sort_tags(&mut tags);

    tracing::debug!(
        forms = forms.len(),
        tags = tags.len(),
        lines = lines.len(),
        errors = errors.len(),
        "rendering snapshot"
    );

    let markup = match render_document(&lines, &tags, options) {
        Ok(markup) => markup,
        Err(error) => {
            tracing::error!(%error, "tags do not fit the snapshot, rendering plain text");
            debug_assert!(false, "{}", error);
            plain_markup(&lines, options)
        }
    };

    RenderOutput { markup, errors }
}

/// Escaped text only, no spans
fn plain_markup(lines: &LineIndex<'_>, options: &RenderOptions) -> String {
    lines
        .iter()
        .map(|text| {
            let mut out = String::with_capacity(text.len());
            escape_text(text, &mut out);
            out
        })
        .collect::<Vec<_>>()
        .join(&options.line_separator)
}
