//! Markup vocabulary
//!
//!     The renderer's output uses a small fixed vocabulary of span elements:
//!
//!         <span class="symbol">…</span>                     (and number, string, keyword, nil, boolean)
//!         <span class="collection list">…</span>            (and vector, map, set, fn)
//!         <span class="delimiter">(</span>
//!         <span class="indent" data-depth="1" data-indent="2">  </span>
//!         <span class="error" data-message="…"></span>      (zero width)
//!
//!     plus a line separator between lines (`<br>` by default). Source text between elements is
//!     escaped, so the markup can be injected into a view as is.
//!
//!     This module also reads that vocabulary back: [`strip_markup`] recovers the source text,
//!     and [`parse_markup`] builds the element tree the rainbow pass walks.

use crate::quill::ast::MarkupError;
use crate::quill::tagging::Level;

pub const DEFAULT_LINE_SEPARATOR: &str = "<br>";
pub const CLOSE_SPAN: &str = "</span>";
pub const DELIMITER_OPEN: &str = r#"<span class="delimiter">"#;

pub const DELIMITER_CLASS: &str = "delimiter";
pub const COLLECTION_CLASS: &str = "collection";

pub fn open_span(class: &str) -> String {
    format!(r#"<span class="{}">"#, class)
}

pub fn indent_open(level: &Level) -> String {
    format!(
        r#"<span class="indent" data-depth="{}" data-indent="{}">"#,
        level.depth, level.indent
    )
}

pub fn error_marker(message: &str) -> String {
    let mut out = String::from(r#"<span class="error" data-message=""#);
    escape_attribute(message, &mut out);
    out.push_str(r#""></span>"#);
    out
}

/// Escape source text for use between elements
pub fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Escape an attribute value (double quoted)
pub fn escape_attribute(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            c => escape_text(c.encode_utf8(&mut [0; 4]), out),
        }
    }
}

/// Undo [`escape_text`] / [`escape_attribute`]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Recover the source text of rendered markup
///
/// Drops every element, maps `separator` back to `\n` and unescapes text.
pub fn strip_markup(markup: &str, separator: &str) -> String {
    markup
        .split(separator)
        .map(|line| {
            let mut text = String::with_capacity(line.len());
            let mut in_tag = false;
            for c in line.chars() {
                match c {
                    '<' => in_tag = true,
                    '>' if in_tag => in_tag = false,
                    c if !in_tag => text.push(c),
                    _ => {}
                }
            }
            unescape(&text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One node of rendered markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    Element(Element),
    /// Escaped text, kept exactly as rendered
    Text(String),
    LineBreak,
}

/// A span element, or the document root (empty `tag`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<RenderedNode>,
}

impl Element {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child element at a path of child indices
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        path.iter().try_fold(self, |element, &index| {
            match element.children.get(index)? {
                RenderedNode::Element(child) => Some(child),
                _ => None,
            }
        })
    }

    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut element = self;
        for &index in path {
            element = match element.children.get_mut(index)? {
                RenderedNode::Element(child) => child,
                _ => return None,
            };
        }
        Some(element)
    }

    /// Concatenated text content, unescaped, line breaks as `\n`
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        unescape(&out)
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                RenderedNode::Element(element) => element.collect_text(out),
                RenderedNode::Text(text) => out.push_str(text),
                RenderedNode::LineBreak => out.push('\n'),
            }
        }
    }

    /// Serialize back into markup
    pub fn to_markup(&self, separator: &str) -> String {
        let mut out = String::new();
        self.write_markup(separator, &mut out);
        out
    }

    fn write_markup(&self, separator: &str, out: &mut String) {
        if !self.is_root() {
            out.push('<');
            out.push_str(&self.tag);
            if !self.classes.is_empty() {
                out.push_str(r#" class=""#);
                escape_attribute(&self.classes.join(" "), out);
                out.push('"');
            }
            for (key, value) in &self.attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str(r#"=""#);
                escape_attribute(value, out);
                out.push('"');
            }
            out.push('>');
        }
        for child in &self.children {
            match child {
                RenderedNode::Element(element) => element.write_markup(separator, out),
                RenderedNode::Text(text) => out.push_str(text),
                RenderedNode::LineBreak => out.push_str(separator),
            }
        }
        if !self.is_root() {
            out.push_str("</");
            out.push_str(&self.tag);
            out.push('>');
        }
    }
}

/// Build the element tree of rendered markup
pub fn parse_markup(markup: &str, separator: &str) -> Result<Element, MarkupError> {
    let mut stack: Vec<(usize, Element)> = vec![(0, Element::root())];
    let mut text_start = 0;
    let mut pos = 0;

    fn flush_text(stack: &mut [(usize, Element)], text: &str) {
        if !text.is_empty() {
            if let Some((_, parent)) = stack.last_mut() {
                parent.children.push(RenderedNode::Text(text.to_string()));
            }
        }
    }

    while pos < markup.len() {
        let rest = &markup[pos..];
        if !separator.is_empty() && rest.starts_with(separator) {
            flush_text(&mut stack, &markup[text_start..pos]);
            if let Some((_, parent)) = stack.last_mut() {
                parent.children.push(RenderedNode::LineBreak);
            }
            pos += separator.len();
            text_start = pos;
            continue;
        }
        if !rest.starts_with('<') {
            pos += rest.chars().next().map(char::len_utf8).unwrap_or(1);
            continue;
        }

        flush_text(&mut stack, &markup[text_start..pos]);
        let close = rest
            .find('>')
            .ok_or(MarkupError::MalformedTag { offset: pos })?;
        let inner = &rest[1..close];

        if let Some(name) = inner.strip_prefix('/') {
            if stack.len() < 2 {
                return Err(MarkupError::UnexpectedClose { offset: pos });
            }
            if let Some((opened_at, element)) = stack.pop() {
                if element.tag != name.trim() {
                    return Err(MarkupError::UnclosedElement { offset: opened_at });
                }
                if let Some((_, parent)) = stack.last_mut() {
                    parent.children.push(RenderedNode::Element(element));
                }
            }
        } else {
            let element = parse_open_tag(inner).ok_or(MarkupError::MalformedTag { offset: pos })?;
            stack.push((pos, element));
        }

        pos += close + 1;
        text_start = pos;
    }
    flush_text(&mut stack, &markup[text_start..]);

    if stack.len() > 1 {
        let offset = stack.last().map(|(offset, _)| *offset).unwrap_or(0);
        return Err(MarkupError::UnclosedElement { offset });
    }
    Ok(stack.pop().map(|(_, root)| root).unwrap_or_default())
}

/// `span class="a b" data-x="1"` into an element
fn parse_open_tag(inner: &str) -> Option<Element> {
    let inner = inner.trim();
    let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let tag = &inner[..name_end];
    if tag.is_empty() {
        return None;
    }

    let mut element = Element {
        tag: tag.to_string(),
        ..Element::default()
    };
    let mut rest = inner[name_end..].trim_start();
    while !rest.is_empty() {
        let eq = rest.find('=')?;
        let key = rest[..eq].trim();
        let value_rest = rest[eq + 1..].strip_prefix('"')?;
        let value_end = value_rest.find('"')?;
        let value = unescape(&value_rest[..value_end]);
        if key == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            element.attributes.push((key.to_string(), value));
        }
        rest = value_rest[value_end + 1..].trim_start();
    }
    Some(element)
}
