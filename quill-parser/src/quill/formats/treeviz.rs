//! Treeviz formatter for forms
//!
//! One line per form, nesting drawn with box connectors:
//!
//!     ⧉ 2 forms
//!     ├─ ☰ 3 forms
//!     │ ├─ ◦ foo
//!     │ ├─ ▦ 2 forms
//!     │ │ ├─ № 1
//!     │ │ └─ № 2
//!     │ └─ ☰ 1 form
//!     │   └─ ◦ bar
//!     └─ ⚠ EOF while reading, starting at…
//!
//! Atoms show their source text, collections their child count, errors their message. Labels
//! are cut to 30 characters.
//!
//! Icons
//!     Document: ⧉
//!     Collections: list ☰, vector ▦, map ≔, set ∴, fn ƒ
//!     Atoms: symbol ◦, number №, string ", keyword :, nil ∅, boolean ◐
//!     Error: ⚠

use crate::quill::ast::{Form, FormKind};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "list" => "☰",
        "vector" => "▦",
        "map" => "≔",
        "set" => "∴",
        "fn" => "ƒ",
        "symbol" => "◦",
        "number" => "№",
        "string" => "\"",
        "keyword" => ":",
        "nil" => "∅",
        "boolean" => "◐",
        "error" => "⚠",
        _ => "○",
    }
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 form".to_string()
    } else {
        format!("{} forms", count)
    }
}

fn label(form: &Form, source: &str) -> String {
    let text = if let Some(message) = form.error_message() {
        message.to_string()
    } else if matches!(form.kind, FormKind::Collection { .. }) {
        count_label(form.children().len())
    } else {
        form.text(source).lines().next().unwrap_or("").to_string()
    };
    truncate(&text, LABEL_WIDTH)
}

fn format_form(
    form: &Form,
    source: &str,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_linum: bool,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };

    let linum_prefix = if show_linum {
        format!("{:02} ", form.range.start.line + 1)
    } else {
        String::new()
    };

    output.push_str(&format!(
        "{}{}{} {} {}\n",
        linum_prefix,
        prefix,
        connector,
        get_icon(form.node_type()),
        label(form, source)
    ));

    let children = form.children();
    if !children.is_empty() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        for (i, child) in children.iter().enumerate() {
            output.push_str(&format_form(
                child,
                source,
                &child_prefix,
                i,
                children.len(),
                show_linum,
            ));
        }
    }

    output
}

pub fn to_treeviz_str(forms: &[Form], source: &str) -> String {
    to_treeviz_str_with_params(forms, source, &HashMap::new())
}

/// Accepts `show-linum` (anything but `false` turns it on)
pub fn to_treeviz_str_with_params(
    forms: &[Form],
    source: &str,
    params: &HashMap<String, String>,
) -> String {
    let show_linum = params
        .get("show-linum")
        .map(|v| v != "false")
        .unwrap_or(false);

    let mut output = format!("⧉ {}\n", count_label(forms.len()));
    for (i, form) in forms.iter().enumerate() {
        output.push_str(&format_form(form, source, "", i, forms.len(), show_linum));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::reading::read_all;

    #[test]
    fn test_treeviz_nested() {
        let source = "(foo [1 2] (bar))\n:k";
        let output = to_treeviz_str(&read_all(source), source);
        let expected = "\
⧉ 2 forms
├─ ☰ 3 forms
│ ├─ ◦ foo
│ ├─ ▦ 2 forms
│ │ ├─ № 1
│ │ └─ № 2
│ └─ ☰ 1 form
│   └─ ◦ bar
└─ : :k
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_treeviz_error_and_linum() {
        let source = "a\n(b";
        let mut params = HashMap::new();
        params.insert("show-linum".to_string(), "true".to_string());
        let output = to_treeviz_str_with_params(&read_all(source), source, &params);
        assert_eq!(
            output,
            "⧉ 2 forms\n01 ├─ ◦ a\n02 └─ ⚠ EOF while reading, starting at…\n"
        );
    }

    #[test]
    fn test_treeviz_empty() {
        assert_eq!(to_treeviz_str(&[], ""), "⧉ 0 forms\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
