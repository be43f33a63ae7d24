//! End-to-end tests for the read, tag, indent and render pipeline

use quill_parser::quill::engine::Engine;
use quill_parser::quill::formats::to_treeviz_str;
use quill_parser::quill::indentation::compute_indents;
use quill_parser::quill::lines::LineIndex;
use quill_parser::quill::markup::strip_markup;
use quill_parser::quill::reading::{parse_errors, read_all, MAX_NESTING};
use quill_parser::quill::rendering::render;
use quill_parser::quill::tagging::{extract_document_tags, sort_tags, Tag};
use quill_parser::quill::testing::{assert_forms, samples};
use rstest::rstest;

fn indent_levels(source: &str) -> Vec<(usize, usize)> {
    let tags = extract_document_tags(&read_all(source));
    compute_indents(&tags, LineIndex::new(source).len())
        .into_iter()
        .filter_map(|tag| match tag {
            Tag::IndentMarker { level, .. } => Some((level.depth, level.indent)),
            _ => None,
        })
        .collect()
}

#[rstest]
#[case("foo", "symbol")]
#[case("-", "symbol")]
#[case("12", "number")]
#[case("-3", "number")]
#[case("+5", "number")]
#[case("\"s\"", "string")]
#[case("\\c", "string")]
#[case("#\"re\"", "string")]
#[case(":k", "keyword")]
#[case("nil", "nil")]
#[case("true", "boolean")]
#[case("false", "boolean")]
fn atoms_render_with_their_class(#[case] source: &str, #[case] class: &str) {
    let markup = render(source).markup;
    let expected = format!(r#"<span class="{}">{}</span>"#, class, source);
    assert!(markup.contains(&expected), "{} not in {}", expected, markup);
}

#[rstest]
#[case("(foo", "EOF while reading, starting at line 1")]
#[case("\n\n[a", "EOF while reading, starting at line 3")]
#[case(")", "Unmatched delimiter: )")]
#[case("(a]", "Unmatched delimiter: ], expected: )")]
#[case("#{a)", "Unmatched delimiter: ), expected: }")]
#[case("\"abc", "EOF while reading string")]
#[case("'", "EOF while reading")]
#[case("{:a}", "Map literal must contain an even number of forms")]
#[case("# x", "Unknown dispatch character")]
fn reader_errors(#[case] source: &str, #[case] message: &str) {
    let forms = read_all(source);
    assert_forms(&forms, source).form(0, |form| form.error(message));
    assert_eq!(parse_errors(&forms).len(), 1);
}

#[rstest]
#[case("a", vec![(0, 0)])]
#[case("(a\n (b))", vec![(0, 0), (1, 2)])]
#[case("[a\n b]", vec![(0, 0), (1, 1)])]
#[case("{:a\n 1}", vec![(0, 0), (1, 1)])]
#[case("#{a\n b}", vec![(0, 0), (1, 2)])]
#[case("#(a\n b)", vec![(0, 0), (1, 2)])]
#[case("(a (b\n c))", vec![(0, 0), (2, 5)])]
#[case("(let [a 1\n      b 2]\n  a)", vec![(0, 0), (2, 6), (1, 2)])]
#[case("(a\n", vec![(0, 0), (0, 0)])]
fn indent_levels_per_line(#[case] source: &str, #[case] expected: Vec<(usize, usize)>) {
    assert_eq!(indent_levels(source), expected);
}

#[test]
fn scenario_nested_collections() {
    let source = "(foo [1 2] (bar))";
    assert_forms(&read_all(source), source)
        .form_count(1)
        .form(0, |list| {
            list.is("list")
                .child_count(3)
                .child(0, |foo| foo.is("symbol").text("foo"))
                .child(1, |vector| vector.is("vector").child_count(2))
                .child(2, |bar| bar.is("list").starts_at(0, 11).ends_at(0, 16))
        });

    insta::assert_snapshot!(
        render(source).markup,
        @r#"<span class="indent" data-depth="0" data-indent="0"></span><span class="collection list"><span class="delimiter">(</span><span class="symbol">foo</span> <span class="collection vector"><span class="delimiter">[</span><span class="number">1</span> <span class="number">2</span><span class="delimiter">]</span></span> <span class="collection list"><span class="delimiter">(</span><span class="symbol">bar</span><span class="delimiter">)</span></span><span class="delimiter">)</span></span>"#
    );
}

#[test]
fn scenario_unterminated_list() {
    let output = render("(foo");
    assert_eq!(output.errors.len(), 1);
    assert_eq!(
        output.errors[0].message,
        "EOF while reading, starting at line 1"
    );
    assert_eq!(output.errors[0].range.start.column, 0);
    assert!(output
        .markup
        .contains(r#"<span class="error" data-message="EOF while reading, starting at line 1"></span>"#));
    assert_eq!(strip_markup(&output.markup, "<br>"), "(foo");
}

#[test]
fn scenario_second_line_is_nested() {
    assert_eq!(indent_levels("(a\n (b))"), vec![(0, 0), (1, 2)]);
}

#[test]
fn sorted_tags_serialize() {
    let mut tags = extract_document_tags(&read_all("a"));
    tags.extend(compute_indents(&tags, 1));
    sort_tags(&mut tags);
    let json = serde_json::to_string(&tags).expect("tags serialize");
    insta::assert_snapshot!(
        json,
        @r#"[{"type":"indent-marker","line":0,"level":{"depth":0,"indent":0}},{"type":"token-begin","at":{"line":0,"column":0},"kind":{"atom":"symbol"}},{"type":"token-end","at":{"line":0,"column":1}},{"type":"level-marker","at":{"line":0,"column":1},"level":{"depth":0,"indent":0}}]"#
    );
}

#[test]
fn broken_document_degrades_locally() {
    let source = samples::BROKEN;
    let forms = read_all(source);
    assert_forms(&forms, source)
        .form_count(5)
        .error_count(4)
        .form(0, |ok| ok.is("list").text("(ok)"))
        .form(1, |list| list.is("list").child(1, |inner| inner.is("error")))
        .form(2, |stray| stray.is("error").starts_at(2, 0))
        .form(3, |map| map.is("error").starts_at(3, 0))
        .form(4, |open| open.error("EOF while reading, starting at line 5"));

    let output = render(source);
    assert_eq!(output.errors.len(), 4);
    assert_eq!(strip_markup(&output.markup, "<br>"), source);
    assert_eq!(output.markup.matches("<br>").count(), 4);
}

#[test]
fn sample_namespace_renders_every_line() {
    let source = samples::NAMESPACE;
    let output = render(source);
    assert!(output.errors.is_empty());
    assert_eq!(
        output.markup.matches(r#"<span class="indent""#).count(),
        LineIndex::new(source).len()
    );
    assert_eq!(strip_markup(&output.markup, "<br>"), source);
}

#[test]
fn let_bindings_treeviz() {
    let source = samples::LET_BINDINGS;
    insta::assert_snapshot!(to_treeviz_str(&read_all(source), source), @r"
    ⧉ 1 form
    └─ ☰ 3 forms
      ├─ ◦ let
      ├─ ▦ 4 forms
      │ ├─ ◦ a
      │ ├─ № 1
      │ ├─ ◦ b
      │ └─ ☰ 2 forms
      │   ├─ ◦ inc
      │   └─ ◦ a
      └─ ☰ 3 forms
        ├─ ◦ *
        ├─ ◦ a
        └─ ◦ b
    ");
}

#[test]
fn engine_frames_match_render() {
    let engine = Engine::default();
    let source = samples::LET_BINDINGS;
    let frame = engine.render_frame(source);
    assert_eq!(frame.output, render(source));
    assert_eq!(
        frame.decorations.len(),
        frame.output.markup.matches(r#"class="delimiter""#).count()
    );
}

#[test]
fn deeply_nested_paste_renders_with_one_error() {
    let depth = 10_000;
    let source = format!("{}{}", "(".repeat(depth), ")".repeat(depth));
    let output = render(&source);

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].message, "Nesting too deep");
    assert_eq!(output.errors[0].range.start.column, MAX_NESTING);
    assert_eq!(strip_markup(&output.markup, "<br>"), source);

    let frame = Engine::default().render_frame(&source);
    assert_eq!(frame.decorations.len(), 2 * MAX_NESTING);
}

#[test]
fn long_single_line_keeps_character_columns() {
    let words = 50_000;
    let source = format!("(λ {})", "ab ".repeat(words));
    let forms = read_all(&source);
    assert_forms(&forms, &source).form(0, |list| {
        list.child_count(words + 1)
            .child(words, |last| last.text("ab").starts_at(0, 3 + 3 * (words - 1)))
            .ends_at(0, source.chars().count())
    });
    assert!(render(&source).errors.is_empty());
}
