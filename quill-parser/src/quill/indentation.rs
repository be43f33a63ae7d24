//! Indent calculation
//!
//!     Derives the level in effect at the start of every line from the `LevelMarker`s left by
//!     tag extraction. Line 0 starts at the default level. Any later line starts at the level
//!     of the last marker on the line before it. When that line has no marker, the previous
//!     line's level carries forward. One pass over the tags and one over the lines, whatever
//!     the number of tokens per line.

use crate::quill::ast::Position;
use crate::quill::tagging::{Level, Tag};

/// One `IndentMarker` per line, for lines `0..line_count`
///
/// Markers on lines at or past `line_count` are ignored; the renderer rejects such tags.
pub fn compute_indents(tags: &[Tag], line_count: usize) -> Vec<Tag> {
    let mut last_on_line: Vec<Option<(Position, usize, Level)>> = vec![None; line_count];

    for (order, tag) in tags.iter().enumerate() {
        if let Tag::LevelMarker { at, level } = tag {
            let Some(slot) = last_on_line.get_mut(at.line) else {
                continue;
            };
            let later = match slot {
                Some((position, seen, _)) => (*at, order) > (*position, *seen),
                None => true,
            };
            if later {
                *slot = Some((*at, order, *level));
            }
        }
    }

    let mut current = Level::default();
    let mut indents = Vec::with_capacity(line_count);
    for line in 0..line_count {
        if line > 0 {
            if let Some((_, _, level)) = last_on_line[line - 1] {
                current = level;
            }
        }
        indents.push(Tag::IndentMarker {
            line,
            level: current,
        });
    }
    indents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::reading::read_all;
    use crate::quill::tagging::extract_document_tags;

    fn levels(source: &str) -> Vec<(usize, usize)> {
        let tags = extract_document_tags(&read_all(source));
        let line_count = source.split('\n').count();
        compute_indents(&tags, line_count)
            .into_iter()
            .map(|tag| match tag {
                Tag::IndentMarker { level, .. } => (level.depth, level.indent),
                other => panic!("unexpected tag {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_empty_document_has_no_markers() {
        assert!(compute_indents(&[], 0).is_empty());
    }

    #[test]
    fn test_single_line_is_level_zero() {
        let tags = extract_document_tags(&read_all("(a b c)"));
        assert_eq!(
            compute_indents(&tags, 1),
            vec![Tag::IndentMarker {
                line: 0,
                level: Level::default()
            }]
        );
    }

    #[test]
    fn test_scenario_nested_line() {
        assert_eq!(levels("(a\n (b))"), vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_let_bindings_align_under_vector() {
        let source = "(let [a 1\n      b 2]\n  a)";
        assert_eq!(levels(source), vec![(0, 0), (2, 6), (1, 2)]);
    }

    #[test]
    fn test_later_line_collection_hangs_from_its_own_delimiter() {
        assert_eq!(levels("(a\n(b\n c))"), vec![(0, 0), (1, 2), (2, 2)]);
        assert_eq!(levels("(a\n (b\n  c))"), vec![(0, 0), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_level_carries_over_blank_lines() {
        assert_eq!(levels("(a\n\n\n b)"), vec![(0, 0), (1, 2), (1, 2), (1, 2)]);
    }

    #[test]
    fn test_back_to_top_level_after_form() {
        assert_eq!(levels("(a\n b)\nc"), vec![(0, 0), (1, 2), (0, 0)]);
    }

    #[test]
    fn test_last_marker_wins_regardless_of_input_order() {
        let tags = vec![
            Tag::LevelMarker {
                at: Position::new(0, 9),
                level: Level::new(2, 4),
            },
            Tag::LevelMarker {
                at: Position::new(0, 3),
                level: Level::new(1, 2),
            },
        ];
        let indents = compute_indents(&tags, 2);
        assert_eq!(
            indents[1],
            Tag::IndentMarker {
                line: 1,
                level: Level::new(2, 4)
            }
        );
    }

    #[test]
    fn test_markers_past_line_count_are_ignored() {
        let tags = vec![Tag::LevelMarker {
            at: Position::new(5, 0),
            level: Level::new(3, 3),
        }];
        assert_eq!(compute_indents(&tags, 2).len(), 2);
    }
}
