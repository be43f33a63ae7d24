//! Render cycle
//!
//!     The engine turns text snapshots into frames, one cycle at a time:
//!
//!         Idle --edit--> Rendering --frame handed to host--> Idle
//!
//!     A cycle runs the full pipeline (read, tag, indent, render, decorate) on one immutable
//!     snapshot and hands the resulting [`Frame`] to a [`RenderHost`]. Cycles never nest: edits
//!     that arrive while the host handles a frame go into an [`EditQueue`], where the newest
//!     snapshot replaces any older one. Once the host returns, the engine starts a fresh cycle on
//!     the queued snapshot, and goes back to idle when the queue is empty.
//!
//!     The same text always produces the same frame.

use crate::quill::markup::{parse_markup, Element};
use crate::quill::rainbow::{apply_decorations, decorate, Decorations, Palette};
use crate::quill::rendering::{render_with, RenderOptions, RenderOutput};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    Rendering,
}

/// Everything one cycle produced for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub output: RenderOutput,
    /// Element tree of `output.markup`
    pub tree: Option<Element>,
    pub decorations: Decorations,
    separator: String,
}

impl Frame {
    pub fn markup(&self) -> &str {
        &self.output.markup
    }

    /// Markup with the rainbow classes applied
    pub fn decorated_markup(&self) -> String {
        match &self.tree {
            Some(tree) => {
                let mut tree = tree.clone();
                apply_decorations(&mut tree, &self.decorations);
                tree.to_markup(&self.separator)
            }
            None => self.output.markup.clone(),
        }
    }
}

/// Snapshots submitted while a frame is being handled
#[derive(Debug, Default)]
pub struct EditQueue {
    pending: Option<String>,
    superseded: usize,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot, replacing any snapshot already waiting
    pub fn push(&mut self, text: impl Into<String>) {
        if self.pending.replace(text.into()).is_some() {
            self.superseded += 1;
        }
    }

    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Snapshots dropped because a newer one arrived
    pub fn superseded(&self) -> usize {
        self.superseded
    }
}

/// Receives finished frames
pub trait RenderHost {
    fn present(&mut self, frame: &Frame, edits: &mut EditQueue);
}

impl<F> RenderHost for F
where
    F: FnMut(&Frame, &mut EditQueue),
{
    fn present(&mut self, frame: &Frame, edits: &mut EditQueue) {
        self(frame, edits)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: RenderOptions,
    palette: Palette,
    state: EngineState,
    cycles: u64,
}

impl Engine {
    pub fn new(options: RenderOptions, palette: Palette) -> Self {
        Self {
            options,
            palette,
            state: EngineState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Cycles completed since the engine was created
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run the pipeline on one snapshot
    pub fn render_frame(&self, text: &str) -> Frame {
        let output = render_with(text, &self.options);
        let separator = &self.options.line_separator;

        let (tree, decorations) = match parse_markup(&output.markup, separator) {
            Ok(tree) => {
                let decorations = decorate(&tree, &self.palette);
                (Some(tree), decorations)
            }
            Err(error) => {
                tracing::error!(%error, "rendered markup does not parse, skipping decorations");
                debug_assert!(false, "{}", error);
                (None, Decorations::new())
            }
        };

        Frame {
            text: text.to_string(),
            output,
            tree,
            decorations,
            separator: separator.clone(),
        }
    }

    /// Render `text`, then every snapshot the host queues while handling frames
    ///
    /// Returns the number of cycles run.
    pub fn edit<H: RenderHost + ?Sized>(&mut self, text: &str, host: &mut H) -> usize {
        let mut edits = EditQueue::new();
        let mut snapshot = text.to_string();
        let mut cycles = 0;

        self.state = EngineState::Rendering;
        loop {
            let frame = self.render_frame(&snapshot);
            cycles += 1;
            self.cycles += 1;
            host.present(&frame, &mut edits);

            match edits.take() {
                Some(next) => snapshot = next,
                None => break,
            }
        }
        self.state = EngineState::Idle;

        tracing::debug!(
            cycles,
            superseded = edits.superseded(),
            "edit settled"
        );
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_starts_idle() {
        let engine = Engine::default();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.cycles(), 0);
    }

    #[test]
    fn test_single_edit_runs_one_cycle() {
        let mut engine = Engine::default();
        let mut seen = Vec::new();
        let cycles = engine.edit("(a b)", &mut |frame: &Frame, _: &mut EditQueue| {
            seen.push(frame.text.clone());
        });
        assert_eq!(cycles, 1);
        assert_eq!(seen, vec!["(a b)".to_string()]);
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_newest_queued_snapshot_wins() {
        let mut engine = Engine::default();
        let mut seen = Vec::new();
        let mut superseded = 0;
        let cycles = engine.edit("(a", &mut |frame: &Frame, edits: &mut EditQueue| {
            seen.push(frame.text.clone());
            if frame.text == "(a" {
                edits.push("(a ");
                edits.push("(a b");
                edits.push("(a b)");
                superseded = edits.superseded();
            }
        });
        assert_eq!(cycles, 2);
        assert_eq!(seen, vec!["(a".to_string(), "(a b)".to_string()]);
        assert_eq!(superseded, 2);
        assert_eq!(engine.cycles(), 2);
    }

    #[test]
    fn test_frames_are_deterministic() {
        let engine = Engine::default();
        let text = "(defn f [x]\n  {:a x})";
        assert_eq!(engine.render_frame(text), engine.render_frame(text));
    }

    #[test]
    fn test_frame_decorations() {
        let engine = Engine::default();
        let frame = engine.render_frame("[1 (2)]");
        assert_eq!(frame.decorations.len(), 4);
        assert!(frame
            .decorated_markup()
            .contains(r#"<span class="delimiter rainbow-1">(</span>"#));
        assert!(frame.output.errors.is_empty());
    }

    struct Recorder {
        frames: usize,
    }

    impl RenderHost for Recorder {
        fn present(&mut self, _frame: &Frame, _edits: &mut EditQueue) {
            self.frames += 1;
        }
    }

    #[test]
    fn test_struct_host() {
        let mut engine = Engine::default();
        let mut host = Recorder { frames: 0 };
        engine.edit("a", &mut host);
        engine.edit("b", &mut host);
        assert_eq!(host.frames, 2);
    }
}
