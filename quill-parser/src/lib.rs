//! # quill
//!
//! The syntax-tagging engine of a structural editor for a Clojure-like Lisp.
//!
//! Pipeline
//!
//!     Every edit re-reads the whole buffer. The stages are pure functions of the text snapshot
//!     and run in this order:
//!
//!         text -> reading -> tagging -> indentation -> rendering -> rainbow
//!
//!     - [reading](quill::reading): forms with exact positions, errors kept as forms
//!     - [tagging](quill::tagging): flat, positioned tags per form
//!     - [indentation](quill::indentation): the level in effect at the start of every line
//!     - [rendering](quill::rendering): tags spliced into each line as span markup
//!     - [rainbow](quill::rainbow): delimiter colors by nesting depth
//!
//!     [engine](quill::engine) drives the stages as idle/rendering cycles for an editing host.
//!
//! For testing guidelines, see the [testing module](quill::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod quill;
