//! Testing utilities for form assertions
//!
//!     Reader tests check structure through [`assert_forms`] instead of walking [`Form`]s by
//!     hand. Hand-walking tests pin the exact shape of the tree and tend to stop at counts; the
//!     fluent API checks kinds, text, positions and errors per node, and only its own
//!     implementation changes when the form types do.
//!
//! Usage Example
//!
//!     ```rust,ignore
//!     use quill_parser::quill::reading::read_all;
//!     use quill_parser::quill::testing::assert_forms;
//!
//!     let source = "(defn f [x] (inc x))";
//!     assert_forms(&read_all(source), source)
//!         .form_count(1)
//!         .form(0, |list| {
//!             list.is("list")
//!                 .child_count(4)
//!                 .child(0, |name| name.is("symbol").text("defn"))
//!                 .child(2, |args| args.is("vector").child_count(1))
//!                 .child(3, |call| call.starts_at(0, 12).ends_at(0, 19))
//!         });
//!     ```
//!
//!     Failure messages carry the path of the failing node, e.g. `forms[0]/2`.
//!
//! Sources
//!
//!     Unlike most fixtures, reader inputs are short enough to inline. The shared sample
//!     documents in [`samples`] cover the multi-line cases used across test files.

mod form_assertions;

pub use form_assertions::{FormAssertion, FormsAssertion};

use crate::quill::ast::Form;

/// Create an assertion builder for a sequence of top-level forms
pub fn assert_forms<'a>(forms: &'a [Form], source: &'a str) -> FormsAssertion<'a> {
    FormsAssertion { forms, source }
}

/// Multi-line sample documents shared by tests
pub mod samples {
    /// A small namespace with a function, a map and nested collections
    pub const NAMESPACE: &str = "(ns demo.core\n  (:require [clojure.string :as str]))\n\n(defn greet\n  \"Say hello\"\n  [name]\n  (str/join \" \" [\"hello\" name]))\n\n(def config {:port 8080\n             :tags #{:a :b}})\n";

    /// Let bindings aligned under their vector
    pub const LET_BINDINGS: &str = "(let [a 1\n      b (inc a)]\n  (* a b))";

    /// One error of each structural kind, each on its own line
    pub const BROKEN: &str = "(ok)\n(a (b] c)\n)\n{:odd}\n(open";
}
