//! Fluent assertions over top-level forms and their children

use crate::quill::ast::Form;

fn summarize(forms: &[Form]) -> String {
    forms
        .iter()
        .map(|form| form.node_type())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct FormsAssertion<'a> {
    pub(crate) forms: &'a [Form],
    pub(crate) source: &'a str,
}

impl<'a> FormsAssertion<'a> {
    /// Assert the number of top-level forms
    pub fn form_count(self, expected: usize) -> Self {
        let actual = self.forms.len();
        assert_eq!(
            actual,
            expected,
            "Expected {} forms, found {} forms: [{}]",
            expected,
            actual,
            summarize(self.forms)
        );
        self
    }

    /// Assert on a specific top-level form by index
    pub fn form<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(FormAssertion<'a>) -> FormAssertion<'a>,
    {
        assert!(
            index < self.forms.len(),
            "Form index {} out of bounds (document has {} forms)",
            index,
            self.forms.len()
        );
        assertion(FormAssertion {
            form: &self.forms[index],
            source: self.source,
            context: format!("forms[{}]", index),
        });
        self
    }

    /// Assert the total number of error forms, nested ones included
    pub fn error_count(self, expected: usize) -> Self {
        let mut messages = Vec::new();
        for form in self.forms {
            form.walk(&mut |_, node| {
                if let Some(message) = node.error_message() {
                    messages.push(message.to_string());
                }
            });
        }
        assert_eq!(
            messages.len(),
            expected,
            "Expected {} errors, found {}: {:?}",
            expected,
            messages.len(),
            messages
        );
        self
    }
}

pub struct FormAssertion<'a> {
    pub(crate) form: &'a Form,
    pub(crate) source: &'a str,
    pub(crate) context: String,
}

impl<'a> FormAssertion<'a> {
    /// Assert the node type (`symbol`, `list`, `error`, ...)
    pub fn is(self, expected: &str) -> Self {
        assert_eq!(
            self.form.node_type(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.form.node_type()
        );
        self
    }

    /// Assert the exact source text of the form
    pub fn text(self, expected: &str) -> Self {
        let actual = self.form.text(self.source);
        assert_eq!(
            actual, expected,
            "{}: Expected text to be '{}', but got '{}'",
            self.context, expected, actual
        );
        self
    }

    pub fn text_starts_with(self, prefix: &str) -> Self {
        let actual = self.form.text(self.source);
        assert!(
            actual.starts_with(prefix),
            "{}: Expected text to start with '{}', but got '{}'",
            self.context,
            prefix,
            actual
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.form.children();
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(FormAssertion<'a>) -> FormAssertion<'a>,
    {
        let children = self.form.children();
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds ({} has {} children)",
            self.context,
            index,
            self.form.node_type(),
            children.len()
        );
        assertion(FormAssertion {
            form: &children[index],
            source: self.source,
            context: format!("{}/{}", self.context, index),
        });
        self
    }

    /// Assert the start position (0-based line and column)
    pub fn starts_at(self, line: usize, column: usize) -> Self {
        let start = self.form.range.start;
        assert_eq!(
            (start.line, start.column),
            (line, column),
            "{}: Expected start {}:{}, found {}",
            self.context,
            line,
            column,
            start
        );
        self
    }

    /// Assert the end position (exclusive)
    pub fn ends_at(self, line: usize, column: usize) -> Self {
        let end = self.form.range.end;
        assert_eq!(
            (end.line, end.column),
            (line, column),
            "{}: Expected end {}:{}, found {}",
            self.context,
            line,
            column,
            end
        );
        self
    }

    /// Assert this is an error form with exactly this message
    pub fn error(self, expected: &str) -> Self {
        match self.form.error_message() {
            Some(message) => assert_eq!(
                message, expected,
                "{}: Expected error '{}', found '{}'",
                self.context, expected, message
            ),
            None => panic!(
                "{}: Expected error '{}', found {}",
                self.context,
                expected,
                self.form.node_type()
            ),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::quill::reading::read_all;
    use crate::quill::testing::{assert_forms, samples};

    #[test]
    fn test_fluent_assertions() {
        let source = "(defn f [x] (inc x))";
        assert_forms(&read_all(source), source)
            .form_count(1)
            .error_count(0)
            .form(0, |list| {
                list.is("list")
                    .child_count(4)
                    .child(0, |name| name.is("symbol").text("defn"))
                    .child(2, |args| args.is("vector").child_count(1))
                    .child(3, |call| call.starts_at(0, 12).ends_at(0, 19))
            });
    }

    #[test]
    #[should_panic(expected = "forms[0]/1: Expected number, found symbol")]
    fn test_failure_names_the_path() {
        let source = "(a b)";
        assert_forms(&read_all(source), source).form(0, |list| list.child(1, |b| b.is("number")));
    }

    #[test]
    fn test_error_assertion() {
        let source = "(open";
        assert_forms(&read_all(source), source)
            .error_count(1)
            .form(0, |form| form.is("error").error("EOF while reading, starting at line 1"));
    }

    #[test]
    fn test_samples_read() {
        let source = samples::NAMESPACE;
        assert_forms(&read_all(source), source)
            .form_count(3)
            .error_count(0)
            .form(1, |defn| defn.is("list").child_count(5).text_starts_with("(defn greet"))
            .form(2, |def| {
                def.child(2, |map| {
                    map.is("map")
                        .starts_at(8, 12)
                        .child(3, |set| set.is("set").starts_at(9, 19))
                })
            });
    }
}
