//! Text views of the form tree, for debugging and the CLI

pub mod treeviz;

pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params};
