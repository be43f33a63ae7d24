//! Command-line interface for quill
//! Renders a source file through the tagging engine and prints one view of the result.
//!
//! Usage:
//!   quill `<path>` [--format `<format>`] [--config `<file>`] [--reindent]
//!
//! Formats:
//!   markup      rendered line markup (default)
//!   decorated   markup with rainbow delimiter classes
//!   tags        sorted tags, JSON
//!   forms       form tree (treeviz)
//!   indents     one indent marker per line, JSON
//!   errors      reader errors, JSON
//!
//! Logging goes to stderr, filtered by `QUILL_LOG` (default `warn`).

use clap::{Arg, ArgAction, Command};
use quill_config::{Loader, QuillConfig};
use quill_parser::quill::ast::format_source_context;
use quill_parser::quill::engine::Engine;
use quill_parser::quill::formats::to_treeviz_str;
use quill_parser::quill::indentation::compute_indents;
use quill_parser::quill::lines::LineIndex;
use quill_parser::quill::reading::{parse_errors, read_all};
use quill_parser::quill::tagging::{extract_document_tags, sort_tags};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const FORMATS: [&str; 6] = ["markup", "decorated", "tags", "forms", "indents", "errors"];

fn main() {
    init_logging();

    let matches = Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Lisp source through the quill tagging engine")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(FORMATS)
                .default_value("markup"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("reindent")
                .long("reindent")
                .help("Replace leading whitespace with the computed indent")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let format = matches
        .get_one::<String>("format")
        .expect("format has a default value");

    let config = load_config(
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_flag("reindent"),
    );

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    tracing::debug!(%path, %format, bytes = source.len(), "rendering file");
    print!("{}", handle_render_command(&source, format, &config));
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&str>, reindent: bool) -> QuillConfig {
    let mut loader = Loader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let loaded = if reindent {
        loader
            .set_override("rendering.reindent", true)
            .and_then(Loader::build)
    } else {
        loader.build()
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

/// Render `source` and format it as `format`
fn handle_render_command(source: &str, format: &str, config: &QuillConfig) -> String {
    let engine = Engine::new(config.render_options(), config.palette());

    match format {
        "markup" => with_newline(engine.render_frame(source).output.markup),
        "decorated" => with_newline(engine.render_frame(source).decorated_markup()),
        "forms" => to_treeviz_str(&read_all(source), source),
        "tags" => {
            let mut tags = extract_document_tags(&read_all(source));
            tags.extend(compute_indents(&tags, LineIndex::new(source).len()));
            sort_tags(&mut tags);
            to_json(&tags)
        }
        "indents" => {
            let tags = extract_document_tags(&read_all(source));
            to_json(&compute_indents(&tags, LineIndex::new(source).len()))
        }
        "errors" => {
            let errors = parse_errors(&read_all(source));
            for error in &errors {
                eprintln!("{}", error);
                eprint!("{}", format_source_context(source, &error.range));
            }
            to_json(&errors)
        }
        other => {
            eprintln!("Format '{}' not supported", other);
            eprintln!("Available formats: {}", FORMATS.join(", "));
            std::process::exit(1);
        }
    }
}

fn with_newline(mut text: String) -> String {
    text.push('\n');
    text
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => with_newline(json),
        Err(e) => {
            eprintln!("Error formatting output: {}", e);
            std::process::exit(1);
        }
    }
}
