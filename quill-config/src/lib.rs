//! Shared configuration loader for quill.
//!
//! `defaults/quill.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuillConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quill_parser::quill::rainbow::Palette;
use quill_parser::quill::rendering::RenderOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quill.default.toml");

/// Top-level configuration consumed by quill applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuillConfig {
    pub rendering: RenderingConfig,
    pub rainbow: RainbowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderingConfig {
    pub line_separator: String,
    pub reindent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RainbowConfig {
    pub palette: Vec<String>,
}

impl QuillConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            line_separator: self.rendering.line_separator.clone(),
            reindent: self.rendering.reindent,
        }
    }

    /// The configured palette; [`Loader::build`] rejects empty ones
    pub fn palette(&self) -> Palette {
        Palette::new(self.rainbow.palette.iter().cloned()).unwrap_or_default()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuillConfig, ConfigError> {
        let config: QuillConfig = self.builder.build()?.try_deserialize()?;
        if config.rainbow.palette.is_empty() {
            return Err(ConfigError::Message(
                "rainbow.palette needs at least one color".to_string(),
            ));
        }
        if config.rendering.line_separator.is_empty() {
            return Err(ConfigError::Message(
                "rendering.line_separator must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuillConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.rendering.line_separator, "<br>");
        assert!(!config.rendering.reindent);
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("rendering.reindent", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.render_options().reindent);
    }

    #[test]
    fn layers_user_files() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[rainbow]\npalette = [\"warm\", \"cold\"]").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        let palette = config.palette();
        assert_eq!(palette.colors().len(), 2);
        assert_eq!(palette.color(3).as_str(), "cold");
        assert_eq!(config.rendering.line_separator, "<br>");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/quill.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.rainbow.palette.len(), 10);
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new()
            .with_file("/nonexistent/quill.toml")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_empty_separator() {
        let error = Loader::new()
            .set_override("rendering.line_separator", "")
            .expect("override to apply")
            .build()
            .expect_err("empty separator");
        assert!(error.to_string().contains("rendering.line_separator"));
    }
}
