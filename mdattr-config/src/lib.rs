//! Shared configuration loader for the mdattr toolchain.
//!
//! `defaults/mdattr.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdattrConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdattr::formats::json::JsonOptions;
use mdattr::formats::markdown::{BulletStyle, ParserOptions, SerializerOptions};
use mdattr::Color;
use serde::Deserialize;
use std::path::Path;
use url::Url;

const DEFAULT_TOML: &str = include_str!("../defaults/mdattr.default.toml");

/// Top-level configuration consumed by mdattr applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdattrConfig {
    pub parser: ParserConfig,
    pub serializer: SerializerConfig,
    pub convert: ConvertConfig,
}

/// Mirrors the knobs exposed by [`ParserOptions`].
///
/// Level limits use 0 for "no limit".
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub base_font_size: f32,
    pub header_sizes: Vec<f32>,
    pub max_header_level: usize,
    pub max_list_indent: usize,
    pub max_quote_level: usize,
    pub link_color: Color,
    pub code_color: Color,
    pub autolink: bool,
    pub url_encode_extra: String,
    #[serde(default)]
    pub base_url: Option<Url>,
}

fn level_limit(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}

impl From<&ParserConfig> for ParserOptions {
    fn from(config: &ParserConfig) -> Self {
        ParserOptions {
            base_font_size: config.base_font_size,
            header_sizes: config.header_sizes.clone(),
            max_header_level: level_limit(config.max_header_level),
            max_list_indent: level_limit(config.max_list_indent),
            max_quote_level: level_limit(config.max_quote_level),
            link_color: config.link_color,
            code_color: config.code_color,
            autolink: config.autolink,
            url_encode_extra: config.url_encode_extra.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

impl From<ParserConfig> for ParserOptions {
    fn from(config: ParserConfig) -> Self {
        ParserOptions::from(&config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializerConfig {
    pub bullet: BulletStyle,
}

impl From<&SerializerConfig> for SerializerOptions {
    fn from(config: &SerializerConfig) -> Self {
        SerializerOptions {
            bullet: config.bullet,
        }
    }
}

/// Format-specific conversion knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub json: JsonConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonConfig {
    pub pretty: bool,
}

impl From<&JsonConfig> for JsonOptions {
    fn from(config: &JsonConfig) -> Self {
        JsonOptions {
            pretty: config.pretty,
        }
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

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdattrConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdattrConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parser.base_font_size, 12.0);
        assert_eq!(config.parser.header_sizes.len(), 6);
        assert!(config.parser.autolink);
        assert!(config.parser.base_url.is_none());
        assert_eq!(config.serializer.bullet, BulletStyle::Plus);
        assert!(config.convert.json.pretty);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: ParserOptions = config.parser.into();
        assert_eq!(options, ParserOptions::default());
        let serializer: SerializerOptions = (&config.serializer).into();
        assert_eq!(serializer, SerializerOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("serializer.bullet", "-")
            .expect("override to apply")
            .set_override("parser.max_header_level", 3)
            .expect("override to apply")
            .set_override("parser.base_url", "https://example.com/docs/")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.serializer.bullet, BulletStyle::Dash);
        let options = ParserOptions::from(&config.parser);
        assert_eq!(options.max_header_level, Some(3));
        assert_eq!(
            options.base_url.as_ref().map(Url::as_str),
            Some("https://example.com/docs/")
        );
    }

    #[test]
    fn rejects_unknown_bullet() {
        let result = Loader::new()
            .set_override("serializer.bullet", "#")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn layers_files_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mdattr.toml");
        std::fs::write(
            &path,
            "[parser]\nautolink = false\n\n[convert.json]\npretty = false\n",
        )
        .expect("write config");
        let config = Loader::new()
            .with_file(&path)
            .build()
            .expect("config to build");
        assert!(!config.parser.autolink);
        assert!(!config.convert.json.pretty);
        assert_eq!(config.serializer.bullet, BulletStyle::Plus);
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("definitely-missing-mdattr.toml")
            .build()
            .expect("config to build");
        assert!(config.parser.autolink);
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new()
            .with_file("definitely-missing-mdattr.toml")
            .build();
        assert!(result.is_err());
    }
}
