//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - User configuration directory
//! - Project configuration files (YAML/JSON/TOML)
//! - An explicit `--config` file
//! - Command-line arguments
//!
//! Later layers win field by field, and only for fields they actually set.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use treespec_schemas::{AttributePatch, ChildPatch};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Construction-time defaults for attribute and child specs
    pub defaults: DefaultsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Default overrides, in the same shape as schema constraint mappings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// e.g. `{maxLength: 64, required: false}`
    pub attribute: Option<Map<String, Value>>,

    /// e.g. `{required: false, mayBeChildless: true}`
    pub child: Option<Map<String, Value>>,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: Option<OutputFormat>,

    /// Use colored output when the terminal supports it
    pub color: Option<bool>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

/// A default configuration file that could not be read
#[derive(Debug)]
pub struct SkippedLayer {
    pub path: PathBuf,
    pub error: Error,
}

impl SkippedLayer {
    pub fn report(&self) {
        tracing::warn!(
            path = %self.path.display(),
            error = %self.error,
            "Skipping unreadable configuration file"
        );
    }
}

/// Copy `other` keys over `base`, skipping nulls
fn merge_map(base: &mut Option<Map<String, Value>>, other: Option<Map<String, Value>>) {
    let Some(other) = other else {
        return;
    };
    let target = base.get_or_insert_with(Map::new);
    for (key, value) in other {
        if !value.is_null() {
            target.insert(key, value);
        }
    }
}

fn merge_option<T>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);
        let config = match extension.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?,
            _ => serde_json::from_str(&content)?,
        };

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> (Self, Vec<SkippedLayer>) {
        Self::load_from_paths(&Self::default_config_paths())
    }

    /// Layer every existing file in order
    ///
    /// Unreadable files are skipped and handed back so they can be reported
    /// once logging is up.
    pub fn load_from_paths(paths: &[PathBuf]) -> (Self, Vec<SkippedLayer>) {
        let mut config = Self::default();
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|path| path.exists()) {
            match Self::from_file(path) {
                Ok(layer) => config.merge(layer),
                Err(error) => skipped.push(SkippedLayer {
                    path: path.clone(),
                    error,
                }),
            }
        }

        (config, skipped)
    }

    /// Load the default layers, then an explicit file on top if given
    pub fn load_with_file(file: Option<&Path>) -> Result<(Self, Vec<SkippedLayer>)> {
        let (mut config, skipped) = Self::load();
        if let Some(path) = file {
            config.merge(Self::from_file(path)?);
        }
        config.validate()?;
        Ok((config, skipped))
    }

    /// Default configuration file paths, lowest precedence first
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User config directory
        if let Some(config_dir) = dirs::config_dir() {
            let treespec_dir = config_dir.join("treespec");
            paths.push(treespec_dir.join("config.yaml"));
            paths.push(treespec_dir.join("config.json"));
            paths.push(treespec_dir.join("config.toml"));
        }

        // Current directory
        paths.push(PathBuf::from(".treespec.yaml"));
        paths.push(PathBuf::from(".treespec.yml"));
        paths.push(PathBuf::from(".treespec.json"));
        paths.push(PathBuf::from(".treespec.toml"));

        paths
    }

    /// Merge with another config (other takes precedence where it is set)
    pub fn merge(&mut self, other: Config) {
        merge_map(&mut self.defaults.attribute, other.defaults.attribute);
        merge_map(&mut self.defaults.child, other.defaults.child);

        merge_option(&mut self.output.format, other.output.format);
        merge_option(&mut self.output.color, other.output.color);

        merge_option(&mut self.logging.level, other.logging.level);
        merge_option(&mut self.logging.format, other.logging.format);
    }

    /// Reject default mappings the normalizer would not accept
    pub fn validate(&self) -> Result<()> {
        self.attribute_defaults()?;
        self.child_defaults()?;
        Ok(())
    }

    /// Attribute default overrides, if any layer set them
    pub fn attribute_defaults(&self) -> Result<Option<AttributePatch>> {
        self.defaults
            .attribute
            .as_ref()
            .map(|fields| {
                AttributePatch::from_object(fields)
                    .map_err(|e| Error::config(format!("defaults.attribute: {}", e)))
            })
            .transpose()
    }

    /// Child default overrides, if any layer set them
    pub fn child_defaults(&self) -> Result<Option<ChildPatch>> {
        self.defaults
            .child
            .as_ref()
            .map(|fields| {
                ChildPatch::from_value(&Value::Object(fields.clone()), "$")
                    .map_err(|e| Error::config(format!("defaults.child: {}", e)))
            })
            .transpose()
    }

    /// Apply `--attr-defaults` / `--child-defaults` flag values as the top layer
    pub fn apply_default_flags(
        &mut self,
        attr_defaults: Option<&str>,
        child_defaults: Option<&str>,
    ) -> Result<()> {
        let mut layer = Config::default();
        layer.defaults.attribute = attr_defaults
            .map(|json| parse_flag_object("--attr-defaults", json))
            .transpose()?;
        layer.defaults.child = child_defaults
            .map(|json| parse_flag_object("--child-defaults", json))
            .transpose()?;
        self.merge(layer);
        self.validate()
    }

    /// Effective output format: flag, then configuration, then human
    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.output.format).unwrap_or(OutputFormat::Human)
    }
}

fn parse_flag_object(flag: &str, json: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(Error::invalid_args(format!("{} must be a JSON object", flag))),
        Err(e) => Err(Error::invalid_args(format!("{} is not valid JSON: {}", flag, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn object(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn test_merge_only_overrides_set_fields() {
        let mut base = Config::default();
        base.defaults.attribute = object(json!({"maxLength": 10, "required": true}));
        base.output.format = Some(OutputFormat::Yaml);
        base.logging.level = Some("info".to_string());

        let mut layer = Config::default();
        layer.defaults.attribute = object(json!({"required": false, "maxLength": null}));
        layer.logging.level = Some("debug".to_string());
        base.merge(layer);

        assert_eq!(
            base.defaults.attribute,
            object(json!({"maxLength": 10, "required": false}))
        );
        assert_eq!(base.output.format, Some(OutputFormat::Yaml));
        assert_eq!(base.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("treespec.yaml");
        fs::write(
            &path,
            "defaults:\n  attribute:\n    maxLength: 32\n  child:\n    required: false\noutput:\n  format: json-pretty\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::JsonPretty));
        assert_eq!(
            config.attribute_defaults().unwrap(),
            Some(AttributePatch::new().max_length(32))
        );
        assert_eq!(
            config.child_defaults().unwrap(),
            Some(ChildPatch::new().required(false))
        );
    }

    #[test]
    fn test_load_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("treespec.toml");
        fs::write(&path, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unreadable_layers_are_reported() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join(".treespec.yaml");
        fs::write(&broken, "defaults: [not, a, mapping").unwrap();
        let good = dir.path().join(".treespec.json");
        fs::write(&good, r#"{"output": {"format": "yaml"}}"#).unwrap();
        let absent = dir.path().join(".treespec.toml");

        let (config, skipped) = Config::load_from_paths(&[broken.clone(), good, absent]);
        assert_eq!(config.output.format, Some(OutputFormat::Yaml));
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, broken);
        assert!(matches!(skipped[0].error, Error::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/no/such/treespec.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_defaults_are_rejected() {
        let mut config = Config::default();
        config.defaults.attribute = object(json!({"maxLength": 0}));
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.defaults.child = object(json!({"optional": true}));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_flags_are_top_layer() {
        let mut config = Config::default();
        config.defaults.attribute = object(json!({"maxLength": 10, "type": "string"}));
        config
            .apply_default_flags(Some(r#"{"maxLength": 20}"#), Some(r#"{"mayBeChildless": true}"#))
            .unwrap();

        assert_eq!(
            config.attribute_defaults().unwrap(),
            Some(
                AttributePatch::new()
                    .max_length(20)
                    .kind(treespec_schemas::AttributeType::String)
            )
        );
        assert_eq!(
            config.child_defaults().unwrap(),
            Some(ChildPatch::new().may_be_childless(true))
        );

        let err = config.apply_default_flags(Some("[1]"), None).unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_output_format_precedence() {
        let mut config = Config::default();
        assert_eq!(config.output_format(None), OutputFormat::Human);
        config.output.format = Some(OutputFormat::Yaml);
        assert_eq!(config.output_format(None), OutputFormat::Yaml);
        assert_eq!(config.output_format(Some(OutputFormat::Json)), OutputFormat::Json);
    }
}
