//! Document parsing for YAML and JSON formats
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> LoaderResult<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoaderError::unsupported_format(path.to_path_buf())),
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Json => &["json"],
        }
    }
}

/// Reads schema and item documents into JSON values
///
/// YAML documents are converted to JSON values, so both formats reach the
/// normalizer and validator in the same shape. Mapping order is preserved.
#[derive(Debug, Default)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a document file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| LoaderError::io_error(path.to_path_buf(), e))?;

        debug!(path = %path.display(), ?format, bytes = content.len(), "Parsing document");
        self.parse_content(&content, format, path)
    }

    /// Parse document content with explicit format
    ///
    /// `path` only labels errors.
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Yaml => self.parse_yaml(content, path),
            Format::Json => self.parse_json(content, path),
        }
    }

    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path.to_path_buf(), e))
    }

    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content)
            .map_err(|e| LoaderError::json_parse_error(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("schema.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("schema.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("item.json")).unwrap(), Format::Json);

        assert!(Format::from_path(Path::new("schema.txt")).is_err());
        assert!(Format::from_path(Path::new("schema")).is_err());
    }

    #[test]
    fn test_yaml_parsing_keeps_order() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("schema.yaml");

        let yaml_content = r#"
name: library
children:
  zeta:
    attributes: [title]
  alpha:
    required: false
"#;
        fs::write(&file_path, yaml_content).unwrap();

        let result = DocumentParser::new().parse_file(&file_path)?;
        assert_eq!(result["name"], "library");
        let children: Vec<&String> = result["children"].as_object().unwrap().keys().collect();
        assert_eq!(children, vec!["zeta", "alpha"]);
        Ok(())
    }

    #[test]
    fn test_json_parsing() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("item.json");
        fs::write(&file_path, r#"{"name": "book", "attributes": {"title": "Dune"}}"#).unwrap();

        let result = DocumentParser::new().parse_file(&file_path)?;
        assert_eq!(result["attributes"]["title"], "Dune");
        Ok(())
    }

    #[test]
    fn test_parse_errors_carry_path() {
        let parser = DocumentParser::new();
        let err = parser
            .parse_content("{\"name\": ", Format::Json, Path::new("broken.json"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::JsonParseError { .. }));
        assert_eq!(err.path(), Path::new("broken.json"));

        let err = parser
            .parse_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::IoError { .. }));
    }
}
