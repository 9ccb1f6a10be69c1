//! Schema-definition errors
//!
//! These describe a broken schema, not bad data, and are meant to abort
//! startup rather than be reported as validation results.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for normalization
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A defect in a schema document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The schema (or a nested sub-schema) is not a mapping
    #[error("Schema at '{path}' has to be an object")]
    NotAnObject { path: String },

    /// A key the normalizer does not know
    #[error("Unsupported key '{key}' in specification at '{path}'")]
    UnsupportedKey { path: String, key: String },

    /// A known key holding a value of the wrong shape
    #[error("Value under key '{key}' at '{path}' {expected}")]
    InvalidField {
        path: String,
        key: String,
        expected: String,
    },

    /// An attribute entry that is neither a bare name nor a mapping
    #[error("Attribute specification for '{attribute}' at '{path}' has to be an object")]
    InvalidAttributeSpec { path: String, attribute: String },

    /// A child entry that is neither a bare name nor a mapping
    #[error("Invalid child specification for key '{child}' at '{path}'")]
    InvalidChildSpec { path: String, child: String },

    #[error("Attribute constraint \"maxLength\" of '{attribute}' has to be an integer >= 1")]
    InvalidMaxLength { attribute: String },

    #[error("Attribute constraint \"enum\" of '{attribute}' has to be a non-empty array")]
    InvalidEnum { attribute: String },

    #[error("Attribute '{attribute}' has unknown type '{found}'")]
    InvalidType { attribute: String, found: String },

    /// Nesting deeper than the normalizer will follow
    #[error("Schema nesting at '{path}' exceeds the maximum depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

impl SchemaError {
    pub(crate) fn invalid_field(path: &str, key: &str, expected: &str) -> Self {
        Self::InvalidField {
            path: path.to_string(),
            key: key.to_string(),
            expected: expected.to_string(),
        }
    }

    pub(crate) fn unsupported_key(path: &str, key: &str) -> Self {
        Self::UnsupportedKey {
            path: path.to_string(),
            key: key.to_string(),
        }
    }

    /// Path inside the schema document where the defect was found, if known
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NotAnObject { path }
            | Self::UnsupportedKey { path, .. }
            | Self::InvalidField { path, .. }
            | Self::InvalidAttributeSpec { path, .. }
            | Self::InvalidChildSpec { path, .. }
            | Self::TooDeep { path, .. } => Some(path),
            _ => None,
        }
    }
}
