//! Validation failure types for item trees
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::dict::ConstDict;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Every kind of failure the tree validator can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecificationError {
    UnspecifiedFields,
    WrongName,
    NoAttributes,
    UnspecifiedAttributes,
    MissingAttribute,
    InvalidEnum,
    TooLongAttribute,
    InvalidDateFormat,
    NotInteger,
    MissingChildren,
    MalformedItemData,
    UnspecifiedChild,
    MissingChild,
    ChildlessChild,
    EmptyItem,
}

impl SpecificationError {
    /// Stable numeric code of this kind
    pub fn code(self) -> u16 {
        self.value()
    }
}

impl ConstDict for SpecificationError {
    type Value = u16;
    const DICTIONARY: &'static str = "SpecificationError";

    fn entries() -> &'static [(&'static str, Self)] {
        &[
            ("UNSPECIFIED_FIELDS", Self::UnspecifiedFields),
            ("WRONG_NAME", Self::WrongName),
            ("NO_ATTRIBUTES", Self::NoAttributes),
            ("UNSPECIFIED_ATTRIBUTES", Self::UnspecifiedAttributes),
            ("MISSING_ATTRIBUTE", Self::MissingAttribute),
            ("INVALID_ENUM", Self::InvalidEnum),
            ("TOO_LONG_ATTRIBUTE", Self::TooLongAttribute),
            ("INVALID_DATE_FORMAT", Self::InvalidDateFormat),
            ("NOT_INTEGER", Self::NotInteger),
            ("MISSING_CHILDREN", Self::MissingChildren),
            ("MALFORMED_ITEM_DATA", Self::MalformedItemData),
            ("UNSPECIFIED_CHILD", Self::UnspecifiedChild),
            ("MISSING_CHILD", Self::MissingChild),
            ("CHILDLESS_CHILD", Self::ChildlessChild),
            ("EMPTY_ITEM", Self::EmptyItem),
        ]
    }

    fn value(self) -> u16 {
        match self {
            Self::UnspecifiedFields => 1,
            Self::WrongName => 2,
            Self::NoAttributes => 3,
            Self::UnspecifiedAttributes => 4,
            Self::MissingAttribute => 5,
            Self::InvalidEnum => 6,
            Self::TooLongAttribute => 7,
            Self::InvalidDateFormat => 8,
            Self::NotInteger => 9,
            Self::MissingChildren => 10,
            Self::MalformedItemData => 11,
            Self::UnspecifiedChild => 12,
            Self::MissingChild => 13,
            Self::ChildlessChild => 14,
            Self::EmptyItem => 15,
        }
    }
}

impl fmt::Display for SpecificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expected versus actual detail attached to some failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The constraint that was violated
    pub rule: String,
    /// What was expected
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}' violated: expected {}, but found {}",
            self.rule, self.expected, self.actual
        )
    }
}

/// The first violation found while validating an item tree
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Which check failed
    pub kind: SpecificationError,
    /// Path of the offending item, e.g. `$.children[1].children[0]`
    pub path: String,
    /// Human-readable description naming the offending field or item
    pub message: String,
    /// Optional expected/actual detail
    pub violation: Option<Violation>,
}

impl ValidationFailure {
    /// Create a failure without violation detail
    pub fn new<P, M>(kind: SpecificationError, path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
            violation: None,
        }
    }

    /// Attach expected/actual detail
    pub fn with_violation<R, E, A>(mut self, rule: R, expected: E, actual: A) -> Self
    where
        R: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        self.violation = Some(Violation {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        });
        self
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationFailure>;

/// Failures collected while validating several items
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct ValidationFailures {
    pub failures: Vec<ValidationFailure>,
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item(s) failed validation:", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            write!(f, "\n{}. {}: {}", i + 1, failure.path, failure)?;
        }
        Ok(())
    }
}

impl ValidationFailures {
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    pub fn add(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter()
    }

    /// Ok if nothing was collected
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationFailures {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationFailure> for ValidationFailures {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            failures: vec![failure],
        }
    }
}
