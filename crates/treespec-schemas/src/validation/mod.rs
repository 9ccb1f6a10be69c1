//! Validation of item trees against normalized schemas
//!
//! [`SpecificationValidator`] stops at the first failure in a single item
//! tree. [`validate_batch`] runs it over a list of items and collects one
//! failure per rejected item, with paths rooted at `$[index]`.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod date;
pub mod error;
pub mod tree;

pub use base::{SchemaValidator, ValidationContext};
pub use error::{
    SpecificationError, ValidationFailure, ValidationFailures, ValidationResult, Violation,
};
pub use tree::SpecificationValidator;

use crate::schema::SchemaResult;
use serde_json::Value;

/// Convenience function to create a validator with the built-in defaults
///
/// # Examples
///
/// ```rust
/// use treespec_schemas::validation::{create_validator, SchemaValidator};
/// use serde_json::json;
///
/// let validator = create_validator(&json!({
///     "name": "book",
///     "attributes": ["title"]
/// }))
/// .unwrap();
///
/// assert!(validator
///     .validate(&json!({"name": "book", "attributes": {"title": "Dune"}}))
///     .is_ok());
/// ```
pub fn create_validator(schema: &Value) -> SchemaResult<SpecificationValidator> {
    SpecificationValidator::new(schema)
}

/// Configuration for validating several items against one schema
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Stop at the first rejected item
    pub fail_fast: bool,
    /// Maximum number of failures to collect (0 = unlimited)
    pub max_errors: usize,
}

impl BatchConfig {
    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of failures to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Validate every item, collecting the first failure of each rejected one
pub fn validate_batch(
    validator: &SpecificationValidator,
    items: &[Value],
    config: &BatchConfig,
) -> Result<(), ValidationFailures> {
    let mut failures = ValidationFailures::new();
    let context = ValidationContext::new();

    for (i, item) in items.iter().enumerate() {
        let item_context = context.child_index(i);
        if let Err(failure) = validator.validate_with_context(item, &item_context) {
            failures.add(failure);

            if config.fail_fast {
                break;
            }

            if config.max_errors > 0 && failures.len() >= config.max_errors {
                break;
            }
        }
    }

    tracing::debug!(
        items = items.len(),
        rejected = failures.len(),
        "Batch validation finished"
    );
    failures.into_result()
}
