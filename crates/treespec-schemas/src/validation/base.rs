//! Base validation trait and path tracking
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::ValidationResult;

/// Position inside the item tree being validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Current path, rooted at `$`
    pub path: String,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationContext {
    pub fn new() -> Self {
        Self {
            path: "$".to_string(),
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, path_segment.as_ref()),
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

/// Base trait for validators
pub trait SchemaValidator {
    /// The type being validated
    type Input: ?Sized;

    /// Validate from the root, returning the first failure
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        self.validate_with_context(input, &ValidationContext::new())
    }

    /// Validate with failure paths rooted at `context`
    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> ValidationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_context_child() {
        let context = ValidationContext::new();
        let child = context.child("children");
        assert_eq!(child.path, "$.children");

        let grandchild = child.child_index(2).child("children").child_index(0);
        assert_eq!(grandchild.path, "$.children[2].children[0]");
    }
}
