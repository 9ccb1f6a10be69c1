//! Treespec Schemas - schema normalization and tree validation
//!
//! This crate checks hierarchical records ("items") against a declarative
//! schema. An item is a mapping with a `name`, an optional scalar `value`,
//! optional `attributes` and an optional list of child items:
//!
//! - **Normalization**: shorthand schema documents (bare names, keyed maps,
//!   `_default_` attribute templates) are expanded once into a canonical
//!   [`SchemaNode`] tree with every default filled in
//! - **Validation**: [`SpecificationValidator`] walks an item tree and stops
//!   at the first violation, reporting a [`SpecificationError`] kind plus a
//!   message naming the offending field or item
//! - **Loading**: JSON and YAML documents via [`loader::DocumentParser`]
//!
//! ## Quick Start
//!
//! ```rust
//! use treespec_schemas::{SchemaValidator, SpecificationError, SpecificationValidator};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "name": "library",
//!     "children": {
//!         "book": {
//!             "attributes": {
//!                 "_default_": {"maxLength": 10},
//!                 "title": {},
//!                 "year": {"type": "integer"}
//!             }
//!         }
//!     }
//! });
//! let mut validator = SpecificationValidator::new(&schema).unwrap();
//!
//! let item = json!({
//!     "name": "library",
//!     "children": [
//!         {"name": "book", "attributes": {"title": "Dune", "year": 1965}}
//!     ]
//! });
//! assert!(validator.is_valid(&item));
//!
//! let too_long = json!({
//!     "name": "library",
//!     "children": [
//!         {"name": "book", "attributes": {"title": "Children of Dune", "year": 1976}}
//!     ]
//! });
//! let failure = validator.validate(&too_long).unwrap_err();
//! assert_eq!(failure.kind, SpecificationError::TooLongAttribute);
//! assert_eq!(failure.message, "Attribute title length exceeded max 10 and is 16");
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod dict;
pub mod loader;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use dict::{ConstDict, UnknownIdentifier};
pub use schema::{
    normalize, AttributePatch, AttributeSpec, AttributeType, ChildNode, ChildPatch, ChildSpec,
    Defaults, SchemaError, SchemaNode, SchemaNormalizer, SchemaResult,
};
pub use validation::{
    create_validator, validate_batch, BatchConfig, SchemaValidator, SpecificationError,
    SpecificationValidator, ValidationContext, ValidationFailure, ValidationFailures,
    ValidationResult, Violation,
};
