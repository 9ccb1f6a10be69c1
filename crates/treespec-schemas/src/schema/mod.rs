//! Schema documents and their canonical form
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod model;
pub mod normalizer;
pub mod raw;

pub use error::{SchemaError, SchemaResult};
pub use model::{
    AttributePatch, AttributeSpec, AttributeType, ChildNode, ChildPatch, ChildSpec, Defaults,
    SchemaNode,
};
pub use normalizer::{normalize, SchemaNormalizer};
pub use raw::{AttributeEntry, ChildEntry, RawSchema, DEFAULT_ATTRIBUTE_KEY, MAX_SCHEMA_DEPTH};
