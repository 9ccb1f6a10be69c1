//! Loading schema and item documents from disk
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use treespec_schemas::loader::DocumentParser;
//! use std::path::Path;
//!
//! let schema = DocumentParser::new().parse_file(Path::new("schema.yaml"))?;
//! println!("Loaded schema: {}", serde_json::to_string_pretty(&schema)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentParser, Format};
