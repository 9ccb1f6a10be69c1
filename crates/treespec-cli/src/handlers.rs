//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand
//! plus the document loading and default resolution they share.

mod completions;
mod errors;
mod normalize;
mod validate;

pub use completions::handle_completions;
pub use errors::handle_errors;
pub use normalize::handle_normalize;
pub use validate::handle_validate;

use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use treespec_schemas::loader::DocumentParser;
use treespec_schemas::{AttributePatch, ChildPatch, Defaults};

/// Read a JSON or YAML document
pub(crate) fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(DocumentParser::new().parse_file(path)?)
}

/// Normalizer defaults from configuration layered under the command flags
pub(crate) fn resolve_defaults(
    config: &Config,
    attr_defaults: Option<&str>,
    child_defaults: Option<&str>,
) -> Result<(Option<AttributePatch>, Option<ChildPatch>)> {
    let mut config = config.clone();
    config.apply_default_flags(attr_defaults, child_defaults)?;

    let attribute = config.attribute_defaults()?;
    let child = config.child_defaults()?;
    debug!(?attribute, ?child, "Resolved default overrides");
    Ok((attribute, child))
}

pub(crate) fn defaults_from(attribute: Option<&AttributePatch>, child: Option<&ChildPatch>) -> Defaults {
    Defaults::with_overrides(attribute, child)
}
