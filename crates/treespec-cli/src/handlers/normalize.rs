//! Normalize command handler

use super::{defaults_from, load_document, resolve_defaults};
use crate::cli::NormalizeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};
use treespec_schemas::SchemaNormalizer;

/// Handle the normalize command
#[instrument(skip_all, fields(schema = %args.schema.display()))]
pub fn handle_normalize(args: NormalizeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("normalize_command", &args.schema.display().to_string());

    let (attribute, child) = resolve_defaults(
        config,
        args.attr_defaults.as_deref(),
        args.child_defaults.as_deref(),
    )?;
    let schema = load_document(&args.schema)?;

    let normalizer = SchemaNormalizer::new(defaults_from(attribute.as_ref(), child.as_ref()));
    let node = normalizer.normalize(&schema)?;
    info!(depth = node.depth(), "Schema normalized");

    output.schema(&node)
}
