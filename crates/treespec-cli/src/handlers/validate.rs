//! Validation command handler

use super::{load_document, resolve_defaults};
use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use treespec_schemas::{validate_batch, BatchConfig, SchemaValidator, SpecificationValidator};

/// Handle the validate command
///
/// Returns [`Error::Invalid`] when the item document is rejected, after the
/// failure has been written.
#[instrument(skip_all, fields(schema = %args.schema.display(), item = %args.item.display(), batch = args.batch))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &args.item.display().to_string());

    let (attribute, child) = resolve_defaults(
        config,
        args.attr_defaults.as_deref(),
        args.child_defaults.as_deref(),
    )?;

    let schema = load_document(&args.schema)?;
    let validator = {
        let _normalize_timer = Timer::new("schema_normalization");
        SpecificationValidator::with_defaults(&schema, attribute.as_ref(), child.as_ref())?
    };
    debug!(depth = validator.schema().depth(), "Schema normalized");

    let item = load_document(&args.item)?;
    let item_label = args.item.display().to_string();

    if args.batch {
        let items = item.as_array().ok_or_else(|| {
            Error::invalid_args(format!(
                "{} has to contain a list of items when --batch is used",
                item_label
            ))
        })?;
        let batch = BatchConfig {
            fail_fast: args.fail_fast,
            max_errors: args.max_errors,
        };

        let _validation_timer = Timer::new("batch_validation");
        return match validate_batch(&validator, items, &batch) {
            Ok(()) => {
                info!(items = items.len(), "All items valid");
                output.success(&format!("All {} item(s) in {} are valid", items.len(), item_label))?;
                if output.format() != OutputFormat::Human {
                    output.data(&json!({"valid": true, "items": items.len()}))?;
                }
                Ok(())
            }
            Err(failures) => {
                warn!(rejected = failures.len(), "Items rejected");
                output.error(&format!("{} is invalid", item_label))?;
                output.validation_failures(&failures)?;
                Err(Error::Invalid {
                    rejected: failures.len(),
                })
            }
        };
    }

    let _validation_timer = Timer::new("item_validation");
    match validator.validate(&item) {
        Ok(()) => {
            info!("Item valid");
            output.success(&format!("{} is valid", item_label))?;
            if output.format() != OutputFormat::Human {
                output.data(&json!({"valid": true}))?;
            }
            Ok(())
        }
        Err(failure) => {
            warn!(kind = %failure.kind, path = %failure.path, "Item rejected");
            output.error(&format!("{} is invalid", item_label))?;
            output.validation_failure(&failure)?;
            Err(Error::Invalid { rejected: 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::{tempdir, TempDir};

    const SCHEMA: &str = r#"
name: foo
attributes:
  _default_:
    maxLength: 10
  a: {}
children:
  bar:
    required: false
    mayBeChildless: true
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn args(dir: &TempDir, item: &str) -> ValidateArgs {
        ValidateArgs {
            schema: write(dir.path(), "schema.yaml", SCHEMA),
            item: write(dir.path(), "item.json", item),
            attr_defaults: None,
            child_defaults: None,
            batch: false,
            fail_fast: false,
            max_errors: 0,
        }
    }

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(std::io::sink()))
    }

    #[test]
    fn test_valid_item() {
        let dir = tempdir().unwrap();
        let args = args(&dir, r#"{"name": "foo", "attributes": {"a": "x"}}"#);
        assert!(handle_validate(args, &Config::default(), &mut sink()).is_ok());
    }

    #[test]
    fn test_invalid_item_exits_with_one() {
        let dir = tempdir().unwrap();
        let args = args(&dir, r#"{"name": "foo", "attributes": {"a": "far too long"}}"#);
        let err = handle_validate(args, &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Invalid { rejected: 1 }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_attribute_default_flag_is_applied() {
        let dir = tempdir().unwrap();
        let mut args = args(&dir, r#"{"name": "foo", "attributes": {}}"#);
        args.attr_defaults = Some(r#"{"required": false}"#.to_string());
        assert!(handle_validate(args, &Config::default(), &mut sink()).is_ok());
    }

    #[test]
    fn test_batch_mode() {
        let dir = tempdir().unwrap();
        let mut args = args(
            &dir,
            r#"[
                {"name": "foo", "attributes": {"a": "x"}},
                {"name": "baz", "attributes": {"a": "x"}},
                {"name": "foo"}
            ]"#,
        );
        args.batch = true;
        let err = handle_validate(args, &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Invalid { rejected: 2 }));
    }

    #[test]
    fn test_batch_requires_a_list() {
        let dir = tempdir().unwrap();
        let mut args = args(&dir, r#"{"name": "foo", "attributes": {"a": "x"}}"#);
        args.batch = true;
        let err = handle_validate(args, &Config::default(), &mut sink()).unwrap_err();
        assert!(err.should_show_help());
    }

    #[test]
    fn test_broken_schema_is_reported() {
        let dir = tempdir().unwrap();
        let mut args = args(&dir, r#"{"name": "foo"}"#);
        args.schema = write(dir.path(), "broken.json", r#"{"attributes": {"a": {"maxLength": 0}}}"#);
        let err = handle_validate(args, &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
