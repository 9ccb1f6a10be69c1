//! Errors command handler

use crate::cli::{ErrorsArgs, OutputFormat};
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;
use tracing::debug;
use treespec_schemas::{ConstDict, SpecificationError};

/// One row of the error kind listing
#[derive(Debug, Serialize, PartialEq)]
struct ErrorKind {
    name: &'static str,
    code: u16,
}

impl From<SpecificationError> for ErrorKind {
    fn from(kind: SpecificationError) -> Self {
        Self {
            name: kind.name(),
            code: kind.code(),
        }
    }
}

/// Handle the errors command
///
/// Without an identifier every kind is listed; otherwise the identifier is
/// resolved by name first, then by numeric code.
pub fn handle_errors(args: ErrorsArgs, output: &mut OutputWriter) -> Result<()> {
    let kinds: Vec<ErrorKind> = match args.identifier.as_deref() {
        Some(identifier) => {
            let kind = SpecificationError::lookup(identifier)?;
            debug!(identifier, %kind, "Resolved error kind");
            vec![kind.into()]
        }
        None => SpecificationError::entries()
            .iter()
            .map(|(_, kind)| ErrorKind::from(*kind))
            .collect(),
    };

    if output.format() != OutputFormat::Human {
        return match (args.identifier.is_some(), kinds.first()) {
            (true, Some(kind)) => output.data(kind),
            _ => output.data(&kinds),
        };
    }

    let rows = kinds
        .iter()
        .map(|kind| vec![kind.name.to_string(), kind.code.to_string()])
        .collect();
    output.table(&["NAME", "CODE"], rows)
}
