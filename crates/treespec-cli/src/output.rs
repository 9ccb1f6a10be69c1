//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! rendering for validation failures and canonical schemas.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;
use treespec_schemas::{
    AttributeSpec, ConstDict, SchemaNode, ValidationFailure, ValidationFailures,
};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format the failure of a single item
    fn format_validation_failure(&self, failure: &ValidationFailure) -> Result<String>;

    /// Format failures collected over a batch of items
    fn format_validation_failures(&self, failures: &ValidationFailures) -> Result<String>;

    /// Format a canonical schema tree
    fn format_schema(&self, schema: &SchemaNode) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_failure(&self, failure: &ValidationFailure) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_failure_human(failure)),
            _ => self.format(failure),
        }
    }

    fn format_validation_failures(&self, failures: &ValidationFailures) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_validation_failures_human(failures)),
            _ => self.format(failures),
        }
    }

    fn format_schema(&self, schema: &SchemaNode) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_schema_human(schema)),
            _ => self.format(&schema.to_document()?),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "✓".green(), message.green()))
        } else {
            self.writeln(&format!("OK: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "✗".red(), message.red()))
        } else {
            self.writeln(&format!("INVALID: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");
        self.write_formatted(&formatted)
    }

    /// Write one item's failure
    pub fn validation_failure(&mut self, failure: &ValidationFailure) -> Result<()> {
        let formatted = self.format.format_validation_failure(failure)?;
        self.write_formatted(&formatted)
    }

    /// Write failures collected over a batch
    pub fn validation_failures(&mut self, failures: &ValidationFailures) -> Result<()> {
        let formatted = self.format.format_validation_failures(failures)?;
        self.write_formatted(&formatted)
    }

    /// Write a canonical schema
    pub fn schema(&mut self, schema: &SchemaNode) -> Result<()> {
        let formatted = self.format.format_schema(schema)?;
        self.write_formatted(&formatted)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }

    fn write_formatted(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Format a single failure for human reading
fn format_validation_failure_human(failure: &ValidationFailure) -> String {
    let mut output = String::new();

    output.push_str(&format!("Kind: {} ({})\n", failure.kind, failure.kind.code()));
    output.push_str(&format!("Path: {}\n", failure.path));
    output.push_str(&format!("Message: {}\n", failure.message));

    if let Some(violation) = &failure.violation {
        output.push_str(&format!("  Rule: {}\n", violation.rule));
        output.push_str(&format!("  Expected: {}\n", violation.expected));
        output.push_str(&format!("  Actual: {}\n", violation.actual));
    }

    output
}

/// Format batch failures for human reading
fn format_validation_failures_human(failures: &ValidationFailures) -> String {
    let mut output = format!("Validation failed for {} item(s)\n", failures.len());

    for (i, failure) in failures.iter().enumerate() {
        output.push('\n');
        output.push_str(&format!("{}. ", i + 1));
        output.push_str(&format_validation_failure_human(failure));
    }

    output
}

fn describe_attribute(spec: &AttributeSpec) -> String {
    let mut parts = vec![
        spec.kind.value().to_string(),
        if spec.required { "required" } else { "optional" }.to_string(),
    ];
    if let Some(max_length) = spec.max_length {
        parts.push(format!("maxLength {}", max_length));
    }
    if let Some(values) = &spec.enum_values {
        parts.push(format!("enum {}", serde_json::Value::Array(values.clone())));
    }
    if let Some(format) = &spec.date_format {
        parts.push(format!("format {}", format));
    }
    parts.join(", ")
}

fn write_schema_node(output: &mut String, label: &str, node: &SchemaNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let childless = if node.may_be_childless {
        "may be childless"
    } else {
        "must have content"
    };
    output.push_str(&format!("{}{} ({})\n", indent, label, childless));

    if let Some(attributes) = &node.attributes {
        for (name, spec) in attributes {
            output.push_str(&format!("{}  @{}: {}\n", indent, name, describe_attribute(spec)));
        }
    }

    if let Some(children) = &node.children {
        for (name, child) in children {
            let required = if child.required { "required" } else { "optional" };
            write_schema_node(output, &format!("+ {} [{}]", name, required), &child.node, depth + 1);
        }
    }
}

/// Render a schema as an indented tree
fn format_schema_human(schema: &SchemaNode) -> String {
    let mut output = String::new();
    let label = schema.name.as_deref().unwrap_or("<any name>");
    write_schema_node(&mut output, label, schema, 0);
    output
}
