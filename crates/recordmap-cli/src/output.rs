//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! rendering for conversion results and schema check reports.

use crate::cli::OutputFormat;
use crate::error::{ErrorContext, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// One converted item together with the fields it lost
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedItem {
    pub value: Value,
    pub dropped: Vec<String>,
}

/// Summary of one table in a schema check
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub name: String,
    pub key_kind: String,
    pub pass_through: bool,
    pub fields: usize,
    pub collisions: BTreeMap<String, Vec<String>>,
}

/// Result of checking a schema file
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub schema_file: String,
    pub tables: Vec<TableSummary>,
}

impl CheckReport {
    pub fn has_collisions(&self) -> bool {
        self.tables.iter().any(|t| !t.collisions.is_empty())
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format conversion results, optionally listing dropped fields
    fn format_converted(&self, items: &[ConvertedItem], show_dropped: bool) -> Result<String>;

    /// Format a schema check report
    fn format_check_report(&self, report: &CheckReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                Ok(serde_json::to_string_pretty(value)?)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_converted(&self, items: &[ConvertedItem], show_dropped: bool) -> Result<String> {
        match self {
            OutputFormat::Human => format_converted_human(items, show_dropped),
            _ if show_dropped => self.format(&items),
            _ => {
                let values: Vec<&Value> = items.iter().map(|item| &item.value).collect();
                self.format(&values)
            }
        }
    }

    fn format_check_report(&self, report: &CheckReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_check_report_human(report),
            _ => self.format(report),
        }
    }
}

fn format_converted_human(items: &[ConvertedItem], show_dropped: bool) -> Result<String> {
    let mut out = String::new();

    for (index, item) in items.iter().enumerate() {
        if items.len() > 1 {
            out.push_str(&format!("# {}\n", index + 1));
        }
        out.push_str(&serde_json::to_string_pretty(&item.value)?);
        out.push('\n');

        if show_dropped && !item.dropped.is_empty() {
            out.push_str(&format!("dropped: {}\n", item.dropped.join(", ")));
        }
    }

    Ok(out)
}

fn format_check_report_human(report: &CheckReport) -> Result<String> {
    let mut out = format!("Schema file: {}\n", report.schema_file);

    if report.tables.is_empty() {
        out.push_str("No tables defined\n");
        return Ok(out);
    }

    for table in &report.tables {
        if table.pass_through {
            out.push_str(&format!("  {} (pass-through)\n", table.name));
        } else {
            out.push_str(&format!(
                "  {} ({} field(s), {} keys)\n",
                table.name, table.fields, table.key_kind
            ));
        }
        for (local, remotes) in &table.collisions {
            out.push_str(&format!(
                "    collision: '{}' <- {}\n",
                local,
                remotes.join(", ")
            ));
        }
    }

    Ok(out)
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

    /// Write formatted results either to `path` or to this writer
    pub fn emit(&mut self, content: &str, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let mut file = BufWriter::new(
                    File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                );
                file.write_all(content.as_bytes())?;
                file.flush()?;
                self.success(&format!("Saved output to {}", path.display()))
            }
            None if content.ends_with('\n') => self.write(content),
            None => self.writeln(content),
        }
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }
}
