//! Report rendering and writing.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{KeyError, KeyResult};
use crate::source::ProductKeyRecord;

/// Printed when a scan finds nothing.
pub const NO_KEYS_MESSAGE: &str = "No DigitalProductId values found in the scanned locations.\n\
This is normal for digitally-licensed systems.\n";

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(KeyError::OutputError(format!(
                "unknown output format '{other}', expected 'text' or 'json'"
            ))),
        }
    }
}

/// Render records as a report.
///
/// Text output lists path, value name and key for each record, separated by
/// blank lines; quiet mode prints one key per line. JSON output is an array
/// of records, or of key strings in quiet mode.
pub fn format_output(
    records: &[ProductKeyRecord],
    format: OutputFormat,
    quiet: bool,
) -> KeyResult<String> {
    match format {
        OutputFormat::Text => Ok(format_text(records, quiet)),
        OutputFormat::Json => {
            let mut json = if quiet {
                let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
                serde_json::to_string_pretty(&keys)?
            } else {
                serde_json::to_string_pretty(records)?
            };
            json.push('\n');
            Ok(json)
        }
    }
}

fn format_text(records: &[ProductKeyRecord], quiet: bool) -> String {
    let mut out = String::new();

    for record in records {
        if quiet {
            out.push_str(&record.key);
            out.push('\n');
        } else {
            out.push_str(&format!("Path: {}\n", record.location));
            out.push_str(&format!("Value: {}\n", record.value_name));
            out.push_str(&format!("Key: {}\n\n", record.key));
        }
    }

    out
}

/// Write a rendered report to `path`, replacing any existing file.
pub fn write_output(path: impl AsRef<Path>, content: &str) -> KeyResult<()> {
    let path = path.as_ref();
    fs::write(path, content)
        .map_err(|e| KeyError::OutputError(format!("cannot write {}: {e}", path.display())))
}

/// Write a rendered report to `writer` and flush it.
pub fn write_report<W: Write>(writer: &mut W, content: &str) -> KeyResult<()> {
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}
