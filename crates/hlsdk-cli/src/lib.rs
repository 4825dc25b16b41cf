//! # hlsdk-cli: Schema coverage from the command line
//!
//! ## Subcommands
//!
//! - `coverage`: check recorded samples against a JSON Schema file
//! - `probe`: fetch live responses and check them against the client's models
//! - `schema`: print the JSON Schema generated for a response model
//!
//! ## Exit Codes
//!
//! `0` covered, `1` gaps or operational error, `2` samples that do not fit
//! the schema.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to the library crates; no analysis logic here.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::{json, Value};

use hlsdk_coverage::{CoverageError, CoverageReport, HarnessError, IgnoreSpec};

pub mod coverage;
pub mod probe;
pub mod schema;

pub const EXIT_COVERED: u8 = 0;
pub const EXIT_GAPS: u8 = 1;
pub const EXIT_NONCONFORMING: u8 = 2;

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Read a JSON or YAML document; YAML is chosen by `.yaml`/`.yml` extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("failed to parse YAML {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("failed to parse JSON {}", path.display()))
    }
}

pub fn load_ignore(path: Option<&Path>) -> Result<Option<IgnoreSpec>> {
    path.map(|p| {
        IgnoreSpec::from_file(p).with_context(|| format!("failed to load ignore spec {}", p.display()))
    })
    .transpose()
}

/// Render a finished analysis and pick the exit code.
pub fn render_report(report: &CoverageReport, format: OutputFormat) -> Result<(String, u8)> {
    let code = if report.is_complete() { EXIT_COVERED } else { EXIT_GAPS };
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Text if report.is_complete() => report.to_string(),
        OutputFormat::Text => format!(
            "{} schema coverage gap(s) across {} sample(s), {} excused:\n{report}",
            report.gaps.len(),
            report.samples,
            report.excused.len()
        ),
    };
    Ok((text, code))
}

/// Render a failed analysis. Errors that are not about the samples propagate.
pub fn render_failure(err: HarnessError, format: OutputFormat) -> Result<(String, u8)> {
    let rendered = match err {
        HarnessError::Coverage(CoverageError::Gap(gap)) => return render_report(&gap.report, format),
        HarnessError::Coverage(CoverageError::Shape(shape)) => match format {
            OutputFormat::Text => shape.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "shapeError": {
                    "sample": shape.sample,
                    "instancePath": shape.instance_path,
                    "schemaPath": shape.schema_path,
                    "reason": shape.reason,
                }
            }))?,
        },
        HarnessError::Conformance(failure) => match format {
            OutputFormat::Text => failure.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&json!({
                "conformanceError": failure.to_string()
            }))?,
        },
        other => return Err(other.into()),
    };
    Ok((rendered, EXIT_NONCONFORMING))
}
