//! # Coverage Subcommand
//!
//! Checks recorded samples against a JSON Schema file:
//! conformance first, then coverage with optional exclusions.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use hlsdk_coverage::{CheckerOptions, CoverageChecker, CoverageError, HarnessError, DEFAULT_MAX_DEPTH};
use hlsdk_schema::{ConformanceValidator, SchemaNode};

use crate::{load_ignore, read_document, render_failure, render_report, OutputFormat};

/// Arguments for the `hlsdk coverage` subcommand.
#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// JSON Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Sample files, one JSON value each.
    #[arg(long = "sample", required = true, num_args = 1..)]
    pub samples: Vec<PathBuf>,

    /// Treat a top-level array in each sample file as one sample per element.
    #[arg(long)]
    pub each: bool,

    /// Ignore-spec file (JSON or YAML).
    #[arg(long)]
    pub ignore: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Schema nesting depth treated as a shape error.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

/// Execute the coverage subcommand.
///
/// Returns the exit code; see the crate docs.
pub fn run_coverage(args: &CoverageArgs) -> Result<u8> {
    let document = read_document(&args.schema)?;
    let tree = SchemaNode::from_json_schema(&document)
        .with_context(|| format!("failed to build schema tree from {}", args.schema.display()))?;
    let ignore = load_ignore(args.ignore.as_deref())?;
    let samples = load_samples(&args.samples, args.each)?;

    tracing::info!(
        schema = %args.schema.display(),
        samples = samples.len(),
        nodes = tree.node_count(),
        "checking coverage"
    );

    let validator = ConformanceValidator::new(&document)
        .with_context(|| format!("failed to compile {}", args.schema.display()))?;
    if let Err(failure) = validator.validate_all(&samples) {
        return print(render_failure(HarnessError::Conformance(failure), args.format)?);
    }

    let checker = CoverageChecker::new(CheckerOptions { max_depth: args.max_depth });
    match checker.analyze(&tree, &samples, ignore.as_ref()) {
        Ok(report) => print(render_report(&report, args.format)?),
        Err(CoverageError::NoSamples) => anyhow::bail!("no samples to check"),
        Err(err) => print(render_failure(HarnessError::Coverage(err), args.format)?),
    }
}

fn load_samples(paths: &[PathBuf], each: bool) -> Result<Vec<Value>> {
    let mut samples = Vec::new();
    for path in paths {
        match read_document(path)? {
            Value::Array(items) if each => samples.extend(items),
            value => samples.push(value),
        }
    }
    Ok(samples)
}

fn print((text, code): (String, u8)) -> Result<u8> {
    println!("{text}");
    Ok(code)
}
