//! # Error Types
//!
//! Two failure kinds leave the checker:
//!
//! - [`CoverageGapError`]: the samples left something uncovered. Fixed by
//!   adding samples or an ignore entry.
//! - [`SchemaShapeError`]: a sample does not fit the schema node it was
//!   matched against. This is contract drift between the API and its
//!   declared types, and no ignore entry can excuse it.

use hlsdk_schema::SchemaPath;
use thiserror::Error;

use crate::report::CoverageReport;

/// Top-level error of a coverage check.
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error(transparent)]
    Gap(#[from] CoverageGapError),

    #[error(transparent)]
    Shape(#[from] SchemaShapeError),

    /// Coverage over zero samples is meaningless.
    #[error("coverage check needs at least one sample")]
    NoSamples,
}

/// Gaps remained after exclusions.
#[derive(Error, Debug)]
#[error(
    "{} schema coverage gap(s) across {} sample(s):\n{report}",
    .report.gaps.len(),
    .report.samples
)]
pub struct CoverageGapError {
    pub report: CoverageReport,
}

/// A sample value is incompatible with its schema node.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("sample {sample} at '{instance_path}' does not fit schema node {schema_path}: {reason}")]
pub struct SchemaShapeError {
    /// Index of the sample in the batch.
    pub sample: usize,
    /// JSON Pointer into the sample value.
    pub instance_path: String,
    pub schema_path: SchemaPath,
    pub reason: String,
}
