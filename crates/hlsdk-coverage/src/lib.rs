//! # hlsdk-coverage: Schema Coverage for API Responses
//!
//! A response schema is only trustworthy if real responses exercise it.
//! This crate checks that a batch of samples collectively hits every
//! structurally distinct part of a schema, and fails on anything declared
//! but never observed (stale or dead schema), unless the caller excuses it.
//!
//! ## Entry Points
//!
//! - [`check_coverage`]: fails with [`CoverageError::Gap`] on gaps.
//! - [`analyze`]: same walk, returns the report regardless of gaps.
//! - [`schema_coverage`]: test harness: schema from a Rust type, conformance
//!   validation, then coverage.
//!
//! ## Exclusions
//!
//! [`IgnoreSpec`] lists, per schema path, enum values, union branches,
//! types, presence states and fill states that may stay uncovered. Shape
//! errors ([`SchemaShapeError`]) are never excusable.
//!
//! ## Crate Policy
//!
//! - Pure analysis: no I/O outside [`IgnoreSpec::from_file`].
//! - No state survives between calls.

pub mod checker;
pub mod error;
pub mod harness;
pub mod ignore;
pub mod record;
pub mod report;

pub use checker::{analyze, check_coverage, CheckerOptions, CoverageChecker, DEFAULT_MAX_DEPTH};
pub use error::{CoverageError, CoverageGapError, SchemaShapeError};
pub use harness::{check_described, schema_coverage, HarnessError};
pub use ignore::{IgnoreSpec, IgnoreSpecError};
pub use record::{CoverageRecord, Fill, PathObservations, Presence};
pub use report::{CoverageGap, CoverageReport, GapKind};
