//! # Test Harness
//!
//! One call per test site: derive the schema from the declared return type,
//! validate the samples against it, then require coverage.
//!
//! ```ignore
//! let data = vec![
//!     info.frontend_open_orders_raw(USER, None).await?,
//!     info.frontend_open_orders_raw(USER, Some("test")).await?,
//! ];
//! let ignore = IgnoreSpec::new()
//!     .enum_values("#/items/properties/orderType", [json!("Market")]);
//! schema_coverage::<Vec<FrontendOrder>, _>(&data, Some(&ignore))?;
//! ```

use hlsdk_schema::{
    schema_for, ConformanceValidator, DescribedSchema, SchemaBuildError, SchemaValidationError,
};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::checker::check_coverage;
use crate::error::CoverageError;
use crate::ignore::IgnoreSpec;
use crate::report::CoverageReport;

/// Error from the harness pipeline.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("schema generation failed: {0}")]
    Schema(#[from] SchemaBuildError),

    #[error(transparent)]
    Conformance(#[from] SchemaValidationError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error("sample serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Schema of `T` + conformance + coverage over `samples`.
pub fn schema_coverage<T, S>(
    samples: &[S],
    ignore: Option<&IgnoreSpec>,
) -> Result<CoverageReport, HarnessError>
where
    T: JsonSchema,
    S: Serialize,
{
    let described = schema_for::<T>()?;
    let values = samples
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;
    check_described(&described, &values, ignore)
}

/// Conformance + coverage against an already-built schema.
pub fn check_described(
    described: &DescribedSchema,
    samples: &[Value],
    ignore: Option<&IgnoreSpec>,
) -> Result<CoverageReport, HarnessError> {
    ConformanceValidator::new(&described.document)?.validate_all(samples)?;
    Ok(check_coverage(&described.root, samples, ignore)?)
}
