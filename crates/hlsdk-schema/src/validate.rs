//! # Conformance Validation
//!
//! Checks that sample values are instances of a JSON Schema document before
//! coverage is measured. Coverage analysis assumes conforming samples; this
//! module is where non-conforming ones are caught, with structured errors
//! carrying the instance path, schema path and message.
//!
//! Only local `$ref`s are expected (generated schemas keep their definitions
//! in `$defs`). A retriever that never touches the network is installed so a
//! stray remote reference cannot trigger a request.

use std::fmt;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Resolves every external `$ref` to the permissive schema.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        tracing::debug!(uri = uri.as_str(), "external $ref resolved to permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// Error during conformance validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// A sample did not conform to the schema.
    #[error("sample {sample} does not conform to '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the schema (usually its `title`).
        schema_name: String,
        /// Index of the offending sample within the batch.
        sample: usize,
        violations: ValidationViolations,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        schema_name: String,
        reason: String,
    },
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled schema, reusable across samples.
///
/// `ConformanceValidator` is `Send + Sync`.
pub struct ConformanceValidator {
    schema_name: String,
    validator: Validator,
}

impl fmt::Debug for ConformanceValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConformanceValidator")
            .field("schema_name", &self.schema_name)
            .finish_non_exhaustive()
    }
}

impl ConformanceValidator {
    /// Compile `schema`. The draft is taken from its `$schema` keyword,
    /// defaulting to 2020-12.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidatorBuildError` if the schema is
    /// not a valid JSON Schema.
    pub fn new(schema: &Value) -> Result<Self, SchemaValidationError> {
        let schema_name = schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("(untitled)")
            .to_string();

        let mut opts = jsonschema::options();
        if schema.get("$schema").is_none() {
            opts.with_draft(jsonschema::Draft::Draft202012);
        }
        opts.with_retriever(OfflineRetriever);

        let validator = opts.build(schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { schema_name, validator })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Validate one value.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        self.validate_indexed(0, instance)
    }

    /// Validate a batch, stopping at the first non-conforming sample.
    pub fn validate_all(&self, samples: &[Value]) -> Result<(), SchemaValidationError> {
        samples
            .iter()
            .enumerate()
            .try_for_each(|(i, sample)| self.validate_indexed(i, sample))
    }

    fn validate_indexed(&self, sample: usize, instance: &Value) -> Result<(), SchemaValidationError> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.schema_name.clone(),
                sample,
                violations: ValidationViolations { violations: errors },
            })
        }
    }
}
