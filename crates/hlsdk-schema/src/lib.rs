//! # hlsdk-schema: Schema Model for Response Coverage
//!
//! Reduces JSON Schema documents to the structure coverage analysis needs
//! and validates samples against the full documents.
//!
//! ## Tree Model (`node`, `path`)
//!
//! [`SchemaNode`] is a tagged union over objects, arrays, unions, enums and
//! primitives. Each node carries a [`SchemaPath`] (`#/items/properties/tif`)
//! that is unique within its tree and keys every coverage observation.
//!
//! ## Provider (`provider`)
//!
//! - [`SchemaNode::from_json_schema`]: any JSON Schema document with local
//!   `$ref`s (inlined).
//! - [`schema_for`]: a Rust type deriving `schemars::JsonSchema`; returns the
//!   document and the tree together.
//!
//! ## Conformance (`validate`)
//!
//! [`ConformanceValidator`] wraps the `jsonschema` crate. Coverage assumes
//! conforming samples, so callers validate first.
//!
//! ## Crate Policy
//!
//! - No network access: external `$ref`s are never fetched.
//! - Schema trees are finite. Recursive definitions are rejected when the
//!   tree is built.

pub mod node;
pub mod path;
pub mod provider;
pub mod validate;

pub use node::{
    Additional, JsonType, NodeKind, ObjectShape, Property, SchemaNode, UnionKeyword, UnionShape,
};
pub use path::SchemaPath;
pub use provider::{schema_for, DescribedSchema, SchemaBuildError, MAX_SCHEMA_DEPTH};
pub use validate::{ConformanceValidator, SchemaValidationError, ValidationViolations, Violation};
