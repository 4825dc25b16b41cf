//! # Schema-Description Provider
//!
//! Turns a JSON Schema document into a [`SchemaNode`] tree, and Rust types
//! into both (through `schemars`).
//!
//! ## Supported Keywords
//!
//! `type` (string or list), `properties`, `required`, `additionalProperties`,
//! `items`, `enum`, `const`, `anyOf`, `oneOf`, `allOf` (merged), and local
//! `$ref` (`#/$defs/...`, `#/definitions/...`, or any `#/` pointer).
//! Annotation and validation-only keywords (`format`, `minimum`, `pattern`,
//! `description`, ...) are ignored: they do not create structurally distinct
//! branches.
//!
//! `$ref` targets are inlined. A reference cycle is rejected with
//! [`SchemaBuildError::RecursiveRef`] because coverage paths must be finite.

use schemars::generate::SchemaSettings;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::node::{Additional, JsonType, NodeKind, Property, SchemaNode, UnionKeyword};
use crate::path::SchemaPath;

/// Default nesting limit while building a tree.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Error while converting a schema document into a tree.
#[derive(Error, Debug)]
pub enum SchemaBuildError {
    /// `$ref` does not point inside the document.
    #[error("unresolved $ref '{reference}' at {path}")]
    UnresolvedRef {
        path: String,
        reference: String,
    },

    /// `$ref` re-enters a definition that is already being expanded.
    #[error("recursive $ref '{reference}' at {path}: schema trees must be acyclic")]
    RecursiveRef {
        path: String,
        reference: String,
    },

    /// `enum` with no members.
    #[error("enum at {path} declares no values")]
    EmptyEnum { path: String },

    /// `anyOf` / `oneOf` with no branches.
    #[error("{keyword} at {path} declares no branches")]
    EmptyUnion { path: String, keyword: &'static str },

    /// Schema construct this model cannot represent.
    #[error("unsupported schema at {path}: {reason}")]
    Unsupported { path: String, reason: String },

    /// Nesting exceeded the configured limit.
    #[error("schema nesting at {path} exceeds {limit} levels")]
    TooDeep { path: String, limit: usize },

    /// The generated schema could not be turned into JSON.
    #[error("schema serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A JSON Schema document together with the tree built from it.
#[derive(Debug, Clone)]
pub struct DescribedSchema {
    /// The raw document, suitable for `jsonschema` validation.
    pub document: Value,
    pub root: SchemaNode,
}

/// Generate the schema of `T` with `schemars` and build its tree.
///
/// The schema describes the serialized form, which is what responses carry:
/// an `Option<T>` field is required and nullable unless it is skipped when
/// `None`. Deterministic for a given type.
pub fn schema_for<T: schemars::JsonSchema>() -> Result<DescribedSchema, SchemaBuildError> {
    let schema = SchemaSettings::draft2020_12()
        .for_serialize()
        .into_generator()
        .into_root_schema_for::<T>();
    let document = serde_json::to_value(schema)?;
    let root = SchemaNode::from_json_schema(&document)?;
    tracing::debug!(
        type_name = std::any::type_name::<T>(),
        nodes = root.node_count(),
        "built schema tree from generated schema"
    );
    Ok(DescribedSchema { document, root })
}

impl SchemaNode {
    /// Build a tree from a JSON Schema document.
    ///
    /// # Errors
    ///
    /// See [`SchemaBuildError`]. Every enum and union in the result has at
    /// least one member.
    pub fn from_json_schema(document: &Value) -> Result<Self, SchemaBuildError> {
        Self::from_json_schema_with_limit(document, MAX_SCHEMA_DEPTH)
    }

    /// Like [`from_json_schema`](Self::from_json_schema) with an explicit
    /// nesting limit.
    pub fn from_json_schema_with_limit(
        document: &Value,
        max_depth: usize,
    ) -> Result<Self, SchemaBuildError> {
        let mut builder = TreeBuilder {
            document,
            max_depth,
            expanding: Vec::new(),
        };
        builder.build(document, SchemaPath::root(), 0)
    }
}

struct TreeBuilder<'a> {
    document: &'a Value,
    max_depth: usize,
    /// `$ref`s currently being expanded, for cycle detection.
    expanding: Vec<String>,
}

impl<'a> TreeBuilder<'a> {
    fn build(
        &mut self,
        schema: &Value,
        path: SchemaPath,
        depth: usize,
    ) -> Result<SchemaNode, SchemaBuildError> {
        if depth > self.max_depth {
            return Err(SchemaBuildError::TooDeep {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }

        let map = match schema {
            Value::Bool(true) => return Ok(SchemaNode::any(path)),
            Value::Bool(false) => {
                return Err(unsupported(&path, "the `false` schema admits no value"))
            }
            Value::Object(map) => map,
            other => {
                return Err(unsupported(
                    &path,
                    format!("schema must be an object or boolean, found {}", JsonType::of(other)),
                ))
            }
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            return self.build_ref(reference, path, depth);
        }

        if let Some(parts) = map.get("allOf") {
            let merged = self.merge_all_of(map, parts, &path)?;
            return self.build(&Value::Object(merged), path, depth + 1);
        }

        let types = declared_types(map, &path)?;

        if let Some(value) = map.get("const") {
            return Ok(SchemaNode::enumeration(path, [value.clone()]).with_types(types));
        }

        if let Some(values) = map.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| unsupported(&path, "`enum` must be an array"))?;
            if values.is_empty() {
                return Err(SchemaBuildError::EmptyEnum { path: path.to_string() });
            }
            return Ok(SchemaNode::enumeration(path, values.iter().cloned()).with_types(types));
        }

        match (map.get("anyOf"), map.get("oneOf")) {
            (Some(_), Some(_)) => {
                return Err(unsupported(&path, "both `anyOf` and `oneOf` on one schema"))
            }
            (Some(branches), None) => {
                return self.build_union(UnionKeyword::AnyOf, branches, path, types, depth)
            }
            (None, Some(branches)) => {
                return self.build_union(UnionKeyword::OneOf, branches, path, types, depth)
            }
            (None, None) => {}
        }

        match structural_type(map, &types, &path)? {
            Some(JsonType::Object) => self.build_object(map, path, types, depth),
            Some(JsonType::Array) => self.build_array(map, path, types, depth),
            _ if types.is_empty() => Ok(SchemaNode::any(path)),
            _ => Ok(SchemaNode::primitive(path, types)),
        }
    }

    fn build_ref(
        &mut self,
        reference: &str,
        path: SchemaPath,
        depth: usize,
    ) -> Result<SchemaNode, SchemaBuildError> {
        if self.expanding.iter().any(|r| r == reference) {
            return Err(SchemaBuildError::RecursiveRef {
                path: path.to_string(),
                reference: reference.to_string(),
            });
        }
        let target = self.resolve(reference, &path)?;
        self.expanding.push(reference.to_string());
        let node = self.build(target, path, depth + 1);
        self.expanding.pop();
        node
    }

    fn resolve(&self, reference: &str, path: &SchemaPath) -> Result<&'a Value, SchemaBuildError> {
        let document: &'a Value = self.document;
        reference
            .strip_prefix('#')
            .and_then(|pointer| document.pointer(pointer))
            .ok_or_else(|| SchemaBuildError::UnresolvedRef {
                path: path.to_string(),
                reference: reference.to_string(),
            })
    }

    /// Flatten `allOf` into one schema object. Properties and `required`
    /// are unioned; conflicting `type`s are rejected; other keywords keep
    /// their first occurrence.
    fn merge_all_of(
        &self,
        base: &Map<String, Value>,
        parts: &Value,
        path: &SchemaPath,
    ) -> Result<Map<String, Value>, SchemaBuildError> {
        let parts = parts
            .as_array()
            .ok_or_else(|| unsupported(path, "`allOf` must be an array"))?;

        let mut merged = base.clone();
        merged.remove("allOf");

        for part in parts {
            let mut part = part;
            let mut hops = 0;
            while let Some(reference) = part.get("$ref").and_then(Value::as_str) {
                hops += 1;
                if hops > self.max_depth {
                    return Err(SchemaBuildError::RecursiveRef {
                        path: path.to_string(),
                        reference: reference.to_string(),
                    });
                }
                part = self.resolve(reference, path)?;
            }
            let part = match part {
                Value::Bool(true) => continue,
                Value::Object(map) => map,
                _ => return Err(unsupported(path, "`allOf` member must be an object schema")),
            };
            for (key, value) in part {
                match key.as_str() {
                    "properties" => merge_properties(&mut merged, value),
                    "required" => merge_required(&mut merged, value),
                    "type" => match merged.get("type") {
                        Some(existing) if existing != value => {
                            return Err(unsupported(path, "`allOf` members disagree on `type`"))
                        }
                        _ => {
                            merged.insert(key.clone(), value.clone());
                        }
                    },
                    _ => {
                        merged.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
            }
        }
        Ok(merged)
    }

    fn build_union(
        &mut self,
        keyword: UnionKeyword,
        branches: &Value,
        path: SchemaPath,
        types: Vec<JsonType>,
        depth: usize,
    ) -> Result<SchemaNode, SchemaBuildError> {
        let branches = branches.as_array().ok_or_else(|| {
            unsupported(&path, format!("`{}` must be an array", keyword.as_str()))
        })?;
        if branches.is_empty() {
            return Err(SchemaBuildError::EmptyUnion {
                path: path.to_string(),
                keyword: keyword.as_str(),
            });
        }
        let nodes = branches
            .iter()
            .enumerate()
            .map(|(i, branch)| self.build(branch, path.branch(keyword.as_str(), i), depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaNode::union(path, keyword, nodes).with_types(types))
    }

    fn build_object(
        &mut self,
        map: &Map<String, Value>,
        path: SchemaPath,
        types: Vec<JsonType>,
        depth: usize,
    ) -> Result<SchemaNode, SchemaBuildError> {
        let required: Vec<&str> = map
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut properties = Vec::new();
        if let Some(declared) = map.get("properties") {
            let declared = declared
                .as_object()
                .ok_or_else(|| unsupported(&path, "`properties` must be an object"))?;
            for (name, schema) in declared {
                let node = self.build(schema, path.property(name), depth + 1)?;
                properties.push(Property {
                    name: name.clone(),
                    required: required.contains(&name.as_str()),
                    node,
                });
            }
        }

        let additional = match map.get("additionalProperties") {
            None | Some(Value::Bool(true)) => Additional::Open,
            Some(Value::Bool(false)) => Additional::Closed,
            Some(schema) => {
                let node = self.build(schema, path.additional_properties(), depth + 1)?;
                match node.kind {
                    NodeKind::Any => Additional::Open,
                    _ => Additional::Schema(Box::new(node)),
                }
            }
        };

        let types = if types.is_empty() { vec![JsonType::Object] } else { types };
        Ok(SchemaNode::object(path, properties, additional).with_types(types))
    }

    fn build_array(
        &mut self,
        map: &Map<String, Value>,
        path: SchemaPath,
        types: Vec<JsonType>,
        depth: usize,
    ) -> Result<SchemaNode, SchemaBuildError> {
        if map.contains_key("prefixItems") || map.get("items").is_some_and(Value::is_array) {
            return Err(unsupported(&path, "tuple arrays are not supported"));
        }
        let items = match map.get("items") {
            Some(schema) => self.build(schema, path.items(), depth + 1)?,
            None => SchemaNode::any(path.items()),
        };
        let types = if types.is_empty() { vec![JsonType::Array] } else { types };
        Ok(SchemaNode::array(path, items).with_types(types))
    }
}

fn unsupported(path: &SchemaPath, reason: impl Into<String>) -> SchemaBuildError {
    SchemaBuildError::Unsupported {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn declared_types(
    map: &Map<String, Value>,
    path: &SchemaPath,
) -> Result<Vec<JsonType>, SchemaBuildError> {
    let names: Vec<&str> = match map.get("type") {
        None => return Ok(Vec::new()),
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        Some(_) => return Err(unsupported(path, "`type` must be a string or array")),
    };
    names
        .into_iter()
        .map(|name| {
            JsonType::from_keyword(name)
                .ok_or_else(|| unsupported(path, format!("unknown type '{name}'")))
        })
        .collect()
}

/// The container type a schema describes, if any.
fn structural_type(
    map: &Map<String, Value>,
    types: &[JsonType],
    path: &SchemaPath,
) -> Result<Option<JsonType>, SchemaBuildError> {
    let object = types.contains(&JsonType::Object);
    let array = types.contains(&JsonType::Array);
    let scalars = types
        .iter()
        .any(|t| !matches!(t, JsonType::Object | JsonType::Array | JsonType::Null));

    if ((object || array) && scalars) || (object && array) {
        return Err(unsupported(path, "mixed container and scalar types"));
    }
    if object {
        return Ok(Some(JsonType::Object));
    }
    if array {
        return Ok(Some(JsonType::Array));
    }
    if types.is_empty() {
        if ["properties", "additionalProperties", "required"]
            .iter()
            .any(|k| map.contains_key(*k))
        {
            return Ok(Some(JsonType::Object));
        }
        if map.contains_key("items") {
            return Ok(Some(JsonType::Array));
        }
    }
    Ok(None)
}

fn merge_properties(merged: &mut Map<String, Value>, incoming: &Value) {
    let Some(incoming) = incoming.as_object() else { return };
    let target = merged
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(target) = target {
        for (name, schema) in incoming {
            target.entry(name.clone()).or_insert_with(|| schema.clone());
        }
    }
}

fn merge_required(merged: &mut Map<String, Value>, incoming: &Value) {
    let Some(incoming) = incoming.as_array() else { return };
    let target = merged
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(target) = target {
        for name in incoming {
            if !target.contains(name) {
                target.push(name.clone());
            }
        }
    }
}
