//! # Schema Tree Model
//!
//! A [`SchemaNode`] is one node of a JSON-Schema-like tree, reduced to the
//! structure coverage analysis cares about: objects, arrays, unions, enums
//! and primitives. The tree is finite and acyclic; `$ref`s are inlined by the
//! provider.
//!
//! Nodes are plain data. Construct them with the provider
//! ([`SchemaNode::from_json_schema`]) or by hand with the builder-style
//! constructors below, which is what the coverage tests do.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::SchemaPath;

/// The seven JSON Schema instance types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Parse a JSON Schema `type` keyword value.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// The most specific type of a runtime value. Whole numbers are `integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if is_integral(n) => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether `value` is an instance of this type. Integers are numbers too.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, Self::of(value)) {
            (Self::Number, Self::Integer) => true,
            (declared, actual) => declared == actual,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_integral(n: &serde_json::Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// A node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub path: SchemaPath,
    pub kind: NodeKind,
    /// Declared `type` set in declaration order. Empty means unconstrained.
    pub types: Vec<JsonType>,
}

/// Structural kind of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Accepts any value; nothing below it is tracked.
    Any,
    /// Scalar constrained only by `types`.
    Primitive,
    /// Literal members (`enum`, or `const` as a single member).
    Enum(Vec<Value>),
    Object(ObjectShape),
    /// Array with its element schema.
    Array(Box<SchemaNode>),
    Union(UnionShape),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectShape {
    /// Declared properties in schema order.
    pub properties: Vec<Property>,
    pub additional: Additional,
}

impl ObjectShape {
    /// An object with no declared properties whose values share one schema.
    pub fn is_map(&self) -> bool {
        self.properties.is_empty() && matches!(self.additional, Additional::Schema(_))
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub required: bool,
    pub node: SchemaNode,
}

/// Treatment of keys not listed in `properties`.
#[derive(Debug, Clone, PartialEq)]
pub enum Additional {
    /// Unknown keys allowed and not inspected.
    Open,
    /// Unknown keys are a contract break (`additionalProperties: false`).
    Closed,
    /// Unknown keys allowed; their values must match this schema.
    Schema(Box<SchemaNode>),
}

/// Which keyword declared the union. Only affects path rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionKeyword {
    AnyOf,
    OneOf,
}

impl UnionKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionShape {
    pub keyword: UnionKeyword,
    /// Alternatives in declaration order; the order is the match tie-break.
    pub branches: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn any(path: SchemaPath) -> Self {
        Self { path, kind: NodeKind::Any, types: Vec::new() }
    }

    pub fn primitive(path: SchemaPath, types: impl IntoIterator<Item = JsonType>) -> Self {
        Self { path, kind: NodeKind::Primitive, types: types.into_iter().collect() }
    }

    pub fn enumeration(path: SchemaPath, values: impl IntoIterator<Item = Value>) -> Self {
        Self { path, kind: NodeKind::Enum(values.into_iter().collect()), types: Vec::new() }
    }

    pub fn array(path: SchemaPath, items: SchemaNode) -> Self {
        Self { path, kind: NodeKind::Array(Box::new(items)), types: vec![JsonType::Array] }
    }

    pub fn object(path: SchemaPath, properties: Vec<Property>, additional: Additional) -> Self {
        Self {
            path,
            kind: NodeKind::Object(ObjectShape { properties, additional }),
            types: vec![JsonType::Object],
        }
    }

    pub fn union(path: SchemaPath, keyword: UnionKeyword, branches: Vec<SchemaNode>) -> Self {
        Self { path, kind: NodeKind::Union(UnionShape { keyword, branches }), types: Vec::new() }
    }

    /// Replace the declared type set, e.g. `["array", "null"]`.
    pub fn with_types(mut self, types: impl IntoIterator<Item = JsonType>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    /// Whether the declared type set admits `value`'s type.
    pub fn admits_type(&self, value: &Value) -> bool {
        self.types.is_empty() || self.types.iter().any(|t| t.accepts(value))
    }

    /// Every declared type that accepts `value`. An integer satisfies both
    /// `number` and `integer`.
    pub fn matched_types<'a>(&'a self, value: &'a Value) -> impl Iterator<Item = JsonType> + 'a {
        self.types.iter().copied().filter(move |t| t.accepts(value))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            NodeKind::Any | NodeKind::Primitive | NodeKind::Enum(_) => 0,
            NodeKind::Array(items) => items.node_count(),
            NodeKind::Object(shape) => {
                let props: usize = shape.properties.iter().map(|p| p.node.node_count()).sum();
                let extra = match &shape.additional {
                    Additional::Schema(node) => node.node_count(),
                    Additional::Open | Additional::Closed => 0,
                };
                props + extra
            }
            NodeKind::Union(shape) => shape.branches.iter().map(SchemaNode::node_count).sum(),
        }
    }
}

impl Property {
    pub fn required(name: impl Into<String>, node: SchemaNode) -> Self {
        Self { name: name.into(), required: true, node }
    }

    pub fn optional(name: impl Into<String>, node: SchemaNode) -> Self {
        Self { name: name.into(), required: false, node }
    }
}
